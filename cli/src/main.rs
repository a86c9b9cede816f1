//! wpimport CLI - import images from a WordPress XML export

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use wpimport::{
    DebugBlock, Error, ImageDecoder, ImportObserver, ImportOptions, ImportOutcome, ImportSummary,
    Importer, ItemReport, ReqwestClient, StoreConfig,
};

#[derive(Parser)]
#[command(name = "wpimport")]
#[command(version)]
#[command(about = "Import images from WordPress XML export", long_about = None)]
struct Cli {
    /// Path to WordPress XML export file
    #[arg(value_name = "XML_FILE")]
    xml_file: PathBuf,

    /// Delete all existing images before importing
    #[arg(long)]
    delete_existing: bool,

    /// Show detailed debug information for each image
    #[arg(long)]
    debug: bool,
}

/// Console progress bar plus failure and debug output.
struct ConsoleReporter {
    debug: bool,
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    fn new(debug: bool) -> Self {
        Self {
            debug,
            progress: None,
        }
    }

    /// Print above the progress bar when one is active.
    fn say(&self, line: impl AsRef<str>) {
        match &self.progress {
            Some(pb) => pb.println(line.as_ref()),
            None => println!("{}", line.as_ref()),
        }
    }
}

impl ImportObserver for ConsoleReporter {
    fn on_purge(&mut self, deleted: usize) {
        self.say(format!("Deleted {} existing images", deleted));
    }

    fn on_start(&mut self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg}: {percent:>3}% [{bar:40.cyan/blue}] {pos}/{len} [{elapsed_precise}<{eta_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Importing images");
        self.progress = Some(pb);
    }

    fn on_debug(&mut self, block: &DebugBlock) {
        self.say(format!("\n{}", "Image Metadata:".cyan().bold()));
        for line in &block.lines {
            self.say(line);
        }
        self.say("-".repeat(80).dimmed().to_string());
    }

    fn on_item(&mut self, report: &ItemReport) {
        let url = report.url.as_deref().unwrap_or_default();
        match &report.result {
            Err(e) => self.say(format!("Failed to import {}: {}", url, e).red().to_string()),
            Ok(ImportOutcome::SkippedExisting { .. }) if self.debug => {
                self.say(format!("Skipping existing image: {}", url));
            }
            Ok(ImportOutcome::Imported { .. }) if self.debug => {
                self.say(format!("{} {}", "Successfully imported:".green(), url));
            }
            Ok(_) => {}
        }

        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }

    fn on_finish(&mut self, summary: &ImportSummary) {
        if let Some(pb) = self.progress.take() {
            pb.finish();
        }

        println!(
            "\n{} {} imported, {} skipped, {} failed ({} attachments)",
            "Done!".green().bold(),
            summary.imported,
            summary.skipped(),
            summary.failed,
            summary.total
        );

        if self.debug {
            match summary.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => log::warn!("Cannot serialize summary: {}", e),
            }
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = cmd_import(&cli.xml_file, cli.delete_existing, cli.debug) {
        let message = match &e {
            Error::FileNotFound(_) | Error::XmlParse(_) => e.to_string(),
            other => format!("An unexpected error occurred: {}", other),
        };
        eprintln!("{}: {}", "Error".red().bold(), message);
        std::process::exit(1);
    }
}

fn cmd_import(input: &Path, delete_existing: bool, debug: bool) -> Result<(), Error> {
    let config = StoreConfig::from_env();
    log::debug!(
        "Using image store {} (media root {})",
        config.database.display(),
        config.media_root.display()
    );
    let mut store = config.open()?;

    let client = ReqwestClient::new().map_err(|e| Error::Other(e.to_string()))?;
    let decoder = ImageDecoder::new();
    let options = ImportOptions::new()
        .with_purge(delete_existing)
        .with_debug(debug);

    let mut reporter = ConsoleReporter::new(debug);
    Importer::new(&mut store, &client, &decoder)
        .with_options(options)
        .run_file(input, &mut reporter)?;

    Ok(())
}
