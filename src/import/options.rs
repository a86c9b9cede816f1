//! Import options and configuration.

use crate::fetch::DEFAULT_USER_AGENT;
use serde::{Deserialize, Serialize};

/// Options for an import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Delete all existing images before importing
    pub purge: bool,

    /// Emit per-item debug blocks
    pub debug: bool,

    /// User agent sent with every download
    pub user_agent: String,
}

impl ImportOptions {
    /// Create new import options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable purging existing images.
    pub fn with_purge(mut self, purge: bool) -> Self {
        self.purge = purge;
        self
    }

    /// Enable or disable debug output.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the download user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            purge: false,
            debug: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
