//! Command-line arguments for the console binary.

use clap::Parser;
use hakwon_client::ClientConfig;

#[derive(Debug, Parser)]
#[command(author, version, about = "Undoable record editing console")]
pub struct Cli {
    /// Work against an in-memory store instead of the backend.
    #[arg(long)]
    pub offline: bool,

    /// Backend API root. Overrides the value read from the environment.
    #[arg(long, env = "API_BASE_URL", value_name = "URL")]
    pub api_base_url: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.api_base_url {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                config.base_url = url.to_string();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
