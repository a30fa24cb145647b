//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.
//! Every API command builds one request, runs it through the transport and
//! prints the result with the [`OutputWriter`](crate::output::OutputWriter).

mod analytics;
mod auth;
mod completions;
mod teams;
mod version;
mod websites;

pub use analytics::handle_analytics;
pub use auth::{handle_login, handle_verify};
pub use completions::handle_completions;
pub use teams::{handle_team_websites, handle_teams_list};
pub use version::handle_version;
pub use websites::handle_websites_list;

use crate::config::{Config, ConfigStore};
use crate::error::Result;
use umami_core::{Diagnostics, Transport};

/// State shared by API command handlers
pub struct Context<'a> {
    pub config: Config,
    pub store: &'a dyn ConfigStore,
    pub diagnostics: Diagnostics,
}

impl<'a> Context<'a> {
    pub fn new(config: Config, store: &'a dyn ConfigStore, diagnostics: Diagnostics) -> Self {
        Self {
            config,
            store,
            diagnostics,
        }
    }

    /// Transport for the configured endpoint and token
    pub fn transport(&self) -> Result<Transport> {
        Ok(Transport::new(
            &self.config.endpoint,
            self.config.token(),
            self.diagnostics.clone(),
        )?)
    }

    /// Transport without a token, for unauthenticated calls
    pub fn anonymous_transport(&self) -> Result<Transport> {
        Ok(Transport::new(&self.config.endpoint, None, self.diagnostics.clone())?)
    }
}
