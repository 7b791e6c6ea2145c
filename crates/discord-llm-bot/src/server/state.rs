//! Application state for the bot server

use std::sync::Arc;

use crate::commands::{CommandRouter, Services};
use crate::config::BotConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: BotConfig,
    /// Command dispatch
    router: CommandRouter,
}

impl AppState {
    /// Create state from configuration, connecting every available service
    pub async fn new(config: BotConfig) -> Self {
        tracing::info!("Initializing bot state (prefix: '{}')...", config.discord.command_prefix);
        let services = Services::from_config(&config).await;
        Self::with_services(config, services)
    }

    /// Create state around already built services
    pub fn with_services(config: BotConfig, services: Services) -> Self {
        let router = CommandRouter::new(&config, services);
        Self {
            inner: Arc::new(AppStateInner { config, router }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &BotConfig {
        &self.inner.config
    }

    /// Get command router
    pub fn router(&self) -> &CommandRouter {
        &self.inner.router
    }
}
