use std::sync::Arc;

use punch_core::punch::CardDefaults;

use crate::error::AppError;
use crate::gas::GasClient;

/// Deployment configuration, read once at startup.
#[derive(Clone, Debug, Default)]
pub struct RelayConfig {
    /// Backend web app endpoint (`GAS_WEBAPP_URL`). Blank counts as unset.
    pub gas_url: Option<String>,
    pub card_defaults: CardDefaults,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self {
            gas_url: std::env::var("GAS_WEBAPP_URL")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            card_defaults: CardDefaults::from_env(),
        }
    }

    pub fn gas_url(&self) -> Result<&str, AppError> {
        self.gas_url.as_deref().ok_or(AppError::MissingBackendUrl)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub gas: GasClient,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config: Arc::new(config),
            gas: GasClient::new(),
        }
    }
}
