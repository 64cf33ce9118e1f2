//! # Client State
//!
//! The shared backend client plus the configuration it was built from.

use std::sync::Arc;
use stockdesk_client::{
    ApiClient, ClientConfig, ClientResult, FileTokenStore, MemoryTokenStore, TokenStore,
};
use tracing::{info, warn};

/// Managed handle to the dashboard backend.
#[derive(Clone)]
pub struct ClientState {
    api: ApiClient,
    config: ClientConfig,
}

impl ClientState {
    /// Builds the client with an explicit token store.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let api = ApiClient::new(&config, tokens)?;
        info!(base_url = %api.base_url(), "API client ready");
        Ok(Self { api, config })
    }

    /// Builds the client with the file token store from configuration.
    ///
    /// Falls back to an in-memory store when no data directory exists, so
    /// the session then lasts only for the process.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let tokens: Arc<dyn TokenStore> = match config.token_path() {
            Some(path) => {
                info!(?path, "Using token file");
                Arc::new(FileTokenStore::new(path))
            }
            None => {
                warn!("No data directory available, token will not persist");
                Arc::new(MemoryTokenStore::new())
            }
        };
        Self::new(config, tokens)
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_from_config_persists_to_token_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.auth.token_path = Some(dir.path().join("session").join("token"));

        let state = ClientState::from_config(config).unwrap();
        state
            .api()
            .tokens()
            .save(&SecretString::from("1|abc".to_string()))
            .unwrap();

        let saved = std::fs::read_to_string(dir.path().join("session").join("token")).unwrap();
        assert_eq!(saved.trim(), "1|abc");
        assert_eq!(state.config().api.url, "http://localhost:8000/api");
    }
}
