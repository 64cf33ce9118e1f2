//! # stockdesk-client: Backend Access for StockDesk
//!
//! Everything that crosses the network or touches the persisted token.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        stockdesk-client                                 │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────────────┐    │
//! │  │   config     │   │ token_store  │   │        session           │    │
//! │  │              │   │              │   │                          │    │
//! │  │ TOML + env   │   │ File / Mem   │   │ initialize, login,       │    │
//! │  │ base URL     │   │ "token" key  │   │ logout, subscribe        │    │
//! │  └──────┬───────┘   └──────┬───────┘   └────────────┬─────────────┘    │
//! │         │                  │                        │                   │
//! │         └──────────────────┼────────────────────────┘                   │
//! │                            ▼                                            │
//! │                  ┌──────────────────┐                                   │
//! │                  │       api        │  reqwest, bearer auth,            │
//! │                  │    ApiClient     │  401 → sign out, moka cache       │
//! │                  └──────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use std::sync::Arc;
//! use stockdesk_client::{ApiClient, ClientConfig, FileTokenStore, SessionStore};
//!
//! # async fn run() -> stockdesk_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let tokens = Arc::new(FileTokenStore::new("/tmp/stockdesk-token"));
//! let sessions = SessionStore::new(ApiClient::new(&config, tokens)?);
//!
//! let session = sessions.initialize().await;
//! println!("signed in: {}", session.is_authenticated());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod token_store;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use session::SessionStore;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
