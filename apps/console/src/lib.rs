//! # StockDesk Console Library
//!
//! Application layer for the StockDesk dashboard: managed state, commands
//! and logging setup. The `stockdesk` binary and any embedding web view call
//! into this crate.
//!
//! ## Module Organization
//! ```text
//! stockdesk_console_lib/
//! ├── lib.rs          ◄─── You are here (startup helpers)
//! ├── state/
//! │   ├── client.rs   ◄─── ApiClient + ClientConfig
//! │   ├── session.rs  ◄─── SessionStore, guard helper
//! │   ├── wizard.rs   ◄─── Arc<Mutex<Wizard>> + carried receipt
//! │   └── config.rs   ◄─── Display settings
//! ├── commands/
//! │   ├── auth.rs         ◄─── login, logout, initialize_session
//! │   ├── navigation.rs   ◄─── check_access, get_menu
//! │   ├── wizard.rs       ◄─── steps one and two
//! │   ├── transaction.rs  ◄─── submission, success view, lists
//! │   ├── catalog.rs      ◄─── categories, products (admin)
//! │   ├── warehouse.rs    ◄─── warehouses and their stock (admin)
//! │   ├── merchant.rs     ◄─── merchants (admin), own merchant (operator)
//! │   └── user.rs         ◄─── users, role assignment (admin)
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()          RUST_LOG or info,stockdesk=debug            │
//! │  2. ClientConfig::load()    defaults → stockdesk.toml → STOCKDESK_*     │
//! │  3. AppState::from_config() client, session, wizard, display config     │
//! │  4. initialize_session()    restore persisted token (session pending    │
//! │                             until this returns)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::sync::Arc;
use stockdesk_client::{ClientConfig, ClientResult, TokenStore};
use tracing_subscriber::EnvFilter;

use state::{ClientState, ConfigState, SessionState, WizardState};

/// Every managed state object, built together so they share one client.
#[derive(Clone)]
pub struct AppState {
    pub client: ClientState,
    pub session: SessionState,
    pub wizard: WizardState,
    pub config: ConfigState,
}

impl AppState {
    /// Builds state with the token store named by the configuration.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self::assemble(ClientState::from_config(config)?))
    }

    /// Builds state with an explicit token store.
    pub fn with_tokens(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        Ok(Self::assemble(ClientState::new(config, tokens)?))
    }

    fn assemble(client: ClientState) -> Self {
        let session = SessionState::new(&client);
        AppState {
            client,
            session,
            wizard: WizardState::new(),
            config: ConfigState::from_env(),
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockdesk=trace` - Show trace for stockdesk crates only
/// - Default: `info,stockdesk=debug,reqwest=warn`
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockdesk=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
