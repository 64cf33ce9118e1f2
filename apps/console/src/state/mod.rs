//! # Application State
//!
//! Focused state types handed to commands instead of one global struct.
//!
//! ## State Types
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Managed State                                    │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │ ClientState  │  │ SessionState │  │ WizardState  │  │ConfigState │  │
//! │  │              │  │              │  │              │  │            │  │
//! │  │  ApiClient   │  │ SessionStore │  │  Arc<Mutex<  │  │ title,     │  │
//! │  │  (Arc inner) │  │ watch chan.  │  │   Wizard>>   │  │ currency   │  │
//! │  │              │  │              │  │  + receipt   │  │            │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  • Single writer per slice: only session commands publish sessions,    │
//! │    only wizard/transaction commands touch the wizard                    │
//! │  • Locks are never held across an .await                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod client;
mod config;
mod session;
mod wizard;

pub use client::ClientState;
pub use config::ConfigState;
pub use session::SessionState;
pub use wizard::WizardState;
