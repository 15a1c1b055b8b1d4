//! Northstar notification dispatch
//!
//! Reads a short message and delivers it through one configured channel,
//! either on a schedule ([`invoker::PollingInvoker`]) or once per external
//! trigger ([`invoker::TriggeredInvoker`]).

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod channels;
pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod invoker;
pub mod logger;
pub mod message;
pub mod server;
pub mod state;
pub mod trigger;
pub mod utils;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
