#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for the unit-test build
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tower as _;

// Used by main.rs binary
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod cli;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod notifier;
pub mod routes;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, serve_until, start_server};
pub use cli::Cli;
pub use error::HttpError;
pub use notifier::BroadcastNotifier;
pub use routes::create_router;
pub use state::AppState;
