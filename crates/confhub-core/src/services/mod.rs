//! Core services - the application's business logic layer.
//!
//! Services here are pure orchestrators between ports; they don't know about
//! concrete storage or transport implementations.

mod config_service;

pub use config_service::ConfigService;
