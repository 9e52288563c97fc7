//! Command-line arguments for the server binary.
//!
//! Every flag falls back to an environment variable, so the server can be
//! configured from a `.env` file as well.

use std::path::PathBuf;

use clap::Parser;

use crate::bootstrap::{CorsConfig, DEFAULT_DATABASE_PATH, DEFAULT_PORT, ServerConfig};

/// Multi-tenant parameter store with change notifications.
#[derive(Debug, Parser)]
#[command(name = "confhub-server")]
#[command(about = "Serve per-user and per-application configuration parameters")]
#[command(version)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "CONFHUB_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path to the SQLite database file
    #[arg(long, env = "CONFHUB_DATABASE", default_value = DEFAULT_DATABASE_PATH)]
    pub database: PathBuf,

    /// Keep parameters in memory only
    #[arg(long, env = "CONFHUB_IN_MEMORY")]
    pub in_memory: bool,

    /// Comma-separated list of allowed CORS origins (default: any)
    #[arg(long, env = "CONFHUB_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Events buffered per event-stream subscriber
    #[arg(long, env = "CONFHUB_EVENT_CAPACITY", default_value_t = 256)]
    pub event_capacity: usize,
}

impl Cli {
    /// Convert parsed arguments into a server configuration.
    pub fn into_config(self) -> ServerConfig {
        let config = ServerConfig {
            port: self.port,
            database_path: self.database,
            in_memory: self.in_memory,
            event_capacity: self.event_capacity,
            cors: CorsConfig::AllowAll,
        };

        if self.allowed_origins.is_empty() {
            config
        } else {
            config.with_allowed_origins(self.allowed_origins)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::parse_from([
            "confhub-server",
            "--port",
            "8081",
            "--database",
            "/tmp/c.db",
            "--allowed-origins",
            "http://a,http://b",
        ]);
        let config = cli.into_config();

        assert_eq!(config.port, 8081);
        assert_eq!(config.database_path, PathBuf::from("/tmp/c.db"));
        assert!(!config.in_memory);
        assert!(matches!(
            config.cors,
            CorsConfig::AllowOrigins(ref origins) if origins == &["http://a", "http://b"]
        ));
    }
}
