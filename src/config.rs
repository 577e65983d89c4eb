//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

/// Runtime configuration for the users service.
///
/// Every flag can also come from the environment, which is how container
/// deployments set it.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "TSU_USERS_LISTEN", default_value = "0.0.0.0:8000")]
    pub listen: SocketAddr,

    /// Database connection URL (`postgres://…` or `sqlite:…`)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Path prefix every users route is mounted under
    #[arg(long, env = "TSU_USERS_API_PREFIX", default_value = "/api/rust")]
    pub api_prefix: String,

    /// Log output format
    #[arg(long, env = "TSU_USERS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// How log lines are rendered.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for terminals.
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_database_is_given() {
        let config = Config::try_parse_from(["tsu-users", "--database-url", "sqlite::memory:"]).unwrap();
        assert_eq!(config.listen, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.api_prefix, "/api/rust");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "tsu-users",
            "--database-url",
            "postgres://localhost/app",
            "--listen",
            "127.0.0.1:9000",
            "--api-prefix",
            "/api/v2",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.api_prefix, "/api/v2");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_unparseable_listen_address() {
        assert!(Config::try_parse_from(["tsu-users", "--database-url", "x", "--listen", "nope"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
