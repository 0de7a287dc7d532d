//! Configuration loading and resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default bind address for the HTTP API
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5780";

/// Default page size for paginated queries
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path of the SQLite database file
    pub database_path: PathBuf,
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,
    /// Page size used when the client supplies a page number without a size
    pub default_page_size: i64,
}

impl ServiceConfig {
    /// Resolve configuration from CLI arguments, environment, config file
    /// and compiled defaults, in that priority order.
    pub fn resolve(cli_database: Option<&str>, cli_bind: Option<&str>) -> Result<Self> {
        let file = load_config_file();

        let database_path = resolve_setting(
            cli_database,
            "TAXFORM_DATABASE",
            file.as_ref(),
            "database_path",
        )
        .map(PathBuf::from)
        .unwrap_or_else(default_database_path);

        let bind_addr = resolve_setting(cli_bind, "TAXFORM_BIND", file.as_ref(), "bind_addr")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("Invalid bind address: {}", e)))?;

        let default_page_size = file
            .as_ref()
            .and_then(|c| c.get("default_page_size"))
            .and_then(|v| v.as_integer())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        if default_page_size < 1 {
            return Err(Error::Config(format!(
                "default_page_size must be positive, got {}",
                default_page_size
            )));
        }

        Ok(Self {
            database_path,
            bind_addr,
            default_page_size,
        })
    }
}

/// Resolve one string setting through the four-tier priority order
fn resolve_setting(
    cli_arg: Option<&str>,
    env_var_name: &str,
    file: Option<&toml::Value>,
    file_key: &str,
) -> Option<String> {
    // Priority 1: Command-line argument
    if let Some(value) = cli_arg {
        return Some(value.to_string());
    }

    // Priority 2: Environment variable
    if let Ok(value) = std::env::var(env_var_name) {
        return Some(value);
    }

    // Priority 3: TOML config file
    file.and_then(|c| c.get(file_key))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Load the platform config file, if one exists
fn load_config_file() -> Option<toml::Value> {
    let path = dirs::config_dir().map(|d| d.join("taxform").join("config.toml"))?;
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str::<toml::Value>(&content).ok()
}

/// Get the OS-dependent default database path
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("taxform"))
        .unwrap_or_else(|| PathBuf::from("./taxform_data"))
        .join("taxform.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_argument_wins() {
        let resolved = resolve_setting(Some("/tmp/cli.db"), "TAXFORM_TEST_UNSET", None, "database_path");
        assert_eq!(resolved.as_deref(), Some("/tmp/cli.db"));
    }

    #[test]
    fn test_file_value_used_when_no_cli_or_env() {
        let file: toml::Value = toml::from_str(r#"database_path = "/tmp/file.db""#).unwrap();
        let resolved = resolve_setting(None, "TAXFORM_TEST_UNSET", Some(&file), "database_path");
        assert_eq!(resolved.as_deref(), Some("/tmp/file.db"));
    }

    #[test]
    fn test_defaults_when_nothing_supplied() {
        let config = ServiceConfig::resolve(None, None).expect("defaults should resolve");
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_invalid_bind_addr_is_config_error() {
        let result = ServiceConfig::resolve(None, Some("not-an-addr"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
