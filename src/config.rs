//! Process-wide configuration.
//!
//! Everything the loader needs from the environment is resolved here, once, at
//! startup. The resulting `AppConfig` is passed down explicitly; nothing below
//! `app::run` reads environment variables.

use crate::error::AppError;

pub const DEFAULT_FRED_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
pub const DEFAULT_WAREHOUSE_PORT: u16 = 5432;

/// Output style for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines for terminals and cron mail.
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fred: FredConfig,
    pub warehouse: WarehouseConfig,
    pub log_format: LogFormat,
}

#[derive(Clone)]
pub struct FredConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Clone)]
pub struct WarehouseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub schema: Option<String>,
    pub role: Option<String>,
    /// Compute target name; reported as the session's application name.
    pub warehouse: Option<String>,
}

impl AppConfig {
    /// Load `.env` (if present) and resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| {
            get(key).ok_or_else(|| AppError::config(format!("Missing {key} in environment (.env).")))
        };

        let fred = FredConfig {
            api_key: require("FRED_API_KEY")?,
            base_url: get("FRED_API_URL").unwrap_or_else(|| DEFAULT_FRED_URL.to_string()),
        };

        let (host, port) = parse_account(&require("WAREHOUSE_ACCOUNT")?)?;
        let warehouse = WarehouseConfig {
            host,
            port,
            user: require("WAREHOUSE_USER")?,
            password: require("WAREHOUSE_PASSWORD")?,
            database: require("WAREHOUSE_DATABASE")?,
            schema: get("WAREHOUSE_SCHEMA"),
            role: get("WAREHOUSE_ROLE"),
            warehouse: get("WAREHOUSE_WAREHOUSE"),
        };

        let log_format = match get("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::config(format!(
                    "Invalid LOG_FORMAT '{other}' (expected 'pretty' or 'json')."
                )));
            }
        };

        Ok(Self {
            fred,
            warehouse,
            log_format,
        })
    }
}

/// Split `host[:port]`.
fn parse_account(raw: &str) -> Result<(String, u16), AppError> {
    match raw.rsplit_once(':') {
        None => Ok((raw.to_string(), DEFAULT_WAREHOUSE_PORT)),
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("Invalid port in WAREHOUSE_ACCOUNT '{raw}'.")))?;
            if host.is_empty() {
                return Err(AppError::config(format!("Missing host in WAREHOUSE_ACCOUNT '{raw}'.")));
            }
            Ok((host.to_string(), port))
        }
    }
}

impl std::fmt::Debug for FredConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FredConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl std::fmt::Debug for WarehouseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarehouseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("role", &self.role)
            .field("warehouse", &self.warehouse)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::EXIT_CONFIG;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("FRED_API_KEY", "abc123"),
            ("WAREHOUSE_ACCOUNT", "warehouse.internal:6543"),
            ("WAREHOUSE_USER", "loader"),
            ("WAREHOUSE_PASSWORD", "hunter2"),
            ("WAREHOUSE_DATABASE", "analytics"),
            ("WAREHOUSE_SCHEMA", "raw"),
        ])
    }

    fn resolve(env: &HashMap<&'static str, &'static str>) -> Result<AppConfig, AppError> {
        AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn resolves_full_environment() {
        let config = resolve(&base_env()).unwrap();
        assert_eq!(config.fred.api_key, "abc123");
        assert_eq!(config.fred.base_url, DEFAULT_FRED_URL);
        assert_eq!(config.warehouse.host, "warehouse.internal");
        assert_eq!(config.warehouse.port, 6543);
        assert_eq!(config.warehouse.schema.as_deref(), Some("raw"));
        assert_eq!(config.warehouse.role, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn account_without_port_uses_default() {
        let mut env = base_env();
        env.insert("WAREHOUSE_ACCOUNT", "localhost");
        let config = resolve(&env).unwrap();
        assert_eq!(config.warehouse.host, "localhost");
        assert_eq!(config.warehouse.port, DEFAULT_WAREHOUSE_PORT);
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let mut env = base_env();
        env.remove("FRED_API_KEY");
        let err = resolve(&env).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
        assert!(err.message().contains("FRED_API_KEY"));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut env = base_env();
        env.insert("WAREHOUSE_PASSWORD", "   ");
        let err = resolve(&env).unwrap_err();
        assert!(err.message().contains("WAREHOUSE_PASSWORD"));
    }

    #[test]
    fn rejects_bad_port_and_log_format() {
        let mut env = base_env();
        env.insert("WAREHOUSE_ACCOUNT", "host:notaport");
        assert_eq!(resolve(&env).unwrap_err().exit_code(), EXIT_CONFIG);

        let mut env = base_env();
        env.insert("LOG_FORMAT", "xml");
        assert!(resolve(&env).unwrap_err().message().contains("LOG_FORMAT"));

        let mut env = base_env();
        env.insert("LOG_FORMAT", "JSON");
        assert_eq!(resolve(&env).unwrap().log_format, LogFormat::Json);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = resolve(&base_env()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("abc123"));
        assert!(!rendered.contains("hunter2"));
    }
}
