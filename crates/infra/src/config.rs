//! Process configuration from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;

use folio_core::UserId;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_JWT_SECRET: &str = "dev-secret";
const DEFAULT_JWT_EXPIRES: &str = "7d";
const DEFAULT_COOKIE_EXPIRES_DAYS: i64 = 7;
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Env files read by [`load_env_files`], in order. Earlier files win.
pub const ENV_FILES: [&str; 2] = ["config/config.env", ".env"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expires: Duration,
    pub cookie_expires: Duration,
    pub cookie_secure: bool,
    pub portfolio_url: Option<String>,
    pub dashboard_url: Option<String>,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    pub portfolio_user_id: Option<UserId>,
}

/// Load `config/config.env` then `.env` into the process environment.
///
/// Variables already set are never overridden; missing files are ignored.
pub fn load_env_files() {
    for file in ENV_FILES {
        match dotenvy::from_filename(file) {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(file, error = %e, "failed to load env file"),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;
        let use_persistent_stores =
            parse_bool("USE_PERSISTENT_STORES", get("USE_PERSISTENT_STORES"), false)?;
        let database_url = get("DATABASE_URL");
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let jwt_secret = get("JWT_SECRET_KEY").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET_KEY not set; using insecure dev default");
            DEFAULT_JWT_SECRET.to_string()
        });
        let jwt_expires_raw = get("JWT_EXPIRES").unwrap_or_else(|| DEFAULT_JWT_EXPIRES.to_string());
        let jwt_expires = parse_lifetime(&jwt_expires_raw).map_err(|reason| ConfigError::Invalid {
            var: "JWT_EXPIRES",
            value: jwt_expires_raw.clone(),
            reason,
        })?;

        let cookie_days = parse_or("COOKIE_EXPIRES", get("COOKIE_EXPIRES"), DEFAULT_COOKIE_EXPIRES_DAYS)?;
        if cookie_days <= 0 {
            return Err(ConfigError::Invalid {
                var: "COOKIE_EXPIRES",
                value: cookie_days.to_string(),
                reason: "must be a positive number of days".to_string(),
            });
        }

        let portfolio_user_id = match get("PORTFOLIO_USER_ID") {
            Some(raw) => Some(UserId::from_str(&raw).map_err(|e| ConfigError::Invalid {
                var: "PORTFOLIO_USER_ID",
                value: raw.clone(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            port,
            use_persistent_stores,
            database_url,
            jwt_secret,
            jwt_expires,
            cookie_expires: Duration::days(cookie_days),
            cookie_secure: parse_bool("COOKIE_SECURE", get("COOKIE_SECURE"), true)?,
            portfolio_url: get("PORTFOLIO_URL"),
            dashboard_url: get("DASHBOARD_URL"),
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            public_base_url: get("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}")),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", get("MAX_UPLOAD_BYTES"), DEFAULT_MAX_UPLOAD_BYTES)?,
            portfolio_user_id,
        })
    }

    /// Origins allowed to make credentialed cross-origin requests.
    pub fn allowed_origins(&self) -> Vec<String> {
        [&self.portfolio_url, &self.dashboard_url]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

fn parse_bool(var: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            var,
            value: other.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

/// Parse `<n>d`, `<n>h`, `<n>m`, `<n>s` or a bare number of seconds.
pub fn parse_lifetime(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], Some(c.to_ascii_lowercase())),
        _ => (raw, None),
    };
    let amount: i64 = digits
        .parse()
        .map_err(|_| "expected a whole number with an optional d/h/m/s suffix".to_string())?;
    if amount <= 0 {
        return Err("lifetime must be positive".to_string());
    }
    match unit {
        None | Some('s') => Ok(Duration::seconds(amount)),
        Some('m') => Ok(Duration::minutes(amount)),
        Some('h') => Ok(Duration::hours(amount)),
        Some('d') => Ok(Duration::days(amount)),
        Some(other) => Err(format!("unknown unit '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 4000);
        assert!(!cfg.use_persistent_stores);
        assert_eq!(cfg.jwt_expires, Duration::days(7));
        assert_eq!(cfg.cookie_expires, Duration::days(7));
        assert!(cfg.cookie_secure);
        assert_eq!(cfg.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(cfg.public_base_url, "http://localhost:4000");
        assert_eq!(cfg.max_upload_bytes, 10_485_760);
        assert!(cfg.allowed_origins().is_empty());
        assert!(cfg.portfolio_user_id.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("JWT_EXPIRES", "12h"),
            ("COOKIE_EXPIRES", "3"),
            ("COOKIE_SECURE", "false"),
            ("PORTFOLIO_URL", "https://me.dev"),
            ("DASHBOARD_URL", "https://admin.me.dev"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.public_base_url, "http://localhost:8080");
        assert_eq!(cfg.jwt_expires, Duration::hours(12));
        assert_eq!(cfg.cookie_expires, Duration::days(3));
        assert!(!cfg.cookie_secure);
        assert_eq!(
            cfg.allowed_origins(),
            vec!["https://me.dev".to_string(), "https://admin.me.dev".to_string()]
        );
    }

    #[test]
    fn persistent_stores_need_database_url() {
        assert_eq!(
            config(&[("USE_PERSISTENT_STORES", "true")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
        let cfg = config(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/folio"),
        ])
        .unwrap();
        assert!(cfg.use_persistent_stores);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("PORT", "  "), ("PORTFOLIO_URL", "")]).unwrap();
        assert_eq!(cfg.port, 4000);
        assert!(cfg.portfolio_url.is_none());
    }

    #[test]
    fn malformed_values_are_reported() {
        assert!(matches!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));
        assert!(matches!(
            config(&[("COOKIE_SECURE", "maybe")]),
            Err(ConfigError::Invalid { var: "COOKIE_SECURE", .. })
        ));
        assert!(matches!(
            config(&[("PORTFOLIO_USER_ID", "not-a-uuid")]),
            Err(ConfigError::Invalid { var: "PORTFOLIO_USER_ID", .. })
        ));
    }

    #[test]
    fn lifetimes_parse_units() {
        assert_eq!(parse_lifetime("7d"), Ok(Duration::days(7)));
        assert_eq!(parse_lifetime("2H"), Ok(Duration::hours(2)));
        assert_eq!(parse_lifetime("30m"), Ok(Duration::minutes(30)));
        assert_eq!(parse_lifetime("45s"), Ok(Duration::seconds(45)));
        assert_eq!(parse_lifetime("3600"), Ok(Duration::seconds(3600)));
        assert!(parse_lifetime("0d").is_err());
        assert!(parse_lifetime("7w").is_err());
        assert!(parse_lifetime("d").is_err());
        assert!(parse_lifetime("").is_err());
    }
}
