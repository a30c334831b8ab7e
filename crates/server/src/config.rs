use chrono::TimeDelta;
use models::billing::ChargePolicy;
use std::{env, path::PathBuf, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Longest session a token may grant, one year
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Runtime settings, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub documents_dir: PathBuf,
    pub session_ttl: TimeDelta,
    pub charge_policy: ChargePolicy,
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            database_url: optional("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: parse_or(&optional, "DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret: optional("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            documents_dir: optional("DOCUMENTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public/documents")),
            session_ttl: session_ttl(parse_or(&optional, "SESSION_TTL_HOURS", 24)?)?,
            charge_policy: parse_or(&optional, "BOOKING_CHARGE_POLICY", ChargePolicy::default())?,
            bootstrap_admin_email: optional("BOOTSTRAP_ADMIN_EMAIL"),
            bootstrap_admin_password: optional("BOOTSTRAP_ADMIN_PASSWORD"),
        })
    }
}

fn parse_or<T, F>(lookup: F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn session_ttl(hours: i64) -> Result<TimeDelta, ConfigError> {
    let invalid = || ConfigError::Invalid {
        key: "SESSION_TTL_HOURS",
        value: hours.to_string(),
    };

    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        return Err(invalid());
    }
    TimeDelta::try_hours(hours).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/cardoo"),
            ("JWT_SECRET", "secret"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.documents_dir, PathBuf::from("public/documents"));
        assert_eq!(config.session_ttl, TimeDelta::hours(24));
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.charge_policy, ChargePolicy::DailyRate);
        assert!(config.bootstrap_admin_email.is_none());
    }

    #[test]
    fn test_required_values() {
        assert_eq!(
            config(&[("JWT_SECRET", "secret")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
        assert_eq!(
            config(&[("DATABASE_URL", "postgres://localhost/cardoo"), ("JWT_SECRET", " ")])
                .unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config_ok = config(&[
            ("DATABASE_URL", "postgres://localhost/cardoo"),
            ("JWT_SECRET", "secret"),
            ("BOOKING_CHARGE_POLICY", "full-term"),
            ("SESSION_TTL_HOURS", "2"),
        ])
        .unwrap();
        assert_eq!(config_ok.charge_policy, ChargePolicy::FullTerm);
        assert_eq!(config_ok.session_ttl, TimeDelta::hours(2));

        let err = config(&[
            ("DATABASE_URL", "postgres://localhost/cardoo"),
            ("JWT_SECRET", "secret"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "many".to_string()
            }
        );
    }

    #[test]
    fn test_session_ttl_bounds() {
        for value in ["0", "-3", "8761", "99999999999999"] {
            let err = config(&[
                ("DATABASE_URL", "postgres://localhost/cardoo"),
                ("JWT_SECRET", "secret"),
                ("SESSION_TTL_HOURS", value),
            ])
            .unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key: "SESSION_TTL_HOURS", .. }),
                "{value} was accepted"
            );
        }
    }
}
