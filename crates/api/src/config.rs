//! Process configuration, read once from the environment at startup.
//!
//! | Variable                        | Default                 |
//! |---------------------------------|-------------------------|
//! | `HOST`                          | `0.0.0.0`               |
//! | `PORT`                          | `3000`                  |
//! | `CORS_ORIGINS`                  | `http://localhost:5173` |
//! | `REQUEST_TIMEOUT_SECS`          | `30`                    |
//! | `SHUTDOWN_TIMEOUT_SECS`         | `30`                    |
//! | `OTP_STATIC_CODE`               | unset                   |
//! | `AGING_SCAN_INTERVAL_SECS`      | `60`                    |
//! | `NOTIFICATION_RETENTION_DAYS`   | `30`                    |
//! | `NOTIFICATION_CLEANUP_HOUR_UTC` | `2`                     |
//!
//! JWT settings are documented on [`JwtConfig::from_env`]. Malformed values
//! panic so a misconfigured process never starts.

use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. `CORS_ORIGINS` is comma-separated.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Grace period for background jobs after the listener closes.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub signup: SignupConfig,
    pub aging: AgingConfig,
}

#[derive(Debug, Clone, Default)]
pub struct SignupConfig {
    /// When set, every OTP is this code and the send-otp response echoes
    /// it. Development only.
    pub otp_static_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AgingConfig {
    pub scan_interval_secs: u64,
    /// Dismissed notifications older than this are purged.
    pub retention_days: i64,
    /// UTC hour at which the daily cleanup acts.
    pub cleanup_hour_utc: u32,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 60,
            retention_days: 30,
            cleanup_hour_utc: 2,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 3000),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
            ),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            signup: SignupConfig::from_env(),
            aging: AgingConfig::from_env(),
        }
    }
}

impl SignupConfig {
    fn from_env() -> Self {
        Self {
            otp_static_code: std::env::var("OTP_STATIC_CODE")
                .ok()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        }
    }
}

impl AgingConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            scan_interval_secs: env_or("AGING_SCAN_INTERVAL_SECS", defaults.scan_interval_secs),
            retention_days: env_or("NOTIFICATION_RETENTION_DAYS", defaults.retention_days),
            cleanup_hour_utc: env_or("NOTIFICATION_CLEANUP_HOUR_UTC", defaults.cleanup_hour_utc),
        };
        assert!(config.scan_interval_secs > 0, "AGING_SCAN_INTERVAL_SECS must be positive");
        assert!(config.cleanup_hour_utc < 24, "NOTIFICATION_CLEANUP_HOUR_UTC must be 0-23");
        config
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// `default` when `key` is unset; panics when it is set but unparsable.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key}={raw:?} is invalid: {e}")),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            ["http://a.test", "http://b.test"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn unset_variable_falls_back_to_default() {
        assert_eq!(env_or::<u16>("PATHWAY_TEST_SURELY_UNSET_VAR", 8080), 8080);
    }
}
