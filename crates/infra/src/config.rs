//! Configuration loading and representation.
//!
//! Settings come from environment variables and are read once at startup.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// How invoice deletion behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Delete the row, revalidate the listing and report success.
    #[default]
    Enabled,
    /// Refuse every delete before the store is touched.
    ShortCircuit,
}

/// Process settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `DATABASE_URL`; absent means the in-memory store.
    pub database_url: Option<String>,
    /// `INVOICE_DELETE_SHORT_CIRCUIT`
    pub delete_mode: DeleteMode,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                key: "BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        let database_url = lookup("DATABASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let short_circuit = match lookup("INVOICE_DELETE_SHORT_CIRCUIT") {
            Some(raw) => parse_bool("INVOICE_DELETE_SHORT_CIRCUIT", &raw)?,
            None => false,
        };

        Ok(Self {
            bind_addr,
            database_url,
            delete_mode: if short_circuit {
                DeleteMode::ShortCircuit
            } else {
                DeleteMode::Enabled
            },
        })
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(s.database_url, None);
        assert_eq!(s.delete_mode, DeleteMode::Enabled);
    }

    #[test]
    fn reads_all_keys() {
        let s = settings(&[
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("DATABASE_URL", "postgres://localhost/invoices"),
            ("INVOICE_DELETE_SHORT_CIRCUIT", "TRUE"),
        ])
        .unwrap();
        assert_eq!(s.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(s.database_url.as_deref(), Some("postgres://localhost/invoices"));
        assert_eq!(s.delete_mode, DeleteMode::ShortCircuit);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let s = settings(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(s.database_url, None);
    }

    #[test]
    fn rejects_bad_values() {
        let err = settings(&[("BIND_ADDR", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BIND_ADDR", .. }));

        let err = settings(&[("INVOICE_DELETE_SHORT_CIRCUIT", "maybe")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "INVOICE_DELETE_SHORT_CIRCUIT",
                ..
            }
        ));
    }
}
