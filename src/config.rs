use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::services::trek_resolution_service::ResolutionConfig;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "trekking";
const DEV_JWT_SECRET: &str = "default_secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("unknown DOCUMENT_STORE {0:?}, expected \"mongo\" or \"memory\"")]
    UnknownStore(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo { uri: String, database: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub jwt_secret: String,
    pub resolution: ResolutionConfig,
    pub admin_emails: Vec<String>,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn seconds(name: &str, default: Duration) -> Duration {
    var(name)
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = var("HOST").unwrap_or_else(|| HOST.to_string());
        let port = var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(PORT);

        let store = match var("DOCUMENT_STORE").as_deref().unwrap_or("mongo") {
            "mongo" => StoreBackend::Mongo {
                uri: var("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?,
                database: var("MONGODB_DATABASE").unwrap_or_else(|| DATABASE.to_string()),
            },
            "memory" => StoreBackend::Memory,
            other => return Err(ConfigError::UnknownStore(other.to_string())),
        };

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            log::warn!("JWT_SECRET not set, using the development secret");
            DEV_JWT_SECRET.to_string()
        });

        let defaults = ResolutionConfig::default();
        let resolution = ResolutionConfig {
            timeout: seconds("TREK_RESOLUTION_TIMEOUT_SECS", defaults.timeout),
            reviews_timeout: seconds("REVIEWS_TIMEOUT_SECS", defaults.reviews_timeout),
        };

        let admin_emails = var("ADMIN_EMAILS")
            .map(|list| {
                list.split(',')
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            admin_emails,
            host,
            port,
            store,
            jwt_secret,
            resolution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for name in [
            "HOST",
            "PORT",
            "DOCUMENT_STORE",
            "MONGODB_URI",
            "MONGODB_DATABASE",
            "JWT_SECRET",
            "TREK_RESOLUTION_TIMEOUT_SECS",
            "REVIEWS_TIMEOUT_SECS",
            "ADMIN_EMAILS",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_mongo_requires_uri() {
        clear();
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::Missing("MONGODB_URI"))
        ));
    }

    #[test]
    #[serial]
    fn test_memory_backend_with_defaults() {
        clear();
        env::set_var("DOCUMENT_STORE", "memory");
        env::set_var("PORT", "not-a-port");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.port, PORT);
        assert_eq!(config.host, HOST);
        assert_eq!(config.resolution.timeout, Duration::from_secs(8));
        clear();
    }

    #[test]
    #[serial]
    fn test_timeouts_are_configurable() {
        clear();
        env::set_var("DOCUMENT_STORE", "memory");
        env::set_var("TREK_RESOLUTION_TIMEOUT_SECS", "2");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.resolution.timeout, Duration::from_secs(2));
        clear();
    }

    #[test]
    #[serial]
    fn test_admin_emails_are_split() {
        clear();
        env::set_var("DOCUMENT_STORE", "memory");
        env::set_var("ADMIN_EMAILS", " lead@example.com, ,ops@example.com ");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.admin_emails, vec!["lead@example.com", "ops@example.com"]);
        clear();
    }

    #[test]
    #[serial]
    fn test_unknown_backend_rejected() {
        clear();
        env::set_var("DOCUMENT_STORE", "firestore");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::UnknownStore(_))
        ));
        clear();
    }
}
