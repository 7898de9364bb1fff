/// Configuration management for the identity cache
use crate::{
    error::{IdentityError, IdentityResult},
    identity::service::DEFAULT_MAX_CLAIMS_LEN,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub identity: IdentityConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub identity_db: PathBuf,
    pub max_connections: u32,
}

/// Identity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Largest accepted id token, in characters
    pub max_claims_len: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let data_directory = PathBuf::from("./data");
        Self {
            service: ServiceConfig {
                hostname: "0.0.0.0".to_string(),
                port: 5099,
            },
            storage: StorageConfig {
                identity_db: data_directory.join("identities.sqlite"),
                data_directory,
                max_connections: 10,
            },
            identity: IdentityConfig {
                max_claims_len: DEFAULT_MAX_CLAIMS_LEN,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> IdentityResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("IDENTITY_HOSTNAME").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("IDENTITY_PORT")
            .unwrap_or_else(|_| "5099".to_string())
            .parse()
            .map_err(|_| IdentityError::Validation("Invalid port number".to_string()))?;

        let data_directory: PathBuf = env::var("IDENTITY_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let identity_db = env::var("IDENTITY_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("identities.sqlite"));
        let max_connections = env::var("IDENTITY_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| IdentityError::Validation("Invalid database pool size".to_string()))?;

        let max_claims_len = env::var("IDENTITY_MAX_CLAIMS_LEN")
            .unwrap_or_else(|_| DEFAULT_MAX_CLAIMS_LEN.to_string())
            .parse()
            .map_err(|_| IdentityError::Validation("Invalid idtoken size bound".to_string()))?;

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            storage: StorageConfig {
                data_directory,
                identity_db,
                max_connections,
            },
            identity: IdentityConfig { max_claims_len },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> IdentityResult<()> {
        if self.service.hostname.is_empty() {
            return Err(IdentityError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.storage.max_connections == 0 {
            return Err(IdentityError::Validation(
                "Database pool needs at least one connection".to_string(),
            ));
        }

        if self.identity.max_claims_len == 0 {
            return Err(IdentityError::Validation(
                "idtoken size bound must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Address the server listens on
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.hostname, self.service.port)
    }
}
