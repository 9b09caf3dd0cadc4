//! Configuration management for the launchpad API service

use anyhow::Result;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServiceConfig {
    #[validate]
    pub api: ApiConfig,
    #[validate]
    pub storage: StorageConfig,
    #[validate]
    pub solana: SolanaConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    pub bind_address: String,
    pub enable_cors: bool,
    #[validate(range(min = 1, max = 100))]
    pub max_upload_size_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StorageConfig {
    /// Upload API base, e.g. "https://api.cloudinary.com/v1_1"
    #[validate(url)]
    pub base_url: String,
    pub cloud_name: String,
    /// Unsigned upload preset configured on the storage account
    pub upload_preset: String,
    /// Namespace folder for uploaded objects
    pub folder: String,
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SolanaConfig {
    #[validate(url)]
    pub rpc_url: String,
    pub commitment: String,
    #[validate(range(min = 1, max = 300))]
    pub rpc_timeout_secs: u64,
    /// Cluster query parameter for explorer links
    pub explorer_cluster: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MonitoringConfig {
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            enable_cors: true,
            max_upload_size_mb: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cloudinary.com/v1_1".to_string(),
            cloud_name: "demo".to_string(),
            upload_preset: "tokens_unsigned".to_string(),
            folder: "tokens".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            rpc_timeout_secs: 30,
            explorer_cluster: "devnet".to_string(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.storage.cloud_name.is_empty() {
            return Err(anyhow::anyhow!("storage cloud_name cannot be empty"));
        }
        if self.storage.upload_preset.is_empty() {
            return Err(anyhow::anyhow!("storage upload_preset cannot be empty"));
        }
        Ok(())
    }
}
