use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub catalog: CatalogConfig,
    pub identity: IdentityConfig,
    pub logging: LoggingConfig,
}

/// Portal API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Header that carries the employee identifier on mutating calls.
    pub employee_header: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub page_size: usize,
    pub page_window: usize,
}

/// Where the login flow persists the profile this engine reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub profile_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Start with default values
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with DOCENT prefix
            .add_source(Environment::with_prefix("DOCENT").separator("__"));

        config.build()?.try_deserialize()
    }

    /// Loaded configuration, or the defaults when nothing is configured.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080/api/v1".to_string(),
                timeout_seconds: 30,
                employee_header: "x-mtrc".to_string(),
            },
            catalog: CatalogConfig {
                page_size: 9,
                page_window: 5,
            },
            identity: IdentityConfig {
                profile_path: ".docent/profile.json".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "plain".to_string(),
                file_path: None,
            },
        }
    }
}
