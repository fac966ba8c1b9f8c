use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use thiserror::Error;

/// Error for shared-secret loading failures.
///
/// A missing or unreadable secret file is a deployment defect; callers are
/// expected to treat it as fatal at startup rather than fall back.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Failed to read signing secret from {}: {source}", path.display())]
    Unreadable { path: PathBuf, source: io::Error },
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Path to the file holding the shared signing secret.
    pub secret_file: PathBuf,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__SECRET_FILE, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__SECRET_FILE=/etc/blog/jwt_secret overrides auth.secret_file
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

impl AuthConfig {
    /// Read the shared signing secret, once, at process startup.
    ///
    /// A trailing newline is stripped so a secret written with `echo` signs
    /// the same bytes as one written without.
    ///
    /// # Errors
    /// * `Unreadable` - File is missing or cannot be read
    pub fn read_secret(&self) -> Result<String, SecretError> {
        let contents =
            fs::read_to_string(&self.secret_file).map_err(|source| SecretError::Unreadable {
                path: self.secret_file.clone(),
                source,
            })?;
        Ok(contents.trim_end_matches(['\r', '\n']).to_string())
    }
}
