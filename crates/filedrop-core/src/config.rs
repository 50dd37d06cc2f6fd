//! Configuration module
//!
//! Environment-driven configuration for the server, storage directory, admin
//! gate, and upload policy. The admin secret and upload limits are plain
//! values on `Config` and get handed to the components that need them at
//! construction time; there is no module-level mutable state.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_STORAGE_DIR: &str = "./uploads";
const DEFAULT_MAX_FILES_PER_UPLOAD: usize = 20;
const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 100;
const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const DEFAULT_BLOCKED_EXTENSIONS: &str = "exe,bat,cmd,scr,pif,com,vbs,jar";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Flat directory holding every stored file; created on startup.
    pub storage_dir: PathBuf,
    /// Shared secret for the admin gate. Required, never logged.
    pub admin_secret: String,
    /// Per-request cap on uploaded files.
    pub max_files_per_upload: usize,
    /// Lowercased, dot-less extensions rejected at upload time.
    pub blocked_extensions: Vec<String>,
    pub rate_limit_per_minute: u32,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            storage_dir: PathBuf::from(
                env::var("STORAGE_DIR").unwrap_or_else(|_| DEFAULT_STORAGE_DIR.to_string()),
            ),
            admin_secret: env::var("ADMIN_SECRET").unwrap_or_default(),
            max_files_per_upload: env_parse("MAX_FILES_PER_UPLOAD", DEFAULT_MAX_FILES_PER_UPLOAD)?,
            blocked_extensions: env_list("BLOCKED_EXTENSIONS", DEFAULT_BLOCKED_EXTENSIONS)
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            rate_limit_per_minute: env_parse("RATE_LIMIT_PER_MINUTE", DEFAULT_RATE_LIMIT_PER_MINUTE)?,
            cors_origins: env_list("CORS_ORIGINS", "*"),
            http_concurrency_limit: env_parse(
                "HTTP_CONCURRENCY_LIMIT",
                DEFAULT_HTTP_CONCURRENCY_LIMIT,
            )?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Fail fast on misconfiguration before anything binds or serves.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.admin_secret.trim().is_empty() {
            anyhow::bail!("ADMIN_SECRET must be set to a non-empty value");
        }
        if self.max_files_per_upload == 0 {
            anyhow::bail!("MAX_FILES_PER_UPLOAD must be at least 1");
        }
        if self.rate_limit_per_minute == 0 {
            anyhow::bail!("RATE_LIMIT_PER_MINUTE must be at least 1");
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

/// Parse an env var into `T`, falling back to `default` when unset. A set but
/// unparsable value is a hard error rather than a silent fallback.
fn env_parse<T>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

/// Read a comma-separated env var into trimmed, non-empty entries.
fn env_list(key: &str, default: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
