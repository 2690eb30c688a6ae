//! Configuration for the cleanup run
//!
//! Loads settings from config.yml, with environment variables taking
//! precedence over file values.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default constants (fallback if config.yml not found)
pub const SESSION_NAME: &str = "tgclean_session";
pub const LOCK_FILE: &str = "tgclean_session.lock";
pub const CREDENTIALS_FILE: &str = "config.json";
pub const DM_BATCH_SIZE: usize = 5;
pub const GROUP_BATCH_SIZE: usize = 3;
pub const BATCH_PAUSE_MS: u64 = 1000;

/// YAML config structures
#[derive(Debug, Deserialize)]
struct YamlConfig {
    telegram: Option<TelegramConfig>,
    cleanup: Option<CleanupConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct TelegramConfig {
    phone: Option<String>,
    session_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CleanupConfig {
    dm_batch_size: Option<usize>,
    group_batch_size: Option<usize>,
    batch_pause_ms: Option<u64>,
    credentials_file: Option<String>,
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub phone: Option<String>,
    pub session_name: String,
    pub lock_file: String,
    pub credentials_file: PathBuf,
    pub dm_batch_size: usize,
    pub group_batch_size: usize,
    pub batch_pause: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from config.yml or use defaults
    pub fn new() -> Self {
        Self::load_from_file("config.yml")
            .or_else(|_| Self::load_from_file("../config.yml"))
            .unwrap_or_else(|_| Self::defaults())
    }

    /// Built-in defaults with environment overrides applied.
    pub fn defaults() -> Self {
        Self::load_dotenv();
        Self::from_parts(TelegramConfig::default(), CleanupConfig::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_dotenv();

        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::ConfigError(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let yaml: YamlConfig = serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;

        Ok(Self::from_parts(
            yaml.telegram.unwrap_or_default(),
            yaml.cleanup.unwrap_or_default(),
        ))
    }

    fn from_parts(telegram: TelegramConfig, cleanup: CleanupConfig) -> Self {
        let phone = Self::resolve_env_string(telegram.phone, "TELEGRAM_PHONE");
        let session_name = Self::resolve_env_string(telegram.session_name, "TG_CLEANUP_SESSION")
            .unwrap_or_else(|| SESSION_NAME.to_string());
        let lock_file = if session_name == SESSION_NAME {
            LOCK_FILE.to_string()
        } else {
            format!("{}.lock", session_name)
        };

        Self {
            phone,
            session_name,
            lock_file,
            credentials_file: cleanup
                .credentials_file
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(CREDENTIALS_FILE)),
            dm_batch_size: Self::resolve_env_usize(
                cleanup.dm_batch_size,
                "TG_CLEANUP_DM_BATCH",
                DM_BATCH_SIZE,
            ),
            group_batch_size: Self::resolve_env_usize(
                cleanup.group_batch_size,
                "TG_CLEANUP_GROUP_BATCH",
                GROUP_BATCH_SIZE,
            ),
            batch_pause: Duration::from_millis(Self::resolve_env_u64(
                cleanup.batch_pause_ms,
                "TG_CLEANUP_PAUSE_MS",
                BATCH_PAUSE_MS,
            )),
        }
    }

    /// Resolve a string: `${VAR}` placeholders and the explicit env key win
    /// over the literal file value. Empty strings count as unset.
    fn resolve_env_string(value: Option<String>, env_key: &str) -> Option<String> {
        if let Some(ref v) = value {
            if v.starts_with("${") && v.ends_with('}') {
                let var_name = &v[2..v.len() - 1];
                if let Ok(env_val) = std::env::var(var_name) {
                    return Some(env_val).filter(|s| !s.is_empty());
                }
            }
        }
        if let Ok(env_val) = std::env::var(env_key) {
            if !env_val.is_empty() {
                return Some(env_val);
            }
        }
        value.filter(|v| !v.is_empty() && !v.starts_with("${"))
    }

    fn resolve_env_usize(value: Option<usize>, env_key: &str, default: usize) -> usize {
        std::env::var(env_key)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .or(value)
            .unwrap_or(default)
    }

    fn resolve_env_u64(value: Option<u64>, env_key: &str, default: u64) -> u64 {
        std::env::var(env_key)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .or(value)
            .unwrap_or(default)
    }

    /// Load .env file into environment variables using dotenvy
    fn load_dotenv() {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
    }

    /// Path of the grammers SQLite session file.
    pub fn session_file(&self) -> String {
        format!("{}.session", self.session_name)
    }
}
