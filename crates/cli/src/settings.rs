// Layered configuration: defaults, then exam-labels.toml, then EXAM_LABELS_* env

use directories::ProjectDirs;
use exam_labels_core::port::id_provider::{SessionIdProvider, UuidProvider};
use exam_labels_core::port::IdProvider;
use exam_labels_core::{AppError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ENV_PREFIX: &str = "EXAM_LABELS";
const DEFAULT_CONFIG_NAME: &str = "exam-labels";
const DEFAULT_DB_FILE: &str = "reference.db";

const LOG_FORMATS: [&str; 2] = ["pretty", "json"];
const ID_FORMATS: [&str; 2] = ["session", "uuid"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// SQLite URL or plain file path
    pub database_url: String,
    /// `pretty` or `json`
    pub log_format: String,
    /// Daily-rolling log files go here when set
    pub log_dir: Option<String>,
    /// Queue item ids: `session` (counter + random tag) or `uuid`
    pub id_format: String,
}

fn config_err(e: config::ConfigError) -> AppError {
    AppError::Config(e.to_string())
}

impl Settings {
    /// Load settings; an explicit `config_path` must exist
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => config::File::from(path.to_path_buf()).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings: Settings = config::Config::builder()
            .set_default("database_url", default_database_path().display().to_string())
            .map_err(config_err)?
            .set_default("log_format", "pretty")
            .map_err(config_err)?
            .set_default("id_format", "session")
            .map_err(config_err)?
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(AppError::Config(format!(
                "log_format must be one of {}, got '{}'",
                LOG_FORMATS.join(", "),
                self.log_format
            )));
        }
        if !ID_FORMATS.contains(&self.id_format.as_str()) {
            return Err(AppError::Config(format!(
                "id_format must be one of {}, got '{}'",
                ID_FORMATS.join(", "),
                self.id_format
            )));
        }
        Ok(())
    }

    /// Database URL as sqlx expects it, with `~` expanded
    pub fn sqlite_url(&self) -> String {
        to_sqlite_url(&self.database_url)
    }

    /// Create the parent directory of a file-backed database
    pub fn ensure_database_dir(&self) -> Result<()> {
        if let Some(dir) = database_dir(&self.sqlite_url()) {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.log_dir
            .as_deref()
            .filter(|dir| !dir.trim().is_empty())
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).into_owned()))
    }

    pub fn id_provider(&self) -> Arc<dyn IdProvider> {
        match self.id_format.as_str() {
            "uuid" => Arc::new(UuidProvider),
            _ => Arc::new(SessionIdProvider::new()),
        }
    }
}

fn default_database_path() -> PathBuf {
    ProjectDirs::from("", "", DEFAULT_CONFIG_NAME)
        .map(|dirs| dirs.data_dir().join(DEFAULT_DB_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

fn to_sqlite_url(raw: &str) -> String {
    if raw.starts_with("sqlite:") {
        return raw.to_string();
    }
    format!("sqlite://{}", shellexpand::tilde(raw))
}

/// Parent directory a file-backed database needs before connecting
fn database_dir(url: &str) -> Option<PathBuf> {
    if url.contains(":memory:") {
        return None;
    }
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);
    Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
