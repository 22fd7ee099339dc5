use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::plan::PlanMode;

const DB_FILE: &str = "dreamplan.db";
const LOG_FILE: &str = "dreamplan.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) log_format: LogFormat,
    /// Default filter directive; `RUST_LOG` wins when set.
    pub(crate) log_level: String,
    pub(crate) plan_mode: PlanMode,
}

impl Config {
    /// Load `.env` (if any), then the `DREAMPLAN_*` environment variables.
    pub(crate) fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok(), default_data_dir)?;
        let data_dir = config.data_dir();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Ok(config)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        default_dir: impl FnOnce() -> Result<PathBuf>,
    ) -> Result<Self> {
        let db_path = match lookup("DREAMPLAN_DB_PATH").filter(|p| !p.trim().is_empty()) {
            Some(p) => PathBuf::from(crate::run::shellexpand(p.trim())),
            None => default_dir()?.join(DB_FILE),
        };

        let log_format = match lookup("DREAMPLAN_LOG_FORMAT") {
            Some(v) => LogFormat::parse(&v).ok_or_else(|| {
                anyhow::anyhow!("Invalid DREAMPLAN_LOG_FORMAT '{v}' (expected text or json)")
            })?,
            None => LogFormat::default(),
        };

        let log_level = lookup("DREAMPLAN_LOG_LEVEL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "info".into());

        let plan_mode = match lookup("DREAMPLAN_PLAN_MODE") {
            Some(v) => PlanMode::parse(&v).ok_or_else(|| {
                anyhow::anyhow!("Invalid DREAMPLAN_PLAN_MODE '{v}' (expected simple or compound)")
            })?,
            None => PlanMode::default(),
        };

        Ok(Self {
            db_path,
            log_format,
            log_level,
            plan_mode,
        })
    }

    pub(crate) fn data_dir(&self) -> &Path {
        self.db_path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir().join(LOG_FILE)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "dreamplan", "Dreamplan")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
