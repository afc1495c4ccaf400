use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "starsheet.toml";
pub const DEFAULT_DB_PATH: &str = "data/starsheet.sqlite";

/// A colon further into the line than this is prose, not a `Label: value` pair.
pub const FIELD_COLON_LIMIT: usize = 50;
/// Entry lines at least this long are body text, never titles.
pub const TITLE_MAX_LEN: usize = 100;

/// Heuristic bounds used by the importer. Lengths are counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ParseLimits {
    pub field_colon_limit: usize,
    pub title_max_len: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        ParseLimits {
            field_colon_limit: FIELD_COLON_LIMIT,
            title_max_len: TITLE_MAX_LEN,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    pub limits: ParseLimits,
}

impl Settings {
    /// Defaults, then `starsheet.toml` if present, then `STARSHEET_*` env vars
    /// (`STARSHEET_LIMITS__TITLE_MAX_LEN=120`).
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(file: &Path) -> Result<Self> {
        let settings = Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("limits.field_colon_limit", FIELD_COLON_LIMIT as i64)?
            .set_default("limits.title_max_len", TITLE_MAX_LEN as i64)?
            .add_source(File::from(file).required(false))
            .add_source(
                Environment::with_prefix("STARSHEET")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read settings from {:?}", file))?;
        settings
            .try_deserialize()
            .context("Invalid starsheet settings")
    }
}
