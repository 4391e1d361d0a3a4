//! Settings file support.
//!
//! Defaults for the command-line options can be kept in
//! `$HOME/.git-digger/settings.json`. Every field is optional and a missing
//! file is the same as an empty one. Command-line flags always win.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::export::{LayoutEngine, OutputFormat};

/// Settings loaded from $HOME/.git-digger/settings.json.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Default since date, `DD/MM/YYYY`.
    pub since: Option<String>,
    /// Use the HEAD-only policy unless `--since` is given.
    pub head_only: Option<bool>,
    /// Default output format (`graphml` or `dot`).
    pub format: Option<String>,
    /// Default Graphviz layout engine.
    pub layout: Option<String>,
    /// Default output file.
    pub output: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from the default location.
    ///
    /// Without a home directory there is no default file, which is the same
    /// as an empty one.
    pub fn load() -> Result<Self> {
        match Self::get_settings_path() {
            Ok(settings_path) => Self::load_from_path(&settings_path),
            Err(e) => {
                debug!("No settings file location: {e}");
                Ok(Self::default())
            }
        }
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".git-digger").join("settings.json"))
    }

    /// Configured output format, if any.
    pub fn format(&self) -> Result<Option<OutputFormat>> {
        self.format
            .as_deref()
            .map(str::parse::<OutputFormat>)
            .transpose()
            .context("Invalid format in settings file")
    }

    /// Configured layout engine, if any.
    pub fn layout(&self) -> Result<Option<LayoutEngine>> {
        self.layout
            .as_deref()
            .map(str::parse::<LayoutEngine>)
            .transpose()
            .context("Invalid layout in settings file")
    }
}
