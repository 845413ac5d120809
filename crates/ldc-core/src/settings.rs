// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::report::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TABLE_FILE: &str = "landing_table.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Table used when none is given on the command line
    #[serde(default)]
    pub table_path: Option<PathBuf>,
    #[serde(default)]
    pub default_format: OutputFormat,
}

impl Settings {
    /// The configured table, or `landing_table.json` in the config root.
    pub fn resolved_table_path(&self) -> PathBuf {
        self.table_path
            .clone()
            .unwrap_or_else(|| crate::get_config_root().join(DEFAULT_TABLE_FILE))
    }
}

#[derive(Debug, Clone)]
pub struct SettingsManager {
    config_path: PathBuf,
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsManager {
    pub fn new() -> Self {
        Self::with_path(crate::get_config_root().join("settings.json"))
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Settings> {
        if !self.config_path.exists() {
            log::debug!("No settings at {:?}, using defaults", self.config_path);
            return Ok(Settings::default());
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read settings.json")?;

        serde_json::from_str(&content).context("Failed to parse settings.json")
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create settings directory")?;
            }
        }

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        fs::write(&self.config_path, content).context("Failed to write settings.json")
    }
}
