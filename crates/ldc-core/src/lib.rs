// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod engine;
pub mod report;
pub mod request;
pub mod settings;
pub mod table;

pub use engine::{accumulate, compute, CorrectionKind, CorrectionStep, LandingResult};
pub use request::LandingRequest;
pub use table::{lookup, resolve_key, BaseEntry, ConfigTable, TableKey};

use directories::ProjectDirs;
use request::RunwayCode;
use std::path::PathBuf;
use thiserror::Error;

/// The two failures a landing computation can end in. Both are user-input
/// problems: the request is out of range, or the table has no data for it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandingError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Configuration not found: {key} (RWYCC {runway_code})")]
    ConfigurationNotFound {
        key: String,
        runway_code: RunwayCode,
    },
}

/// Root folder for user-level files (settings, default table location).
pub fn get_config_root() -> PathBuf {
    ProjectDirs::from("org", "ldc", "Landing-Oxide")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".ldc"))
}
