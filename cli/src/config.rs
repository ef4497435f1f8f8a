#![deny(missing_docs)]

//! # Project Settings
//!
//! Reads `yyp-package.json`, the settings file that sits next to a GameMaker
//! project:
//!
//! ```json
//! {
//!   "name": "horizon",
//!   "horizonToolkitSettings": {
//!     "paths": { "modelPath": "model.json", "yypPath": "horizon" }
//!   }
//! }
//! ```
//!
//! Relative paths are resolved against the directory holding the settings file.
//! Keys this tool does not use are ignored.

use crate::error::{CliError, CliResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default settings file name.
pub const SETTINGS_FILE: &str = "yyp-package.json";

/// Top-level settings document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    /// Project name. Drives the registry function name.
    pub name: String,
    /// Toolkit section.
    pub horizon_toolkit_settings: ToolkitSettings,
}

/// `horizonToolkitSettings`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolkitSettings {
    /// Filesystem locations.
    pub paths: ToolkitPaths,
}

/// `horizonToolkitSettings.paths`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolkitPaths {
    /// Schema model file.
    pub model_path: PathBuf,
    /// GameMaker project directory.
    pub yyp_path: PathBuf,
}

impl ProjectSettings {
    /// Loads settings from `path`, resolving relative paths against its directory.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.is_file() {
            return Err(CliError::MissingSettings(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let mut settings: ProjectSettings = serde_json::from_str(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let paths = &mut settings.horizon_toolkit_settings.paths;
        paths.model_path = base.join(&paths.model_path);
        paths.yyp_path = base.join(&paths.yyp_path);

        Ok(settings)
    }

    /// Loads settings if the file exists.
    pub fn load_optional(path: &Path) -> CliResult<Option<Self>> {
        if path.is_file() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }
}
