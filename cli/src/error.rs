#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use entigen_core::AppError;
use std::path::PathBuf;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Settings file could not be parsed.
    #[display("Invalid settings: {}", _0)]
    Json(serde_json::Error),

    /// Settings file does not exist.
    #[display("{} wasn't found", _0.display())]
    #[from(ignore)]
    MissingSettings(PathBuf),

    /// A setting is neither in the settings file nor on the command line.
    #[display("Missing setting '{}' (pass --{} or add it to yyp-package.json)", _0, _0)]
    #[from(ignore)]
    MissingSetting(&'static str),

    /// Failure inside the generator.
    #[display("{}", _0)]
    App(AppError),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// `General(String)` holds a `String`, which does not implement
/// `std::error::Error`, so `source()` cannot be derived.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
