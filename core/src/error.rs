//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every variant except `Io` and `General` maps onto one failure class of the
//! generation run. Override-protected scripts are not errors; see
//! [`crate::writer::WriteOutcome`].

use derive_more::{Display, From};
use std::path::PathBuf;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The schema model file does not exist.
    #[from(ignore)]
    #[display("Model file wasn't found: {}", _0.display())]
    MissingModelFile(PathBuf),

    /// The schema model exists but could not be decoded or failed validation.
    #[from(ignore)]
    #[display("Malformed model: {_0}")]
    MalformedModel(String),

    /// A class filter named an entity that the model does not declare.
    #[from(ignore)]
    #[display("Entity {_0} wasn't found in the model")]
    UnknownEntityRequested(String),

    /// A field annotation is outside the supported grammar.
    #[from(ignore)]
    #[display("Unresolved type '{annotation}' for field '{entity}.{field}'")]
    UnresolvedFieldType {
        /// Owning entity name.
        entity: String,
        /// Field name inside the entity schema.
        field: String,
        /// The raw annotation string.
        annotation: String,
    },

    /// A generated function has no script slot in the target project.
    #[from(ignore)]
    #[display("Script {function} wasn't found in project ({})", path.display())]
    MissingTargetScript {
        /// The generated function name.
        function: String,
        /// The path that was expected to exist.
        path: PathBuf,
    },

    /// A generated snippet does not carry a `///@function` header.
    #[from(ignore)]
    #[display("Malformed snippet: {_0}")]
    MalformedSnippet(String),

    /// The existing registry script could not be parsed safely.
    #[from(ignore)]
    #[display("Registry parse failure at line {line}: {reason}")]
    RegistryParseFailure {
        /// 1-based line number inside the registry script.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
