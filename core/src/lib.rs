#![deny(missing_docs)]

//! # Entigen Core
//!
//! Schema-driven generator for GameMaker entity lifecycle scripts.
//!
//! Given an entity model (field name -> type annotation), it produces the
//! constructor, JSON serializer/deserializer, destructor, positional accessors
//! and editor labels for every entity, writes them into the project's script
//! slots without clobbering `///@override` scripts, and keeps the entity
//! registry's numeric ids stable across regenerations.

/// Shared error types.
pub mod error;

/// Schema model loading and entity selection.
pub mod model;

/// Field annotation classification.
pub mod type_resolver;

/// GML code synthesis.
pub mod codegen;

/// Script slot resolution and override-aware writing.
pub mod writer;

/// Entity registry reconciliation.
pub mod registry;

/// End-to-end generation run.
pub mod pipeline;

pub use codegen::{generate_entity_code, synthesize, ArtifactKind, CodeArtifact};
pub use error::{AppError, AppResult};
pub use model::{load_model, parse_model, select_entities, Entity, RESERVED_FIELD_NAMES};
pub use pipeline::{build_entities, reconcile_registry, BuildOptions, BuildReport};
pub use registry::{
    merge_entries, parse_registry, reconcile, registry_function_name, render_registry,
    RegistryEntry, BASE_ID,
};
pub use type_resolver::{
    resolve_entity, Category, ResolvedField, ResolvedType, Shape, TypeResolver,
};
pub use writer::{
    is_override_protected, parse_function_name, OutputWriter, ScriptLayout, ScriptSlot,
    WriteDecision, WriteOutcome, FUNCTION_MARKER, OVERRIDE_MARKER,
};
