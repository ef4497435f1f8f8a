#![deny(missing_docs)]

//! # Schema Model
//!
//! Loads the declarative entity model (`model.json`) and selects the subset of
//! entities a run should process.
//!
//! The model is a JSON array of records:
//!
//! ```json
//! [{ "name": "Coin", "schema": { "value": "number" }, "enums": [], "primitives": ["number"] }]
//! ```
//!
//! Field order inside `schema` is significant and preserved through an `IndexMap`.
//!
//! Entity names must start with an uppercase letter, since the name is used
//! verbatim as the registry macro. Field names must be identifiers that do not
//! shadow the locals of generated scripts.

use crate::codegen::initial_to_lower;
use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Locals declared by generated scripts; a field with one of these names would shadow them.
pub const RESERVED_FIELD_NAMES: [&str; 8] = [
    "entity",
    "index",
    "key",
    "xIndex",
    "yIndex",
    "jsonObject",
    "jsonString",
    "exceptionMessage",
];

fn class_name_re() -> &'static Regex {
    static CLASS_RE: OnceLock<Regex> = OnceLock::new();
    CLASS_RE.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9_]*$").expect("Invalid regex"))
}

fn field_name_re() -> &'static Regex {
    static FIELD_RE: OnceLock<Regex> = OnceLock::new();
    FIELD_RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex"))
}

/// One entity declaration from the schema model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entity {
    /// Stable external identifier of the entity class.
    pub name: String,
    /// Ordered field name -> type annotation map.
    pub schema: IndexMap<String, String>,
    /// Names resolved as enum values (treated like primitives).
    #[serde(default)]
    pub enums: Vec<String>,
    /// Names resolved as primitive values.
    #[serde(default)]
    pub primitives: Vec<String>,
}

impl Entity {
    /// Number of declared fields, stored as the prototype size in the registry.
    pub fn prototype_count(&self) -> usize {
        self.schema.len()
    }

    fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::MalformedModel(
                "entity with an empty name".to_string(),
            ));
        }
        // The class name doubles as the registry macro and the `createEntity` argument.
        if !class_name_re().is_match(&self.name) {
            return Err(AppError::MalformedModel(format!(
                "entity name '{}' must be an identifier starting with an uppercase letter",
                self.name
            )));
        }

        let object = initial_to_lower(&self.name);
        let serialized = format!("{}JsonString", object);
        for (field, annotation) in &self.schema {
            if field.trim().is_empty() {
                return Err(AppError::MalformedModel(format!(
                    "entity '{}' declares a field with an empty name",
                    self.name
                )));
            }
            if annotation.trim().is_empty() {
                return Err(AppError::MalformedModel(format!(
                    "field '{}.{}' has an empty type annotation",
                    self.name, field
                )));
            }
            if !field_name_re().is_match(field) || field.starts_with("argument") {
                return Err(AppError::MalformedModel(format!(
                    "field '{}.{}' is not a valid field name",
                    self.name, field
                )));
            }
            if RESERVED_FIELD_NAMES.contains(&field.as_str())
                || *field == object
                || *field == serialized
            {
                return Err(AppError::MalformedModel(format!(
                    "field '{}.{}' clashes with a generated local variable",
                    self.name, field
                )));
            }
        }
        Ok(())
    }
}

/// Reads and validates the schema model.
///
/// JSON is the native format. Files ending in `.yaml`/`.yml` are decoded as YAML
/// with the same shape.
pub fn load_model(path: &Path) -> AppResult<Vec<Entity>> {
    if !path.exists() {
        return Err(AppError::MissingModelFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let model = match ext {
        "yaml" | "yml" => parse_model_yaml(&content)?,
        _ => parse_model(&content)?,
    };

    Ok(model)
}

/// Decodes a JSON model document.
pub fn parse_model(content: &str) -> AppResult<Vec<Entity>> {
    let model: Vec<Entity> = serde_json::from_str(content)
        .map_err(|e| AppError::MalformedModel(format!("invalid JSON: {}", e)))?;
    validate_model(&model)?;
    Ok(model)
}

fn parse_model_yaml(content: &str) -> AppResult<Vec<Entity>> {
    let model: Vec<Entity> = serde_yaml::from_str(content)
        .map_err(|e| AppError::MalformedModel(format!("invalid YAML: {}", e)))?;
    validate_model(&model)?;
    Ok(model)
}

fn validate_model(model: &[Entity]) -> AppResult<()> {
    model.iter().try_for_each(Entity::validate)
}

/// Selects the entities requested by `classes`.
///
/// An empty filter selects the whole model. Otherwise every requested name must
/// be declared; the first unknown name fails the run before anything is written.
/// The selection keeps model order.
pub fn select_entities<'a>(model: &'a [Entity], classes: &[String]) -> AppResult<Vec<&'a Entity>> {
    if classes.is_empty() {
        return Ok(model.iter().collect());
    }

    if let Some(unknown) = classes
        .iter()
        .find(|class| !model.iter().any(|entity| &entity.name == *class))
    {
        return Err(AppError::UnknownEntityRequested(unknown.clone()));
    }

    Ok(model
        .iter()
        .filter(|entity| classes.contains(&entity.name))
        .collect())
}
