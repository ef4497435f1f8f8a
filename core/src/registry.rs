#![deny(missing_docs)]

//! # Entity Registry
//!
//! Maintains the generated `initialize<Project>Entities` script that binds each
//! entity class name to a stable numeric id and its prototype (field) count.
//!
//! The script is round-tripped through [`RegistryEntry`] values:
//! 1. **Parse** the existing bindings (`#macro` ids and `global.entityPrototypes` sizes).
//! 2. **Merge**: keep every known binding in its original order, append model
//!    entities that are not yet bound with fresh ids.
//! 3. **Render** the whole script from scratch.
//!
//! Known ids never change. Classes that left the model keep their binding so
//! their id cannot be handed to a new class.

use crate::codegen::initial_to_upper;
use crate::error::{AppError, AppResult};
use crate::model::Entity;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::warn;

/// Ids are allocated above this offset.
pub const BASE_ID: u64 = 200200;

/// A class name bound to its numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Entity class name (also the GML macro name).
    pub class_name: String,
    /// Stable numeric id.
    pub numeric_id: u64,
    /// Number of schema fields.
    pub prototype: usize,
}

/// Name of the registry function for a project: `initialize<Project>Entities`.
pub fn registry_function_name(project_name: &str) -> String {
    format!("initialize{}Entities", initial_to_upper(project_name))
}

#[derive(Default)]
struct PartialEntry {
    line: usize,
    id: Option<u64>,
    prototype: Option<usize>,
}

fn parse_number<T: std::str::FromStr>(text: &str, line: usize, what: &str) -> AppResult<T> {
    text.trim()
        .parse()
        .map_err(|_| AppError::RegistryParseFailure {
            line,
            reason: format!("{} '{}' is not an integer", what, text.trim()),
        })
}

/// Parses the bindings of an existing registry script, in entry order.
///
/// An entry without a `#macro` line gets the id implied by its position
/// (`BASE_ID + position`, 1-based).
pub fn parse_registry(text: &str) -> AppResult<Vec<RegistryEntry>> {
    static MACRO_RE: OnceLock<Regex> = OnceLock::new();
    let macro_re = MACRO_RE.get_or_init(|| {
        Regex::new(r"^\s*#macro\s+([A-Za-z_][A-Za-z0-9_]*)\s+(\S+)\s*$").expect("Invalid regex")
    });

    static PROTOTYPE_RE: OnceLock<Regex> = OnceLock::new();
    let prototype_re = PROTOTYPE_RE.get_or_init(|| {
        Regex::new(r"global\.entityPrototypes\[\?\s*([^\]\s]+)\s*\]\s*=\s*([^;]*);")
            .expect("Invalid regex")
    });

    let mut partial: IndexMap<String, PartialEntry> = IndexMap::new();

    for (index, line_text) in text.lines().enumerate() {
        let line = index + 1;

        if let Some(caps) = macro_re.captures(line_text) {
            let entry = partial.entry(caps[1].to_string()).or_insert(PartialEntry {
                line,
                ..Default::default()
            });
            if entry.id.is_some() {
                return Err(AppError::RegistryParseFailure {
                    line,
                    reason: format!("class {} has more than one #macro id", &caps[1]),
                });
            }
            entry.id = Some(parse_number(&caps[2], line, "id")?);
        }

        for caps in prototype_re.captures_iter(line_text) {
            let entry = partial.entry(caps[1].to_string()).or_insert(PartialEntry {
                line,
                ..Default::default()
            });
            if entry.prototype.is_some() {
                return Err(AppError::RegistryParseFailure {
                    line,
                    reason: format!("class {} is registered more than once", &caps[1]),
                });
            }
            entry.prototype = Some(parse_number(&caps[2], line, "prototype count")?);
        }
    }

    let mut entries = Vec::with_capacity(partial.len());
    let mut seen_ids = HashSet::new();

    for (position, (class_name, entry)) in partial.into_iter().enumerate() {
        let prototype = entry.prototype.ok_or_else(|| AppError::RegistryParseFailure {
            line: entry.line,
            reason: format!("class {} has no prototype registration", class_name),
        })?;
        let numeric_id = entry.id.unwrap_or(BASE_ID + position as u64 + 1);

        if !seen_ids.insert(numeric_id) {
            return Err(AppError::RegistryParseFailure {
                line: entry.line,
                reason: format!("id {} of class {} is already bound", numeric_id, class_name),
            });
        }

        entries.push(RegistryEntry {
            class_name,
            numeric_id,
            prototype,
        });
    }

    Ok(entries)
}

/// Preserves `known` bindings and appends unbound model entities.
///
/// Known entries take their prototype count from the model when the class is
/// still declared. New ids continue after the highest known id; running out of
/// ids is an error.
pub fn merge_entries(
    known: Vec<RegistryEntry>,
    model: &[Entity],
) -> AppResult<Vec<RegistryEntry>> {
    let mut next_id = known
        .iter()
        .map(|e| e.numeric_id)
        .max()
        .unwrap_or(BASE_ID)
        .max(BASE_ID);

    let mut bound: HashSet<String> = HashSet::new();
    let mut entries = Vec::with_capacity(known.len() + model.len());

    for mut entry in known {
        match model.iter().find(|e| e.name == entry.class_name) {
            Some(entity) => entry.prototype = entity.prototype_count(),
            None => warn!(
                class = %entry.class_name,
                id = entry.numeric_id,
                "registry binding has no entity in the model; keeping it"
            ),
        }
        bound.insert(entry.class_name.clone());
        entries.push(entry);
    }

    for entity in model {
        if bound.insert(entity.name.clone()) {
            next_id = next_id.checked_add(1).ok_or_else(|| {
                AppError::General(format!(
                    "No registry id left for class {} (highest id is {})",
                    entity.name, next_id
                ))
            })?;
            entries.push(RegistryEntry {
                class_name: entity.name.clone(),
                numeric_id: next_id,
                prototype: entity.prototype_count(),
            });
        }
    }

    Ok(entries)
}

/// Renders the registry script.
pub fn render_registry(function_name: &str, entries: &[RegistryEntry]) -> String {
    let mut code = format!("///@function {}()\r\n\r\n", function_name);
    for entry in entries {
        code.push_str(&format!(
            "\t#macro {name} {id}\r\n\
             \tglobal.entityPrototypes[? {name}] = {prototype};\r\n\
             \tglobal.entityClassNames[? {name}] = \"{name}\";\r\n\
             \t\r\n",
            name = entry.class_name,
            id = entry.numeric_id,
            prototype = entry.prototype,
        ));
    }
    code
}

/// Reconciles an existing registry script against the model.
///
/// Returns the merged bindings and the new script text.
pub fn reconcile(
    existing: &str,
    model: &[Entity],
    function_name: &str,
) -> AppResult<(Vec<RegistryEntry>, String)> {
    let known = parse_registry(existing)?;
    let entries = merge_entries(known, model)?;
    let text = render_registry(function_name, &entries);
    Ok((entries, text))
}
