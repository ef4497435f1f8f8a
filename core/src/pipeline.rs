#![deny(missing_docs)]

//! # Build Pipeline
//!
//! Runs a full generation pass over a GameMaker project:
//!
//! 1. **Load** the schema model (fatal if missing).
//! 2. **Select** the requested entities (fatal on unknown names, before any write).
//! 3. **Per entity**: resolve fields, synthesize artifacts, plan every script
//!    write, then apply the plan. Optional label JSON goes to the labels directory.
//! 4. **Registry**: reconcile the registry script against the full model.
//!
//! Writes are not transactional. A failure part-way leaves earlier entities
//! regenerated and later ones untouched; the registry is only rewritten after
//! every selected entity succeeded.

use crate::codegen::{generate_entity_code, initial_to_lower, ArtifactKind, CodeArtifact};
use crate::error::{AppError, AppResult};
use crate::model::{load_model, select_entities, Entity};
use crate::registry::{reconcile, registry_function_name, RegistryEntry};
use crate::writer::{OutputWriter, WriteOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolved configuration for one generation run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Path to `model.json` (or `.yaml`).
    pub model_path: PathBuf,
    /// Root of the GameMaker project (the directory holding `scripts/`).
    pub project_root: PathBuf,
    /// Project name, used for the registry function name.
    pub project_name: String,
    /// Entity names to regenerate. Empty means all.
    pub classes: Vec<String>,
    /// Value written to `///@generated` headers. `None` omits the line.
    pub stamp: Option<String>,
    /// Where to write `<object>.json` label maps. `None` skips them.
    pub labels_dir: Option<PathBuf>,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Names of the entities whose artifacts were processed, in model order.
    pub entities: Vec<String>,
    /// Per-script outcomes, in write order.
    pub outcomes: Vec<WriteOutcome>,
    /// Label JSON files written.
    pub label_files: Vec<PathBuf>,
    /// Registry bindings after reconciliation.
    pub registry: Vec<RegistryEntry>,
}

impl BuildReport {
    /// Scripts that were replaced.
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, WriteOutcome::Written { .. }))
            .count()
    }

    /// Scripts left alone because of the override marker.
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.written()
    }
}

/// Runs the generation pipeline described by `options`.
pub fn build_entities(options: &BuildOptions) -> AppResult<BuildReport> {
    let model = load_model(&options.model_path)?;
    let selected = select_entities(&model, &options.classes)?;

    let writer = OutputWriter::new(&options.project_root);
    let mut report = BuildReport::default();

    for entity in selected {
        let artifacts = generate_entity_code(entity, options.stamp.as_deref())?;

        let planned = writer.plan(&artifacts)?;
        report.outcomes.extend(writer.apply(&planned)?);

        if let Some(dir) = &options.labels_dir {
            report.label_files.push(write_labels(dir, entity, &artifacts)?);
        }

        info!(entity = %entity.name, "Save {}", entity.name);
        report.entities.push(entity.name.clone());
    }

    report.registry = reconcile_registry(&options.project_root, &options.project_name, &model)?;

    Ok(report)
}

/// Rewrites the project's registry script from the full model.
pub fn reconcile_registry(
    project_root: &Path,
    project_name: &str,
    model: &[Entity],
) -> AppResult<Vec<RegistryEntry>> {
    let function = registry_function_name(project_name);
    let slot = OutputWriter::new(project_root).layout().slot(&function);

    if !slot.script.is_file() {
        return Err(AppError::MissingTargetScript {
            function,
            path: slot.script,
        });
    }

    let existing = fs::read(&slot.script)?;
    let (entries, text) = reconcile(&String::from_utf8_lossy(&existing), model, &function)?;
    fs::write(&slot.script, text)?;

    info!(bindings = entries.len(), "Save {}", function);
    Ok(entries)
}

fn write_labels(dir: &Path, entity: &Entity, artifacts: &[CodeArtifact]) -> AppResult<PathBuf> {
    let labels = artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::LabelMap)
        .and_then(|a| a.snippets.first())
        .ok_or_else(|| {
            AppError::General(format!("No label map generated for {}", entity.name))
        })?;

    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", initial_to_lower(&entity.name)));
    fs::write(&path, labels)?;
    Ok(path)
}
