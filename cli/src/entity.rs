#![deny(missing_docs)]

//! # Entity Command
//!
//! Regenerates entity scripts inside a GameMaker project and reconciles the
//! entity registry.
//!
//! Settings come from `yyp-package.json`; every path and the project name can
//! be overridden from the command line or the environment.

use crate::config::ProjectSettings;
use crate::error::{CliError, CliResult};
use chrono::{SecondsFormat, Utc};
use entigen_core::{build_entities, BuildOptions, BuildReport};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Arguments for the entity command.
#[derive(clap::Args, Debug, Clone)]
pub struct EntityArgs {
    /// Entities to regenerate. All entities are built when none are given.
    pub classes: Vec<String>,

    /// Schema model file (JSON or YAML).
    #[clap(long, env = "ENTIGEN_MODEL")]
    pub model: Option<PathBuf>,

    /// GameMaker project directory (the one holding `scripts/`).
    #[clap(long, env = "ENTIGEN_PROJECT")]
    pub project: Option<PathBuf>,

    /// Project name used for the registry function.
    #[clap(long)]
    pub name: Option<String>,

    /// Write `<object>.json` label maps into this directory.
    #[clap(long)]
    pub labels_dir: Option<PathBuf>,

    /// Omit the `///@generated` timestamp from function headers.
    #[clap(long)]
    pub no_stamp: bool,
}

/// Executes the entity command.
///
/// # Arguments
///
/// * `args` - Command arguments.
/// * `settings_path` - Location of `yyp-package.json`.
pub fn execute(args: &EntityArgs, settings_path: &Path) -> CliResult<()> {
    let settings = ProjectSettings::load_optional(settings_path)?;
    let stamp = (!args.no_stamp).then(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    let options = resolve_options(args, settings.as_ref(), stamp).map_err(|e| match e {
        CliError::MissingSetting(_) if settings.is_none() => {
            CliError::MissingSettings(settings_path.to_path_buf())
        }
        other => other,
    })?;
    debug!(?options, "resolved build options");

    let report = build_entities(&options)?;
    print_summary(&report);
    Ok(())
}

/// Merges command line overrides with the settings file.
pub fn resolve_options(
    args: &EntityArgs,
    settings: Option<&ProjectSettings>,
    stamp: Option<String>,
) -> CliResult<BuildOptions> {
    let paths = settings.map(|s| &s.horizon_toolkit_settings.paths);

    let model_path = args
        .model
        .clone()
        .or_else(|| paths.map(|p| p.model_path.clone()))
        .ok_or(CliError::MissingSetting("model"))?;
    let project_root = args
        .project
        .clone()
        .or_else(|| paths.map(|p| p.yyp_path.clone()))
        .ok_or(CliError::MissingSetting("project"))?;
    let project_name = args
        .name
        .clone()
        .or_else(|| settings.map(|s| s.name.clone()))
        .ok_or(CliError::MissingSetting("name"))?;

    Ok(BuildOptions {
        model_path,
        project_root,
        project_name,
        classes: args.classes.clone(),
        stamp,
        labels_dir: args.labels_dir.clone(),
    })
}

fn print_summary(report: &BuildReport) {
    for entity in &report.entities {
        println!("Generated {}", entity);
    }
    if report.skipped() > 0 {
        println!(
            "{} script(s) kept because of ///@override (run `entigen overrides` to list them).",
            report.skipped()
        );
    }
    for path in &report.label_files {
        println!("Labels: {}", path.display());
    }
    println!(
        "Done: {} script(s) written, {} registry binding(s).",
        report.written(),
        report.registry.len()
    );
}
