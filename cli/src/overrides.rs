#![deny(missing_docs)]

//! # Overrides Command
//!
//! Lists every script in the project that carries `///@override` and is
//! therefore skipped by regeneration.

use crate::config::ProjectSettings;
use crate::error::{CliError, CliResult};
use entigen_core::{is_override_protected, ScriptLayout};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Arguments for the overrides command.
#[derive(clap::Args, Debug, Clone)]
pub struct OverridesArgs {
    /// GameMaker project directory (the one holding `scripts/`).
    #[clap(long, env = "ENTIGEN_PROJECT")]
    pub project: Option<PathBuf>,
}

/// Executes the overrides command.
pub fn execute(args: &OverridesArgs, settings_path: &Path) -> CliResult<()> {
    let project_root = match &args.project {
        Some(project) => project.clone(),
        None => ProjectSettings::load(settings_path)?.horizon_toolkit_settings.paths.yyp_path,
    };

    let found = find_overrides(&project_root)?;
    for path in &found {
        println!("{}", path.display());
    }
    println!("{} override-protected script(s).", found.len());
    Ok(())
}

/// Returns every `.gml` script under `<project_root>/scripts` containing the
/// override marker, sorted by path.
pub fn find_overrides(project_root: &Path) -> CliResult<Vec<PathBuf>> {
    let layout = ScriptLayout::new(project_root);
    let scripts = layout.scripts_root();

    if !scripts.is_dir() {
        return Err(CliError::General(format!(
            "Scripts directory not found: {}",
            scripts.display()
        )));
    }

    let mut found = Vec::new();
    let walker = WalkDir::new(scripts).sort_by_file_name().into_iter();

    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();

        if path.extension().is_some_and(|ext| ext == "gml")
            && is_override_protected(&fs::read(path)?)
        {
            found.push(path.to_path_buf());
        }
    }

    Ok(found)
}
