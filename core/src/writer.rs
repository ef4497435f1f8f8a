#![deny(missing_docs)]

//! # Script Output
//!
//! Routes generated snippets to their script slots inside a GameMaker project.
//!
//! A snippet declares its function name in a `///@function name(...)` header line.
//! The slot for function `F` is `<root>/scripts/F/`, identified by its asset
//! descriptor `F.yy`; the generated body goes to `F.gml`.
//!
//! For each snippet the writer makes a three-way decision before touching disk:
//! - **Write**: the slot exists and is not protected; the script is replaced.
//! - **Skip**: the current script contains `///@override`; it is left alone.
//! - **Missing**: there is no slot; the run fails with `MissingTargetScript`.

use crate::codegen::CodeArtifact;
use crate::error::{AppError, AppResult};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Token that protects a hand-edited script from regeneration.
pub const OVERRIDE_MARKER: &str = "///@override";

/// Header token that names the function a snippet defines.
pub const FUNCTION_MARKER: &str = "///@function";

/// Extracts the declared function name from a snippet header.
///
/// The name is the identifier between `///@function` and the opening parenthesis.
pub fn parse_function_name(snippet: &str) -> AppResult<&str> {
    static FUNCTION_RE: OnceLock<Regex> = OnceLock::new();
    let re = FUNCTION_RE.get_or_init(|| {
        Regex::new(r"(?m)^///@function[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*\(")
            .expect("Invalid regex")
    });

    re.captures(snippet)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            let first_line = snippet.lines().next().unwrap_or_default();
            AppError::MalformedSnippet(format!(
                "no {} header found (starts with {:?})",
                FUNCTION_MARKER, first_line
            ))
        })
}

/// Whether existing script content is protected from regeneration.
///
/// Scripts are not required to be UTF-8; invalid bytes never hide the marker.
pub fn is_override_protected(content: &[u8]) -> bool {
    String::from_utf8_lossy(content).contains(OVERRIDE_MARKER)
}

/// Paths belonging to one script slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSlot {
    /// `<root>/scripts/F`
    pub dir: PathBuf,
    /// `<root>/scripts/F/F.yy`
    pub descriptor: PathBuf,
    /// `<root>/scripts/F/F.gml`
    pub script: PathBuf,
}

/// Naming convention for script slots inside a project.
#[derive(Debug, Clone)]
pub struct ScriptLayout {
    scripts_root: PathBuf,
}

impl ScriptLayout {
    /// Layout for the project rooted at `project_root` (the `.yyp` directory).
    pub fn new(project_root: &Path) -> Self {
        Self {
            scripts_root: project_root.join("scripts"),
        }
    }

    /// The `scripts` directory.
    pub fn scripts_root(&self) -> &Path {
        &self.scripts_root
    }

    /// Slot paths for `function`.
    pub fn slot(&self, function: &str) -> ScriptSlot {
        let dir = self.scripts_root.join(function);
        ScriptSlot {
            descriptor: dir.join(format!("{}.yy", function)),
            script: dir.join(format!("{}.gml", function)),
            dir,
        }
    }
}

/// The decision made for one snippet before any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteDecision {
    /// Replace the script content.
    Write,
    /// Leave the protected script untouched.
    Skip,
    /// No slot exists at the given path.
    Missing(PathBuf),
}

/// Decides what to do with `slot`.
pub fn decide(slot: &ScriptSlot) -> AppResult<WriteDecision> {
    if !slot.dir.is_dir() {
        return Ok(WriteDecision::Missing(slot.dir.clone()));
    }
    if !slot.descriptor.is_file() {
        return Ok(WriteDecision::Missing(slot.descriptor.clone()));
    }
    if slot.script.is_file() && is_override_protected(&fs::read(&slot.script)?) {
        return Ok(WriteDecision::Skip);
    }
    Ok(WriteDecision::Write)
}

/// What happened to one snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The script was replaced.
    Written {
        /// Function name.
        function: String,
        /// Script path.
        path: PathBuf,
    },
    /// The script carries the override marker and was left alone.
    OverrideProtected {
        /// Function name.
        function: String,
        /// Script path.
        path: PathBuf,
    },
}

/// A validated write, produced by [`OutputWriter::plan`].
#[derive(Debug, Clone)]
pub struct PlannedWrite<'a> {
    function: &'a str,
    slot: ScriptSlot,
    protected: bool,
    content: &'a str,
}

/// Writes generated script artifacts into a project.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    layout: ScriptLayout,
}

impl OutputWriter {
    /// Writer for the project rooted at `project_root`.
    pub fn new(project_root: &Path) -> Self {
        Self {
            layout: ScriptLayout::new(project_root),
        }
    }

    /// The slot naming convention in use.
    pub fn layout(&self) -> &ScriptLayout {
        &self.layout
    }

    /// Decides every snippet of `artifacts` without writing anything.
    ///
    /// Fails on the first snippet with no header or no slot. Label maps have no
    /// slot and are ignored.
    pub fn plan<'a>(&self, artifacts: &'a [CodeArtifact]) -> AppResult<Vec<PlannedWrite<'a>>> {
        let mut planned = Vec::new();

        for artifact in artifacts.iter().filter(|a| a.kind.is_script()) {
            for snippet in &artifact.snippets {
                let function = parse_function_name(snippet)?;
                let slot = self.layout.slot(function);

                let protected = match decide(&slot)? {
                    WriteDecision::Write => false,
                    WriteDecision::Skip => true,
                    WriteDecision::Missing(path) => {
                        return Err(AppError::MissingTargetScript {
                            function: function.to_string(),
                            path,
                        })
                    }
                };

                planned.push(PlannedWrite {
                    function,
                    slot,
                    protected,
                    content: snippet,
                });
            }
        }

        Ok(planned)
    }

    /// Applies a plan produced by [`OutputWriter::plan`].
    pub fn apply(&self, planned: &[PlannedWrite]) -> AppResult<Vec<WriteOutcome>> {
        planned
            .iter()
            .map(|p| {
                let function = p.function.to_string();
                let path = p.slot.script.clone();

                if p.protected {
                    warn!(
                        script = %path.display(),
                        "{}.gml couldn't be saved - @override exists", p.function
                    );
                    return Ok(WriteOutcome::OverrideProtected { function, path });
                }

                fs::write(&path, p.content)?;
                debug!(script = %path.display(), "saved {}", p.function);
                Ok(WriteOutcome::Written { function, path })
            })
            .collect()
    }

    /// Plans and applies `artifacts`.
    pub fn write(&self, artifacts: &[CodeArtifact]) -> AppResult<Vec<WriteOutcome>> {
        let planned = self.plan(artifacts)?;
        self.apply(&planned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::ArtifactKind;
    use tempfile::tempdir;

    fn make_slot(root: &Path, function: &str) -> ScriptSlot {
        let slot = ScriptLayout::new(root).slot(function);
        fs::create_dir_all(&slot.dir).unwrap();
        fs::write(&slot.descriptor, "{}").unwrap();
        slot
    }

    fn artifact(kind: ArtifactKind, snippets: &[&str]) -> CodeArtifact {
        CodeArtifact {
            kind,
            snippets: snippets.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_function_name() {
        let snippet = "///@function getCoinValue(coin)\n///@description Getter.\n";
        assert_eq!(parse_function_name(snippet).unwrap(), "getCoinValue");

        let no_params = "///@function initializeGameEntities()\r\n";
        assert_eq!(parse_function_name(no_params).unwrap(), "initializeGameEntities");
    }

    #[test]
    fn test_parse_function_name_missing_marker() {
        let res = parse_function_name("{ \"coin.value\": \"value\" }");
        assert!(matches!(res, Err(AppError::MalformedSnippet(_))));

        // The marker must start a line.
        let res = parse_function_name("\tvar x = \"///@function nope(\";");
        assert!(res.is_err());
    }

    #[test]
    fn test_decide_three_ways() {
        let dir = tempdir().unwrap();
        let layout = ScriptLayout::new(dir.path());

        let missing = layout.slot("createCoin");
        assert_eq!(decide(&missing).unwrap(), WriteDecision::Missing(missing.dir.clone()));

        // Directory without descriptor is still missing.
        fs::create_dir_all(&missing.dir).unwrap();
        assert_eq!(
            decide(&missing).unwrap(),
            WriteDecision::Missing(missing.descriptor.clone())
        );

        let slot = make_slot(dir.path(), "serializeCoin");
        assert_eq!(decide(&slot).unwrap(), WriteDecision::Write);

        fs::write(&slot.script, "///@function serializeCoin(coin)\n///@override\n").unwrap();
        assert_eq!(decide(&slot).unwrap(), WriteDecision::Skip);
    }

    #[test]
    fn test_write_replaces_unprotected_and_skips_protected() {
        let dir = tempdir().unwrap();
        let plain = make_slot(dir.path(), "getCoinValue");
        let kept = make_slot(dir.path(), "setCoinValue");
        fs::write(&plain.script, "old body").unwrap();
        fs::write(&kept.script, "///@override\nhand written").unwrap();

        let artifacts = vec![
            artifact(ArtifactKind::Getters, &["///@function getCoinValue(coin)\nnew getter"]),
            artifact(
                ArtifactKind::Setters,
                &["///@function setCoinValue(coin, value)\nnew setter"],
            ),
            artifact(ArtifactKind::LabelMap, &["{}"]),
        ];

        let writer = OutputWriter::new(dir.path());
        let outcomes = writer.write(&artifacts).unwrap();

        assert_eq!(
            outcomes,
            vec![
                WriteOutcome::Written {
                    function: "getCoinValue".into(),
                    path: plain.script.clone(),
                },
                WriteOutcome::OverrideProtected {
                    function: "setCoinValue".into(),
                    path: kept.script.clone(),
                },
            ]
        );
        assert_eq!(
            fs::read_to_string(&plain.script).unwrap(),
            "///@function getCoinValue(coin)\nnew getter"
        );
        assert_eq!(
            fs::read_to_string(&kept.script).unwrap(),
            "///@override\nhand written"
        );
    }

    #[test]
    fn test_non_utf8_scripts() {
        let dir = tempdir().unwrap();
        let latin1 = make_slot(dir.path(), "getCoinValue");
        let kept = make_slot(dir.path(), "setCoinValue");
        fs::write(&latin1.script, b"// caf\xe9\n\treturn 0;\n").unwrap();
        let protected_body = b"// caf\xe9\n///@override\n\targument0[@ 0] = 1;\n";
        fs::write(&kept.script, protected_body).unwrap();

        let artifacts = vec![
            artifact(ArtifactKind::Getters, &["///@function getCoinValue(coin)\nnew getter"]),
            artifact(
                ArtifactKind::Setters,
                &["///@function setCoinValue(coin, value)\nnew setter"],
            ),
        ];

        let outcomes = OutputWriter::new(dir.path()).write(&artifacts).unwrap();
        assert_eq!(
            outcomes,
            vec![
                WriteOutcome::Written {
                    function: "getCoinValue".into(),
                    path: latin1.script.clone(),
                },
                WriteOutcome::OverrideProtected {
                    function: "setCoinValue".into(),
                    path: kept.script.clone(),
                },
            ]
        );
        assert_eq!(
            fs::read_to_string(&latin1.script).unwrap(),
            "///@function getCoinValue(coin)\nnew getter"
        );
        assert_eq!(fs::read(&kept.script).unwrap(), protected_body.to_vec());
    }

    #[test]
    fn test_missing_slot_aborts_before_any_write() {
        let dir = tempdir().unwrap();
        let first = make_slot(dir.path(), "createCoin");
        fs::write(&first.script, "untouched").unwrap();

        let artifacts = vec![
            artifact(ArtifactKind::Create, &["///@function createCoin(value)\nbody"]),
            artifact(ArtifactKind::Destroy, &["///@function destroyCoin(coin)\nbody"]),
        ];

        let writer = OutputWriter::new(dir.path());
        match writer.write(&artifacts) {
            Err(AppError::MissingTargetScript { function, .. }) => {
                assert_eq!(function, "destroyCoin")
            }
            other => panic!("expected MissingTargetScript, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(&first.script).unwrap(), "untouched");
    }
}
