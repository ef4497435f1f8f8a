#![deny(missing_docs)]

//! # Code Synthesis
//!
//! Turns a resolved entity into GameMaker (GML) script functions.
//!
//! One entity yields seven artifacts:
//! - **Create**: `create<Class>(fields...)` constructor.
//! - **Serialize** / **Deserialize**: JSON round-trip through the runtime's JSON helpers.
//! - **Destroy**: releases data structures and referenced entities.
//! - **Getters** / **Setters**: one positional accessor per field.
//! - **LabelMap**: editor labels, emitted as JSON rather than a script.
//!
//! Per-field statements are selected from a table keyed by `(Category, Shape)`.

mod accessors;
mod common;
mod json;
mod labels;
mod lifecycle;
mod templates;

use crate::error::AppResult;
use crate::model::Entity;
use crate::type_resolver::{resolve_entity, ResolvedField};
use common::EntityContext;
use std::fmt::Display;

pub(crate) use common::{initial_to_lower, initial_to_upper};

/// The kind of generated artifact. Determines where the writer sends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Constructor.
    Create,
    /// Entity -> JSON string.
    Serialize,
    /// JSON string -> entity.
    Deserialize,
    /// Destructor.
    Destroy,
    /// Field getters.
    Getters,
    /// Field setters.
    Setters,
    /// `"<object>.<field>" -> "<field>"` JSON map.
    LabelMap,
}

impl ArtifactKind {
    /// Whether the artifact's snippets are script functions with a target slot.
    pub fn is_script(self) -> bool {
        !matches!(self, ArtifactKind::LabelMap)
    }
}

impl Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArtifactKind::Create => "Create",
            ArtifactKind::Serialize => "Serialize",
            ArtifactKind::Deserialize => "Deserialize",
            ArtifactKind::Destroy => "Destroy",
            ArtifactKind::Getters => "Getters",
            ArtifactKind::Setters => "Setters",
            ArtifactKind::LabelMap => "Entity labels",
        };
        write!(f, "{}", name)
    }
}

/// A group of generated snippets of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeArtifact {
    /// What was generated.
    pub kind: ArtifactKind,
    /// Source text, in schema order for per-field kinds.
    pub snippets: Vec<String>,
}

impl CodeArtifact {
    fn single(kind: ArtifactKind, snippet: String) -> Self {
        Self {
            kind,
            snippets: vec![snippet],
        }
    }
}

/// Synthesizes all artifacts for an already-resolved entity.
///
/// `stamp`, when present, is written into every function header as `///@generated`.
pub fn synthesize(
    entity: &Entity,
    fields: &[ResolvedField],
    stamp: Option<&str>,
) -> AppResult<Vec<CodeArtifact>> {
    let ctx = EntityContext::new(entity, fields, stamp);

    Ok(vec![
        CodeArtifact::single(ArtifactKind::Create, lifecycle::generate_create(&ctx)),
        CodeArtifact::single(ArtifactKind::Serialize, json::generate_serialize(&ctx)?),
        CodeArtifact::single(ArtifactKind::Deserialize, json::generate_deserialize(&ctx)?),
        CodeArtifact::single(ArtifactKind::Destroy, lifecycle::generate_destroy(&ctx)?),
        CodeArtifact {
            kind: ArtifactKind::Getters,
            snippets: accessors::generate_getters(&ctx),
        },
        CodeArtifact {
            kind: ArtifactKind::Setters,
            snippets: accessors::generate_setters(&ctx),
        },
        CodeArtifact::single(ArtifactKind::LabelMap, labels::generate_labels(&ctx)?),
    ])
}

/// Resolves and synthesizes an entity in one step.
pub fn generate_entity_code(entity: &Entity, stamp: Option<&str>) -> AppResult<Vec<CodeArtifact>> {
    let fields = resolve_entity(entity)?;
    synthesize(entity, &fields, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn coin() -> Entity {
        serde_json::from_str(
            r#"{ "name": "Coin", "schema": { "value": "number" }, "enums": [], "primitives": ["number"] }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_single_field_entity_artifacts() {
        let artifacts = generate_entity_code(&coin(), None).unwrap();
        assert_eq!(artifacts.len(), 7);

        let kinds: Vec<ArtifactKind> = artifacts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ArtifactKind::Create,
                ArtifactKind::Serialize,
                ArtifactKind::Deserialize,
                ArtifactKind::Destroy,
                ArtifactKind::Getters,
                ArtifactKind::Setters,
                ArtifactKind::LabelMap,
            ]
        );
        for artifact in &artifacts {
            assert_eq!(artifact.snippets.len(), 1, "{}", artifact.kind);
        }
        assert_eq!(artifacts.iter().filter(|a| a.kind.is_script()).count(), 6);
    }

    #[test]
    fn test_accessor_snippets_per_field() {
        let entity: Entity = serde_json::from_str(
            r#"{ "name": "Hero", "schema": { "a": "number", "b": "number", "c": "Hero" }, "primitives": ["number"] }"#,
        )
        .unwrap();
        let artifacts = generate_entity_code(&entity, None).unwrap();
        let getters = artifacts
            .iter()
            .find(|a| a.kind == ArtifactKind::Getters)
            .unwrap();
        assert_eq!(getters.snippets.len(), 3);
    }

    #[test]
    fn test_stamp_is_written_to_every_script() {
        let artifacts = generate_entity_code(&coin(), Some("2024-05-01T10:00:00Z")).unwrap();
        for artifact in artifacts.iter().filter(|a| a.kind.is_script()) {
            for snippet in &artifact.snippets {
                assert!(snippet.contains("///@generated {2024-05-01T10:00:00Z}\n"));
            }
        }
    }

    /// Expected emitted lines for one `(Category, Shape)` row, for a required
    /// field `slot` of entity `Holder`.
    struct Row {
        annotation: &'static str,
        append: &'static str,
        /// `None` for plain primitive arrays, which are cloned from a JSON array.
        lookup: Option<&'static str>,
        destroy: &'static [&'static str],
    }

    const ROWS: [Row; 16] = [
        Row {
            annotation: "number",
            append: r#"appendFieldToJsonObject(jsonObject, "slot", getHolderSlot(holder))"#,
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot")"#),
            destroy: &[],
        },
        Row {
            annotation: "number[]",
            append: r#"appendFieldToJsonObject(jsonObject, "slot", getHolderSlot(holder), Array)"#,
            lookup: None,
            destroy: &[],
        },
        Row {
            annotation: "List<number>",
            append: r#"appendFieldToJsonObject(jsonObject, "slot", getHolderSlot(holder), List)"#,
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", List)"#),
            destroy: &[
                r#"destroyDataStructure(slot, List, "Unable to destroy List slot in Holder");"#,
            ],
        },
        Row {
            annotation: "Map<String::number>",
            append: r#"appendFieldToJsonObject(jsonObject, "slot", getHolderSlot(holder), Map)"#,
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", Map)"#),
            destroy: &[
                r#"destroyDataStructure(slot, Map, "Unable to destroy Map slot in Holder");"#,
            ],
        },
        Row {
            annotation: "Stack<number>",
            append: r#"appendFieldToJsonObject(jsonObject, "slot", getHolderSlot(holder), Stack)"#,
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", Stack)"#),
            destroy: &[
                r#"destroyDataStructure(slot, Stack, "Unable to destroy Stack slot in Holder");"#,
            ],
        },
        Row {
            annotation: "Grid<number>",
            append: r#"appendFieldToJsonObject(jsonObject, "slot", getHolderSlot(holder), Grid)"#,
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", Grid)"#),
            destroy: &[
                r#"destroyDataStructure(slot, Grid, "Unable to destroy Grid slot in Holder");"#,
            ],
        },
        Row {
            annotation: "Queue<number>",
            append: r#"appendFieldToJsonObject(jsonObject, "slot", getHolderSlot(holder), Queue)"#,
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", Queue)"#),
            destroy: &[
                r#"destroyDataStructure(slot, Queue, "Unable to destroy Queue slot in Holder");"#,
            ],
        },
        Row {
            annotation: "PriorityQueue<number>",
            append: concat!(
                r#"appendFieldToJsonObject(jsonObject, "slot", getHolderSlot(holder), "#,
                "PriorityQueue)"
            ),
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", PriorityQueue)"#),
            destroy: &[concat!(
                "destroyDataStructure(slot, PriorityQueue, ",
                r#""Unable to destroy PriorityQueue slot in Holder");"#
            )],
        },
        Row {
            annotation: "Item",
            append: concat!(
                r#"appendEntityToJsonObject(jsonObject, "slot", getHolderSlot(holder), "#,
                r#""Item")"#
            ),
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", Entity, "Item")"#),
            destroy: &["destroyItem(slot);"],
        },
        Row {
            annotation: "Item[]",
            append: concat!(
                r#"appendEntityToJsonObject(jsonObject, "slot", getHolderSlot(holder), "Item", "#,
                "Array)"
            ),
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", Array, "Item")"#),
            destroy: &[
                "for (var index = 0; index < getArrayLength(slot); index++) {",
                "var entity = slot[@ index];",
                "destroyItem(entity);",
            ],
        },
        Row {
            annotation: "List<Item>",
            append: concat!(
                r#"appendEntityToJsonObject(jsonObject, "slot", getHolderSlot(holder), "Item", "#,
                "List)"
            ),
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", List, "Item")"#),
            destroy: &[
                "for (var index = 0; index < ds_list_size(slot); index++) {",
                "var entity = slot[| index];",
                "destroyItem(entity);",
                r#"destroyDataStructure(slot, List, "Unable to destroy List slot in Holder");"#,
            ],
        },
        Row {
            annotation: "Map<String::Item>",
            append: concat!(
                r#"appendEntityToJsonObject(jsonObject, "slot", getHolderSlot(holder), "Item", "#,
                "Map)"
            ),
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", Map, "Item")"#),
            destroy: &[
                "for (var key = mapFirst(slot); iteratorFinish(key); key = mapNext(slot, key)) {",
                "var entity = slot[? key];",
                "destroyItem(entity);",
                r#"destroyDataStructure(slot, Map, "Unable to destroy Map slot in Holder");"#,
            ],
        },
        Row {
            annotation: "Stack<Item>",
            append: concat!(
                r#"appendEntityToJsonObject(jsonObject, "slot", getHolderSlot(holder), "Item", "#,
                "Stack)"
            ),
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", Stack, "Item")"#),
            destroy: &[
                "var slotSize = getStackLength(slot);",
                "for (var index = 0; index < slotSize; index++) {",
                "var entity = popStack(slot);",
                "destroyItem(entity);",
                r#"destroyDataStructure(slot, Stack, "Unable to destroy Stack slot in Holder");"#,
            ],
        },
        Row {
            annotation: "Grid<Item>",
            append: concat!(
                r#"appendEntityToJsonObject(jsonObject, "slot", getHolderSlot(holder), "Item", "#,
                "Grid)"
            ),
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", Grid, "Item")"#),
            destroy: &[
                "for (var yIndex = 0; yIndex < getGridHeight(slot); yIndex++) {",
                "for (var xIndex = 0; xIndex < getGridWidth(slot); xIndex++) {",
                "var entity = slot[# xIndex, yIndex];",
                "destroyItem(entity);",
                r#"destroyDataStructure(slot, Grid, "Unable to destroy Grid slot in Holder");"#,
            ],
        },
        Row {
            annotation: "Queue<Item>",
            append: concat!(
                r#"appendEntityToJsonObject(jsonObject, "slot", getHolderSlot(holder), "Item", "#,
                "Queue)"
            ),
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", Queue, "Item")"#),
            destroy: &[
                "var slotSize = getQueueLength(slot);",
                "for (var index = 0; index < slotSize; index++) {",
                "var entity = popQueue(slot);",
                "destroyItem(entity);",
                r#"destroyDataStructure(slot, Queue, "Unable to destroy Queue slot in Holder");"#,
            ],
        },
        Row {
            annotation: "PriorityQueue<Item>",
            append: concat!(
                r#"appendEntityToJsonObject(jsonObject, "slot", getHolderSlot(holder), "Item", "#,
                "PriorityQueue)"
            ),
            lookup: Some(r#"getJsonObjectFieldValue(jsonObject, "slot", PriorityQueue, "Item")"#),
            destroy: &[
                "var slotSize = getPriorityQueueLength(slot);",
                "for (var index = 0; index < slotSize; index++) {",
                "var entity = popMinPriorityQueue(slot);",
                "destroyItem(entity);",
                concat!(
                    "destroyDataStructure(slot, PriorityQueue, ",
                    r#""Unable to destroy PriorityQueue slot in Holder");"#
                ),
            ],
        },
    ];

    fn snippet(artifacts: &[CodeArtifact], kind: ArtifactKind) -> &str {
        &artifacts.iter().find(|a| a.kind == kind).unwrap().snippets[0]
    }

    #[test]
    fn test_every_table_row_emits_its_statements() {
        for row in &ROWS {
            let json = format!(
                r#"{{ "name": "Holder", "schema": {{ "slot": "{}" }}, "primitives": ["number"] }}"#,
                row.annotation
            );
            let entity: Entity = serde_json::from_str(&json).unwrap();
            let artifacts = generate_entity_code(&entity, None).unwrap();
            let ann = row.annotation;

            let serialize = snippet(&artifacts, ArtifactKind::Serialize);
            assert!(serialize.contains(&format!("\t{};\n", row.append)), "{}:\n{}", ann, serialize);

            let deserialize = snippet(&artifacts, ArtifactKind::Deserialize);
            match row.lookup {
                Some(lookup) => assert!(
                    deserialize.contains(&format!("\tvar slot = assertNoOptional({});\n", lookup)),
                    "{}:\n{}",
                    ann,
                    deserialize
                ),
                None => {
                    let cloned = "\t\t\tslot = cloneArray(getJsonArrayData(slot));\n";
                    assert!(deserialize.contains(cloned), "{}:\n{}", ann, deserialize);
                    assert!(deserialize.contains("\tslot = assertNoOptional(slot);\n"));
                }
            }

            let destroy = snippet(&artifacts, ArtifactKind::Destroy);
            let fetches = destroy.contains("\tvar slot = getHolderSlot(holder);\n");
            let releases = destroy.contains("\tsetHolderSlot(holder, null);\n");
            match ann {
                "number" => assert!(!fetches && !releases, "{}:\n{}", ann, destroy),
                "number[]" => assert!(!fetches && releases, "{}:\n{}", ann, destroy),
                _ => assert!(fetches && releases, "{}:\n{}", ann, destroy),
            }

            // Statements appear in the listed order.
            let mut from = 0;
            for line in row.destroy {
                let at = destroy[from..]
                    .find(line)
                    .unwrap_or_else(|| panic!("{}: missing {:?} in\n{}", ann, line, destroy));
                from += at + line.len();
            }
        }
    }

    #[test]
    fn test_unresolved_field_aborts_entity() {
        let entity: Entity = serde_json::from_str(
            r#"{ "name": "Coin", "schema": { "value": "Set<number>" }, "primitives": ["number"] }"#,
        )
        .unwrap();
        let res = generate_entity_code(&entity, None);
        assert!(matches!(res, Err(AppError::UnresolvedFieldType { .. })));
    }
}
