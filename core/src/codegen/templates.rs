//! Per-`(Category, Shape)` generation table.
//!
//! Each of the 16 combinations names the JSON append operation used by the
//! serializer, the extraction used by the deserializer, and the cleanup the
//! destructor performs.

use crate::error::{AppError, AppResult};
use crate::type_resolver::Category::{Entity as E, Primitive as P};
use crate::type_resolver::{Category, Shape};
use self::AppendOp as A;
use self::CleanupOp as C;
use self::ExtractOp as X;

/// How `serialize<Class>` appends a field to the JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppendOp {
    /// `appendFieldToJsonObject(jsonObject, label, value[, Shape])`
    Field(Option<&'static str>),
    /// `appendEntityToJsonObject(jsonObject, label, value, "Type"[, Shape])`
    Entity(Option<&'static str>),
}

/// How `deserialize<Class>` extracts a field from the JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExtractOp {
    /// `getJsonObjectFieldValue(jsonObject, label[, Shape])`
    Value(Option<&'static str>),
    /// Plain arrays arrive as JSON arrays and are cloned into a native array.
    ClonedArray,
    /// `getJsonObjectFieldValue(jsonObject, label, Shape, "Type")`
    Entity(&'static str),
}

/// Loop used to visit every element of an entity container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Traversal {
    /// Index loop reading through an accessor (`[@ index]`, `[| index]`).
    Indexed {
        length: &'static str,
        accessor: &'static str,
    },
    /// Index loop that pops one element per iteration.
    Draining {
        length: &'static str,
        pop: &'static str,
    },
    /// Key iteration over a map.
    Keyed,
    /// Nested loop over both grid axes.
    Planar,
}

/// What `destroy<Class>` does with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CleanupOp {
    /// Nothing to release.
    None,
    /// Drop the reference through the setter.
    Release,
    /// Destroy the data structure, then drop the reference.
    DestroyStructure(&'static str),
    /// Destroy the referenced entity, then drop the reference.
    DestroyEntity,
    /// Destroy every element, optionally the structure, then drop the reference.
    Walk {
        traversal: Traversal,
        structure: Option<&'static str>,
    },
}

impl CleanupOp {
    /// Whether the destructor needs the current value fetched first.
    pub(crate) fn needs_value(self) -> bool {
        !matches!(self, CleanupOp::None | CleanupOp::Release)
    }
}

/// One row of the generation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldTemplate {
    pub(crate) category: Category,
    pub(crate) shape: Shape,
    pub(crate) append: AppendOp,
    pub(crate) extract: ExtractOp,
    pub(crate) cleanup: CleanupOp,
}

const fn row(
    category: Category,
    shape: Shape,
    append: AppendOp,
    extract: ExtractOp,
    cleanup: CleanupOp,
) -> FieldTemplate {
    FieldTemplate {
        category,
        shape,
        append,
        extract,
        cleanup,
    }
}

pub(crate) static TEMPLATES: [FieldTemplate; 16] = [
    row(P, Shape::Scalar, A::Field(None), X::Value(None), C::None),
    row(P, Shape::Array, A::Field(Some("Array")), X::ClonedArray, C::Release),
    row(
        P,
        Shape::List,
        A::Field(Some("List")),
        X::Value(Some("List")),
        C::DestroyStructure("List"),
    ),
    row(P, Shape::Map, A::Field(Some("Map")), X::Value(Some("Map")), C::DestroyStructure("Map")),
    row(
        P,
        Shape::Stack,
        A::Field(Some("Stack")),
        X::Value(Some("Stack")),
        C::DestroyStructure("Stack"),
    ),
    row(
        P,
        Shape::Grid,
        A::Field(Some("Grid")),
        X::Value(Some("Grid")),
        C::DestroyStructure("Grid"),
    ),
    row(
        P,
        Shape::Queue,
        A::Field(Some("Queue")),
        X::Value(Some("Queue")),
        C::DestroyStructure("Queue"),
    ),
    row(
        P,
        Shape::PriorityQueue,
        A::Field(Some("PriorityQueue")),
        X::Value(Some("PriorityQueue")),
        C::DestroyStructure("PriorityQueue"),
    ),
    row(E, Shape::Scalar, A::Entity(None), X::Entity("Entity"), C::DestroyEntity),
    row(
        E,
        Shape::Array,
        A::Entity(Some("Array")),
        X::Entity("Array"),
        C::Walk {
            traversal: Traversal::Indexed {
                length: "getArrayLength",
                accessor: "@",
            },
            structure: None,
        },
    ),
    row(
        E,
        Shape::List,
        A::Entity(Some("List")),
        X::Entity("List"),
        C::Walk {
            traversal: Traversal::Indexed {
                length: "ds_list_size",
                accessor: "|",
            },
            structure: Some("List"),
        },
    ),
    row(
        E,
        Shape::Map,
        A::Entity(Some("Map")),
        X::Entity("Map"),
        C::Walk {
            traversal: Traversal::Keyed,
            structure: Some("Map"),
        },
    ),
    row(
        E,
        Shape::Stack,
        A::Entity(Some("Stack")),
        X::Entity("Stack"),
        C::Walk {
            traversal: Traversal::Draining {
                length: "getStackLength",
                pop: "popStack",
            },
            structure: Some("Stack"),
        },
    ),
    row(
        E,
        Shape::Grid,
        A::Entity(Some("Grid")),
        X::Entity("Grid"),
        C::Walk {
            traversal: Traversal::Planar,
            structure: Some("Grid"),
        },
    ),
    row(
        E,
        Shape::Queue,
        A::Entity(Some("Queue")),
        X::Entity("Queue"),
        C::Walk {
            traversal: Traversal::Draining {
                length: "getQueueLength",
                pop: "popQueue",
            },
            structure: Some("Queue"),
        },
    ),
    row(
        E,
        Shape::PriorityQueue,
        A::Entity(Some("PriorityQueue")),
        X::Entity("PriorityQueue"),
        C::Walk {
            traversal: Traversal::Draining {
                length: "getPriorityQueueLength",
                pop: "popMinPriorityQueue",
            },
            structure: Some("PriorityQueue"),
        },
    ),
];

/// Looks up the generation row for a resolved field.
///
/// A missing row is a generator bug and aborts the entity.
pub(crate) fn template_for(category: Category, shape: Shape) -> AppResult<&'static FieldTemplate> {
    TEMPLATES
        .iter()
        .find(|t| t.category == category && t.shape == shape)
        .ok_or_else(|| {
            AppError::General(format!(
                "No generation template for {} {} field",
                category, shape
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_combination_has_exactly_one_row() {
        for category in [Category::Primitive, Category::Entity] {
            for shape in Shape::ALL {
                let rows = TEMPLATES
                    .iter()
                    .filter(|t| t.category == category && t.shape == shape)
                    .count();
                assert_eq!(rows, 1, "{} {}", category, shape);
                assert!(template_for(category, shape).is_ok());
            }
        }
    }

    #[test]
    fn test_shape_tokens_match_keywords() {
        for t in &TEMPLATES {
            let token = match t.append {
                AppendOp::Field(token) | AppendOp::Entity(token) => token,
            };
            assert_eq!(token, t.shape.keyword(), "{} {}", t.category, t.shape);
        }
    }

    #[test]
    fn test_cleanup_set() {
        // Only primitive scalars and plain primitive arrays skip the value fetch.
        for t in &TEMPLATES {
            let expected = t.category == Category::Entity || t.shape.is_data_structure();
            assert_eq!(t.cleanup.needs_value(), expected, "{} {}", t.category, t.shape);
        }
    }
}
