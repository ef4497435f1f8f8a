#![deny(missing_docs)]

//! # Type Resolution
//!
//! Classifies schema field annotations into a closed `(Category, Shape, optional)` triple.
//!
//! Grammar (one optional `Optional<...>` wrapper around exactly one of):
//!
//! ```text
//! T | T[] | List<T> | Map<K::V> | Stack<T> | Grid<T> | Queue<T> | PriorityQueue<T>
//! ```
//!
//! `T`/`V` are plain identifiers. Anything else is unresolvable.

use crate::error::{AppError, AppResult};
use crate::model::Entity;
use std::fmt::Display;

/// Whether a field's element type is a value or a reference to another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A primitive or enum value.
    Primitive,
    /// A reference to another entity class.
    Entity,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Primitive => write!(f, "primitive"),
            Category::Entity => write!(f, "entity"),
        }
    }
}

/// The container structure of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A single value.
    Scalar,
    /// `T[]`
    Array,
    /// `List<T>`
    List,
    /// `Map<K::V>`
    Map,
    /// `Stack<T>`
    Stack,
    /// `Grid<T>`
    Grid,
    /// `Queue<T>`
    Queue,
    /// `PriorityQueue<T>`
    PriorityQueue,
}

impl Shape {
    /// Every shape, in declaration order.
    pub const ALL: [Shape; 8] = [
        Shape::Scalar,
        Shape::Array,
        Shape::List,
        Shape::Map,
        Shape::Stack,
        Shape::Grid,
        Shape::Queue,
        Shape::PriorityQueue,
    ];

    /// Bracketed shapes in matching order. `PriorityQueue` precedes `Queue`.
    const GENERIC: [Shape; 6] = [
        Shape::Map,
        Shape::List,
        Shape::Stack,
        Shape::Grid,
        Shape::PriorityQueue,
        Shape::Queue,
    ];

    /// The collection keyword used both in annotations and in generated scripts.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Shape::Scalar => None,
            Shape::Array => Some("Array"),
            Shape::List => Some("List"),
            Shape::Map => Some("Map"),
            Shape::Stack => Some("Stack"),
            Shape::Grid => Some("Grid"),
            Shape::Queue => Some("Queue"),
            Shape::PriorityQueue => Some("PriorityQueue"),
        }
    }

    /// True for runtime data structures that must be explicitly destroyed.
    pub fn is_data_structure(self) -> bool {
        !matches!(self, Shape::Scalar | Shape::Array)
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword().unwrap_or("Scalar"))
    }
}

/// The classification of one annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Primitive or entity element.
    pub category: Category,
    /// Container shape.
    pub shape: Shape,
    /// Whether the annotation was wrapped in `Optional<...>`.
    pub optional: bool,
    /// The element type name (map value type for `Map`).
    pub element: String,
    /// The map key type, only for `Map`.
    pub key: Option<String>,
}

impl ResolvedType {
    /// The referenced entity class, if the element is an entity.
    pub fn referenced_type(&self) -> Option<&str> {
        match self.category {
            Category::Entity => Some(&self.element),
            Category::Primitive => None,
        }
    }
}

/// A schema field together with its resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    /// Field name, as declared.
    pub name: String,
    /// The raw annotation, kept for doc headers.
    pub annotation: String,
    /// Resolved classification.
    pub ty: ResolvedType,
}

/// Resolves annotations against one entity's primitive and enum names.
pub struct TypeResolver<'a> {
    primitives: &'a [String],
    enums: &'a [String],
}

impl<'a> TypeResolver<'a> {
    /// Creates a resolver over explicit value type sets.
    pub fn new(primitives: &'a [String], enums: &'a [String]) -> Self {
        Self { primitives, enums }
    }

    /// Creates a resolver over the value types declared by `entity`.
    pub fn for_entity(entity: &'a Entity) -> Self {
        Self::new(&entity.primitives, &entity.enums)
    }

    /// Classifies `annotation`, or returns `None` if it is outside the grammar.
    pub fn resolve(&self, annotation: &str) -> Option<ResolvedType> {
        let text = annotation.trim();
        let (optional, body) = match unwrap_generic(text, "Optional") {
            Some(inner) => (true, inner.trim()),
            None => (false, text),
        };

        let (shape, key, element) = split_shape(body)?;
        let category = if self.is_value_type(element) {
            Category::Primitive
        } else {
            Category::Entity
        };

        Some(ResolvedType {
            category,
            shape,
            optional,
            element: element.to_string(),
            key: key.map(str::to_string),
        })
    }

    fn is_value_type(&self, name: &str) -> bool {
        self.primitives.iter().any(|p| p == name) || self.enums.iter().any(|e| e == name)
    }
}

/// Resolves every field of `entity`, in schema order.
///
/// The first annotation outside the grammar aborts with `UnresolvedFieldType`.
pub fn resolve_entity(entity: &Entity) -> AppResult<Vec<ResolvedField>> {
    let resolver = TypeResolver::for_entity(entity);

    entity
        .schema
        .iter()
        .map(|(name, annotation)| {
            let ty = resolver
                .resolve(annotation)
                .ok_or_else(|| AppError::UnresolvedFieldType {
                    entity: entity.name.clone(),
                    field: name.clone(),
                    annotation: annotation.clone(),
                })?;
            Ok(ResolvedField {
                name: name.clone(),
                annotation: annotation.clone(),
                ty,
            })
        })
        .collect()
}

/// Splits an unwrapped body into shape, map key and element type.
fn split_shape(body: &str) -> Option<(Shape, Option<&str>, &str)> {
    for shape in Shape::GENERIC {
        let Some(keyword) = shape.keyword() else {
            continue;
        };
        let Some(inner) = unwrap_generic(body, keyword) else {
            continue;
        };

        if shape == Shape::Map {
            let (key, value) = inner.split_once("::")?;
            let (key, value) = (key.trim(), value.trim());
            return (is_identifier(key) && is_identifier(value))
                .then_some((shape, Some(key), value));
        }

        let inner = inner.trim();
        return is_identifier(inner).then_some((shape, None, inner));
    }

    if let Some(inner) = body.strip_suffix("[]") {
        let inner = inner.trim();
        return is_identifier(inner).then_some((Shape::Array, None, inner));
    }

    is_identifier(body).then_some((Shape::Scalar, None, body))
}

/// Returns the text between `<keyword><` and the final `>`.
fn unwrap_generic<'s>(text: &'s str, keyword: &str) -> Option<&'s str> {
    text.strip_prefix(keyword)?
        .trim_start()
        .strip_prefix('<')?
        .strip_suffix('>')
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
