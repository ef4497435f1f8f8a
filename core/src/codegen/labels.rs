//! Editor label map: `"<object>.<field>" -> "<field>"`.

use super::common::EntityContext;
use crate::error::{AppError, AppResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

/// Renders the label map as tab-indented JSON, keys in schema order.
pub(crate) fn generate_labels(ctx: &EntityContext) -> AppResult<String> {
    let labels: Map<String, Value> = ctx
        .fields
        .iter()
        .map(|f| {
            (
                format!("{}.{}", ctx.object, f.name),
                Value::String(f.name.clone()),
            )
        })
        .collect();

    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    Value::Object(labels)
        .serialize(&mut serializer)
        .map_err(|e| AppError::General(format!("Label serialization failed: {}", e)))?;

    String::from_utf8(out)
        .map_err(|e| AppError::General(format!("Label serialization failed: {}", e)))
}
