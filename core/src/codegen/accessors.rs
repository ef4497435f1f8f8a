//! Positional getters and setters.
//!
//! A field's storage slot is its index in schema order, so reordering schema
//! fields changes the runtime layout of previously serialized entities.

use super::common::{EntityContext, FunctionHeader};

/// One `get<Class><Field>` function per field.
pub(crate) fn generate_getters(ctx: &EntityContext) -> Vec<String> {
    ctx.fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let header = FunctionHeader {
                name: ctx.getter_name(&field.name),
                description: "Getter.".into(),
                params: vec![(ctx.object.clone(), ctx.class.clone())],
                returns: Some((field.annotation.clone(), field.name.clone())),
            };
            header.render(ctx.stamp) + &format!("\treturn argument0[@ {}];\n\t\n", index)
        })
        .collect()
}

/// One `set<Class><Field>` function per field.
pub(crate) fn generate_setters(ctx: &EntityContext) -> Vec<String> {
    ctx.fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let header = FunctionHeader {
                name: ctx.setter_name(&field.name),
                description: "Setter.".into(),
                params: vec![
                    (ctx.object.clone(), ctx.class.clone()),
                    (field.name.clone(), field.annotation.clone()),
                ],
                returns: None,
            };
            header.render(ctx.stamp) + &format!("\targument0[@ {}] = argument1;\n\t\n", index)
        })
        .collect()
}
