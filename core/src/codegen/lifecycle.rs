//! Constructor and destructor generation.

use super::common::{EntityContext, FunctionHeader};
use super::templates::{template_for, CleanupOp, Traversal};
use crate::error::AppResult;
use crate::type_resolver::ResolvedField;

/// Generates `create<Class>(field0, field1, ...)`.
///
/// Required fields are passed through `assertNoOptional` before the setter.
pub(crate) fn generate_create(ctx: &EntityContext) -> String {
    let header = FunctionHeader {
        name: format!("create{}", ctx.class),
        description: format!("Constructor for {} entity.", ctx.class),
        params: ctx.field_params(),
        returns: Some((ctx.class.clone(), ctx.object.clone())),
    };

    let mut body = String::new();
    for (index, field) in ctx.fields.iter().enumerate() {
        body.push_str(&format!("\tvar {} = argument{};\n", field.name, index));
    }
    body.push_str("\t\n");
    body.push_str(&format!(
        "\tvar {} = createEntity({});\n\t\n",
        ctx.object, ctx.class
    ));

    for field in ctx.fields {
        let value = if field.ty.optional {
            field.name.clone()
        } else {
            format!("assertNoOptional({})", field.name)
        };
        body.push_str(&format!("\t{};\n", ctx.setter_call(&field.name, &value)));
    }

    body.push_str(&format!("\t\n\treturn {};\n\t\n", ctx.object));

    header.render(ctx.stamp) + &body
}

/// Generates `destroy<Class>(object)`.
///
/// Values that need cleanup are fetched up front; cleanup statements then
/// follow in schema order.
pub(crate) fn generate_destroy(ctx: &EntityContext) -> AppResult<String> {
    let header = FunctionHeader {
        name: format!("destroy{}", ctx.class),
        description: format!("Destroy {} entity.", ctx.class),
        params: vec![(ctx.object.clone(), ctx.class.clone())],
        returns: None,
    };

    let mut fetches = String::new();
    let mut cleanups = Vec::new();

    for field in ctx.fields {
        let template = template_for(field.ty.category, field.ty.shape)?;
        if template.cleanup.needs_value() {
            fetches.push_str(&format!(
                "\tvar {} = {};\n",
                field.name,
                ctx.getter_call(&field.name)
            ));
        }
        if let Some(block) = cleanup_block(ctx, field, template.cleanup) {
            cleanups.push(block);
        }
    }

    let mut body = format!("\tvar {} = argument0;\n", ctx.object);
    if !fetches.is_empty() {
        body.push_str("\t\n");
        body.push_str(&fetches);
    }
    for block in cleanups {
        body.push_str("\t\n");
        body.push_str(&block);
    }
    body.push_str("\t\n");

    Ok(header.render(ctx.stamp) + &body)
}

fn cleanup_block(ctx: &EntityContext, field: &ResolvedField, cleanup: CleanupOp) -> Option<String> {
    let name = field.name.as_str();
    let release = format!("\t{};\n", ctx.setter_call(name, "null"));
    let destroy_element = |indent: &str| {
        format!(
            "{}destroy{}(entity);\n",
            indent,
            super::common::initial_to_upper(&field.ty.element)
        )
    };

    let block = match cleanup {
        CleanupOp::None => return None,
        CleanupOp::Release => release,
        CleanupOp::DestroyStructure(structure) => {
            destroy_structure(ctx, name, structure) + &release
        }
        CleanupOp::DestroyEntity => {
            format!(
                "\tdestroy{}({});\n",
                super::common::initial_to_upper(&field.ty.element),
                name
            ) + &release
        }
        CleanupOp::Walk {
            traversal,
            structure,
        } => {
            let mut code = match traversal {
                Traversal::Indexed { length, accessor } => format!(
                    "\tfor (var index = 0; index < {length}({name}); index++) {{\n\
                     \t\tvar entity = {name}[{accessor} index];\n\
                     {destroy}\
                     \t}}\n",
                    destroy = destroy_element("\t\t"),
                ),
                Traversal::Draining { length, pop } => format!(
                    "\tvar {name}Size = {length}({name});\n\
                     \tfor (var index = 0; index < {name}Size; index++) {{\n\
                     \t\tvar entity = {pop}({name});\n\
                     {destroy}\
                     \t}}\n",
                    destroy = destroy_element("\t\t"),
                ),
                Traversal::Keyed => format!(
                    "\tfor (var key = mapFirst({name}); iteratorFinish(key); key = mapNext({name}, key)) {{\n\
                     \t\tvar entity = {name}[? key];\n\
                     {destroy}\
                     \t}}\n",
                    destroy = destroy_element("\t\t"),
                ),
                Traversal::Planar => format!(
                    "\tfor (var yIndex = 0; yIndex < getGridHeight({name}); yIndex++) {{\n\
                     \t\tfor (var xIndex = 0; xIndex < getGridWidth({name}); xIndex++) {{\n\
                     \t\t\tvar entity = {name}[# xIndex, yIndex];\n\
                     {destroy}\
                     \t\t}}\n\
                     \t}}\n",
                    destroy = destroy_element("\t\t\t"),
                ),
            };
            if let Some(structure) = structure {
                code.push_str(&destroy_structure(ctx, name, structure));
            }
            code + &release
        }
    };

    Some(block)
}

fn destroy_structure(ctx: &EntityContext, name: &str, structure: &str) -> String {
    format!(
        "\tdestroyDataStructure({name}, {structure}, \"Unable to destroy {structure} {name} in {class}\");\n",
        class = ctx.class
    )
}
