//! JSON serializer and deserializer generation.

use super::common::{EntityContext, FunctionHeader};
use super::templates::{template_for, AppendOp, ExtractOp};
use crate::error::AppResult;
use crate::type_resolver::ResolvedField;

/// Generates `serialize<Class>(object)` returning a JSON string.
pub(crate) fn generate_serialize(ctx: &EntityContext) -> AppResult<String> {
    let header = FunctionHeader {
        name: format!("serialize{}", ctx.class),
        description: format!("Serialize {} to JSON string.", ctx.class),
        params: vec![(ctx.object.clone(), ctx.class.clone())],
        returns: Some(("String".into(), format!("{}JsonString", ctx.object))),
    };

    let mut body = format!(
        "\tvar {} = argument0;\n\t\n\tvar jsonObject = createJsonObject();\n\t\n",
        ctx.object
    );

    for field in ctx.fields {
        let template = template_for(field.ty.category, field.ty.shape)?;
        let value = ctx.getter_call(&field.name);
        let call = append_call(field, &value, template.append);

        if field.ty.optional {
            body.push_str(&format!(
                "\tif (isOptionalPresent({})) {{\n\t\t{};\n\t}}\n",
                value, call
            ));
        } else {
            body.push_str(&format!("\t{};\n", call));
        }
    }

    body.push_str(&format!(
        "\t\n\tvar {object}JsonString = encodeJson(jsonObject);\n\t\n\treturn {object}JsonString;\n\t\n",
        object = ctx.object
    ));

    Ok(header.render(ctx.stamp) + &body)
}

fn append_call(field: &ResolvedField, value: &str, op: AppendOp) -> String {
    let label = &field.name;
    match op {
        AppendOp::Field(None) => {
            format!("appendFieldToJsonObject(jsonObject, \"{label}\", {value})")
        }
        AppendOp::Field(Some(shape)) => {
            format!("appendFieldToJsonObject(jsonObject, \"{label}\", {value}, {shape})")
        }
        AppendOp::Entity(None) => format!(
            "appendEntityToJsonObject(jsonObject, \"{label}\", {value}, \"{}\")",
            field.ty.element
        ),
        AppendOp::Entity(Some(shape)) => format!(
            "appendEntityToJsonObject(jsonObject, \"{label}\", {value}, \"{}\", {shape})",
            field.ty.element
        ),
    }
}

/// Generates `deserialize<Class>(jsonString)` ending in a `create<Class>` call.
pub(crate) fn generate_deserialize(ctx: &EntityContext) -> AppResult<String> {
    let function = format!("deserialize{}", ctx.class);
    let header = FunctionHeader {
        name: function.clone(),
        description: format!(
            "Deserialize {class} from JSON String to {class} entity.",
            class = ctx.class
        ),
        params: vec![("jsonString".into(), "String".into())],
        returns: Some((ctx.class.clone(), ctx.object.clone())),
    };

    let mut body = String::from(
        "\tvar jsonString = argument0;\n\t\n\tvar jsonObject = decodeJson(jsonString);\n\t\n",
    );

    for field in ctx.fields {
        let template = template_for(field.ty.category, field.ty.shape)?;
        body.push_str(&extract_statement(&function, field, template.extract));
    }

    body.push_str(&format!(
        "\t\n\treturn create{}({});\n\t\n",
        ctx.class,
        ctx.argument_list()
    ));

    Ok(header.render(ctx.stamp) + &body)
}

fn extract_statement(function: &str, field: &ResolvedField, op: ExtractOp) -> String {
    let name = &field.name;
    let required = !field.ty.optional;

    let lookup = match op {
        ExtractOp::Value(None) => format!("getJsonObjectFieldValue(jsonObject, \"{name}\")"),
        ExtractOp::Value(Some(shape)) => {
            format!("getJsonObjectFieldValue(jsonObject, \"{name}\", {shape})")
        }
        ExtractOp::Entity(shape) => format!(
            "getJsonObjectFieldValue(jsonObject, \"{name}\", {shape}, \"{}\")",
            field.ty.element
        ),
        ExtractOp::ClonedArray => {
            let mut code = format!(
                "\tvar {name} = getJsonObjectFieldValue(jsonObject, \"{name}\");\n\
                 \tif (isOptionalPresent({name})) {{\n\
                 \t\tif (isJsonArray({name})) {{\n\
                 \t\t\t{name} = cloneArray(getJsonArrayData({name}));\n\
                 \t\t}} else {{\n\
                 \t\t\t{name} = [];\n\
                 \t\t\tvar exceptionMessage = \"[{function}] Field \\\"{name}\\\" isn't an JsonArray\";\n\
                 \t\t\tthrowException(createException(RuntimeException, exceptionMessage, null));\n\
                 \t\t}}\n\
                 \t}}\n"
            );
            if required {
                code.push_str(&format!("\t{name} = assertNoOptional({name});\n"));
            }
            return code;
        }
    };

    if required {
        format!("\tvar {name} = assertNoOptional({lookup});\n")
    } else {
        format!("\tvar {name} = {lookup};\n")
    }
}
