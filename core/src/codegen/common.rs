use crate::model::Entity;
use crate::type_resolver::ResolvedField;

/// Uppercases the first character (`coin` -> `Coin`).
pub(crate) fn initial_to_upper(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercases the first character (`Coin` -> `coin`).
pub(crate) fn initial_to_lower(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Names shared by every artifact generated for one entity.
pub(crate) struct EntityContext<'a> {
    pub(crate) fields: &'a [ResolvedField],
    /// `Coin`
    pub(crate) class: String,
    /// `coin`
    pub(crate) object: String,
    pub(crate) stamp: Option<&'a str>,
}

impl<'a> EntityContext<'a> {
    pub(crate) fn new(
        entity: &'a Entity,
        fields: &'a [ResolvedField],
        stamp: Option<&'a str>,
    ) -> Self {
        Self {
            fields,
            class: initial_to_upper(&entity.name),
            object: initial_to_lower(&entity.name),
            stamp,
        }
    }

    pub(crate) fn getter_name(&self, field: &str) -> String {
        format!("get{}{}", self.class, initial_to_upper(field))
    }

    pub(crate) fn setter_name(&self, field: &str) -> String {
        format!("set{}{}", self.class, initial_to_upper(field))
    }

    /// `getCoinValue(coin)`
    pub(crate) fn getter_call(&self, field: &str) -> String {
        format!("{}({})", self.getter_name(field), self.object)
    }

    /// `setCoinValue(coin, value)`
    pub(crate) fn setter_call(&self, field: &str, value: &str) -> String {
        format!("{}({}, {})", self.setter_name(field), self.object, value)
    }

    /// Comma separated field names in schema order.
    pub(crate) fn argument_list(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `(name, annotation)` pairs for the doc header, in schema order.
    pub(crate) fn field_params(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.annotation.clone()))
            .collect()
    }
}

/// The `///@...` metadata block that precedes every generated function.
pub(crate) struct FunctionHeader {
    pub(crate) name: String,
    pub(crate) description: String,
    /// `(name, type)`
    pub(crate) params: Vec<(String, String)>,
    /// `(type, name)`; `None` for void functions.
    pub(crate) returns: Option<(String, String)>,
}

impl FunctionHeader {
    pub(crate) fn render(&self, stamp: Option<&str>) -> String {
        let names: Vec<&str> = self.params.iter().map(|(n, _)| n.as_str()).collect();

        let mut code = format!("///@function {}({})\n", self.name, names.join(", "));
        code.push_str(&format!("///@description {}\n", self.description));
        for (name, ty) in &self.params {
            code.push_str(&format!("///@param {{{}}} {}\n", ty, name));
        }
        if let Some((ty, name)) = &self.returns {
            code.push_str(&format!("///@return {{{}}} {}\n", ty, name));
        }
        code.push_str("///@throws {Exception}\n");
        if let Some(stamp) = stamp {
            code.push_str(&format!("///@generated {{{}}}\n", stamp));
        }
        code.push('\n');
        code
    }
}
