//! Defensive access to upstream module output.
//!
//! The host hands each module a mapping of other modules' prior results.
//! Those shapes belong to the producing modules and drift independently,
//! so every read here degrades to `None` instead of failing.

use serde_json::Value;

/// Prior outputs of other modules, keyed by module name.
///
/// Owned by the host; the core only ever reads it.
pub type Context = serde_json::Map<String, Value>;

/// Read `field` out of `module`'s output.
///
/// `None` when the context is absent, the module is unknown, its output is
/// not a mapping, or the field is missing.
pub fn field<'a>(context: Option<&'a Context>, module: &str, field: &str) -> Option<&'a Value> {
    context?.get(module)?.as_object()?.get(field)
}

/// The conventional `content` field of `module`'s output.
pub fn content<'a>(context: Option<&'a Context>, module: &str) -> Option<&'a Value> {
    field(context, module, "content")
}

/// The conventional `metadata` field of `module`'s output.
pub fn metadata<'a>(context: Option<&'a Context>, module: &str) -> Option<&'a Value> {
    field(context, module, "metadata")
}

/// Names of the modules whose output exposes `field_name`.
pub fn modules_providing(context: Option<&Context>, field_name: &str) -> Vec<String> {
    let Some(context) = context else {
        return Vec::new();
    };
    context
        .iter()
        .filter(|(_, value)| {
            value
                .as_object()
                .is_some_and(|output| output.contains_key(field_name))
        })
        .map(|(name, _)| name.clone())
        .collect()
}
