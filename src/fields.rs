//! The field mapping consumed by template substitution.

use indexmap::IndexMap;

/// Every key recognized by the substitution pass. All of them are present
/// (possibly empty) in the mapping before rendering starts; placeholders
/// outside this set stay verbatim in the output.
pub const FIELD_NAMES: [&str; 10] = [
    "spec_type",
    "module",
    "version",
    "summary",
    "license",
    "url",
    "packager",
    "description",
    "stamp",
    "lastchange",
];

/// Ordered field-name to value mapping.
pub type FieldMap = IndexMap<String, String>;

/// Creates a field mapping with every recognized key present and empty.
pub fn new_field_map() -> FieldMap {
    FIELD_NAMES.iter().map(|name| (name.to_string(), String::new())).collect()
}
