//! Template loading, placeholder substitution and changelog stamp synthesis.
//!
//! Substitution is deliberately "safe": placeholders without a matching
//! field stay in the text verbatim and rendering never fails. The only
//! hard failure here is a template file that does not exist.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::error::{Error, Result};
use crate::fields::FieldMap;

/// Suffix appended to the spec-type name to form the template file name
pub const TEMPLATE_SUFFIX: &str = ".template";

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$(?:\$|(\w+)|\{(\w+)\})").unwrap())
}

/// Replaces `$name` and `${name}` placeholders with their field values.
///
/// Placeholders whose name is absent from the mapping are left as literal
/// text, and `$$` escapes a literal dollar sign. A missing field never
/// aborts rendering.
pub fn safe_substitute(text: &str, fields: &FieldMap) -> String {
    placeholder_re()
        .replace_all(text, |caps: &Captures| {
            let token = &caps[0];
            if token == "$$" {
                return "$".to_string();
            }
            let name = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
            match name.and_then(|name| fields.get(name)) {
                Some(value) => value.clone(),
                None => token.to_string(),
            }
        })
        .into_owned()
}

/// Parses an explicit changelog date in `YYYY-MM-DD` form.
pub fn parse_changelog_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| Error::ConfigError(format!("invalid date '{}': {}", text, e)))
}

/// Synthesizes the changelog header line.
///
/// The date format is parsed by downstream changelog tooling and must stay
/// token-for-token stable: `* Fri Mar 15 2024 John Doe <j@x.com> 1.2`.
pub fn stamp(date: NaiveDate, packager: &str, version: &str) -> String {
    format!("* {} {} {}", date.format("%a %b %d %Y"), packager, version)
}

/// Loads the raw template text for a spec type.
///
/// # Errors
/// * `Error::ConfigError` if the template file does not exist at
///   `<template_dir>/<spec_type>.template`
pub fn load_template(template_dir: &Path, spec_type: &str) -> Result<String> {
    let path = template_dir.join(format!("{}{}", spec_type, TEMPLATE_SUFFIX));
    if !path.is_file() {
        return Err(Error::ConfigError(format!(
            "template '{}' does not exist",
            path.display()
        )));
    }
    Ok(fs::read_to_string(&path)?)
}
