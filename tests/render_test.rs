use chrono::NaiveDate;
use tempfile::TempDir;

use gearspec::error::Error;
use gearspec::fields::{new_field_map, FieldMap};
use gearspec::render::{load_template, parse_changelog_date, safe_substitute, stamp};

fn test_fields() -> FieldMap {
    let mut fields = new_field_map();
    fields.insert("module".to_string(), "requests".to_string());
    fields.insert("version".to_string(), "1.2".to_string());
    fields.insert("summary".to_string(), "HTTP for humans".to_string());
    fields
}

#[test]
fn test_substitutes_known_placeholders() {
    let fields = test_fields();

    let result = safe_substitute("Name: $module\nVersion: ${version}\n", &fields);
    assert_eq!(result, "Name: requests\nVersion: 1.2\n");
}

#[test]
fn test_unknown_placeholder_stays_literal() {
    let fields = test_fields();

    let result = safe_substitute("$nosuch and ${alsomissing} stay, $module not", &fields);
    assert_eq!(result, "$nosuch and ${alsomissing} stay, requests not");
}

#[test]
fn test_empty_field_substitutes_to_nothing() {
    // All recognized keys are present from the start, possibly empty.
    let fields = new_field_map();

    let result = safe_substitute("[$description]", &fields);
    assert_eq!(result, "[]");
}

#[test]
fn test_dollar_escape() {
    let fields = test_fields();

    assert_eq!(safe_substitute("cost: $$5, home: $$HOME", &fields), "cost: $5, home: $HOME");
}

#[test]
fn test_bare_dollar_passes_through() {
    let fields = test_fields();

    assert_eq!(safe_substitute("a $ sign, trailing $", &fields), "a $ sign, trailing $");
}

#[test]
fn test_rendering_is_deterministic() {
    let fields = test_fields();
    let template = "Name: $module\n%changelog\n$stamp\n";

    assert_eq!(safe_substitute(template, &fields), safe_substitute(template, &fields));
}

#[test]
fn test_stamp_format() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

    let line = stamp(date, "John Doe <j@x.com>", "1.2");
    assert_eq!(line, "* Fri Mar 15 2024 John Doe <j@x.com> 1.2");
}

#[test]
fn test_parse_changelog_date() {
    let date = parse_changelog_date("2024-03-15").unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
}

#[test]
fn test_invalid_changelog_date_is_config_error() {
    assert!(matches!(parse_changelog_date("15.03.2024").unwrap_err(), Error::ConfigError(_)));
    assert!(matches!(parse_changelog_date("2024-13-01").unwrap_err(), Error::ConfigError(_)));
    assert!(matches!(parse_changelog_date("today").unwrap_err(), Error::ConfigError(_)));
}

#[test]
fn test_load_template() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("python3.template"), "Name: $module\n").unwrap();

    let content = load_template(dir.path(), "python3").unwrap();
    assert_eq!(content, "Name: $module\n");
}

#[test]
fn test_missing_template_is_config_error() {
    let dir = TempDir::new().unwrap();

    let err = load_template(dir.path(), "nosuch").unwrap_err();
    assert!(matches!(err, Error::ConfigError(_)));
}
