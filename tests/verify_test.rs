use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use tempfile::TempDir;

use gearspec::builder::SpecBuilder;
use gearspec::config::BuildConfig;
use gearspec::error::Error;
use gearspec::fields::{new_field_map, FieldMap};
use gearspec::verify::compare_dirs;

// Both deploy and the self-test change the process working directory.
static CWD_LOCK: Mutex<()> = Mutex::new(());

const PACKAGER: &str = "John Doe <j@x.com>";

const DEFAULT_TEMPLATE: &str =
    "Name: $module\nVersion: $version\n\n%changelog\n$stamp\n- $lastchange\n";

fn lock() -> MutexGuard<'static, ()> {
    CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn template_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("default.template"), DEFAULT_TEMPLATE).unwrap();
    dir
}

fn test_fields() -> FieldMap {
    let mut fields = new_field_map();
    fields.insert("module".to_string(), "htop".to_string());
    fields.insert("spec_type".to_string(), "default".to_string());
    fields.insert("version".to_string(), "1.2".to_string());
    fields.insert("lastchange".to_string(), "first build".to_string());
    fields
}

fn builder(templates: &TempDir) -> SpecBuilder {
    let config = BuildConfig {
        template_dir: templates.path().to_path_buf(),
        packager: PACKAGER.to_string(),
    };
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    SpecBuilder::new(config, test_fields(), date, None)
}

// Deploys a reference tree into `root` and returns the package path.
fn deploy_reference(templates: &TempDir, root: &Path) -> std::path::PathBuf {
    let origin = env::current_dir().unwrap();
    env::set_current_dir(root).unwrap();
    let result = builder(templates).deploy();
    env::set_current_dir(origin).unwrap();
    result.unwrap();
    root.join("htop")
}

#[test]
fn test_verify_against_fresh_reference_succeeds() {
    let _guard = lock();
    let templates = template_dir();
    let reference_root = TempDir::new().unwrap();
    let reference = deploy_reference(&templates, reference_root.path());

    builder(&templates).verify_against_reference(&reference).unwrap();
}

#[test]
fn test_verify_detects_mutated_reference() {
    let _guard = lock();
    let templates = template_dir();
    let reference_root = TempDir::new().unwrap();
    let reference = deploy_reference(&templates, reference_root.path());

    // Flip one byte in the reference spec.
    let spec_path = reference.join("htop.spec");
    let mut content = fs::read(&spec_path).unwrap();
    content[0] ^= 0x20;
    fs::write(&spec_path, content).unwrap();

    let err = builder(&templates).verify_against_reference(&reference).unwrap_err();
    assert!(matches!(err, Error::VerificationError(_)));
}

#[test]
fn test_verify_missing_reference_fails() {
    let _guard = lock();
    let templates = template_dir();

    let err = builder(&templates)
        .verify_against_reference(Path::new("/nonexistent/reference"))
        .unwrap_err();
    assert!(matches!(err, Error::VerificationError(_)));
}

#[test]
fn test_compare_identical_deploys() {
    let _guard = lock();
    let templates = template_dir();
    let left_root = TempDir::new().unwrap();
    let right_root = TempDir::new().unwrap();
    let left = deploy_reference(&templates, left_root.path());
    let right = deploy_reference(&templates, right_root.path());

    assert!(compare_dirs(&left, &right).unwrap().is_empty());
    assert!(!dir_diff::is_different(&left, &right).unwrap());
}

#[test]
fn test_compare_reports_one_line_per_mutated_file() {
    let _guard = lock();
    let templates = template_dir();
    let left_root = TempDir::new().unwrap();
    let right_root = TempDir::new().unwrap();
    let left = deploy_reference(&templates, left_root.path());
    let right = deploy_reference(&templates, right_root.path());

    let spec_path = right.join("htop.spec");
    let mut content = fs::read(&spec_path).unwrap();
    content[0] ^= 0x20;
    fs::write(&spec_path, content).unwrap();

    let differences = compare_dirs(&left, &right).unwrap();
    assert_eq!(differences.len(), 1);
    assert!(differences[0].contains("htop.spec"));
}

#[test]
fn test_compare_ignores_git_metadata() {
    let _guard = lock();
    let templates = template_dir();
    let left_root = TempDir::new().unwrap();
    let right_root = TempDir::new().unwrap();
    let left = deploy_reference(&templates, left_root.path());
    let right = deploy_reference(&templates, right_root.path());

    fs::create_dir(right.join(".git")).unwrap();
    fs::write(right.join(".git/HEAD"), "ref: refs/heads/sisyphus\n").unwrap();

    assert!(compare_dirs(&left, &right).unwrap().is_empty());
}

#[test]
fn test_compare_reports_missing_entries() {
    let left = TempDir::new().unwrap();
    let right = TempDir::new().unwrap();
    fs::write(left.path().join("only-left"), "x").unwrap();
    fs::write(right.path().join("only-right"), "y").unwrap();

    let differences = compare_dirs(left.path(), right.path()).unwrap();
    assert_eq!(differences.len(), 2);
    assert!(differences.iter().any(|line| line.contains("only-left")));
    assert!(differences.iter().any(|line| line.contains("only-right")));
}
