//! Recursive directory comparison for the self-test.
//! Compares structure and byte content, skipping version-control metadata.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

const EXCLUDED_DIRS: [&str; 1] = [".git"];

fn snapshot(root: &Path) -> Result<BTreeMap<PathBuf, bool>> {
    let mut entries = BTreeMap::new();
    let walker = WalkDir::new(root).min_depth(1).into_iter().filter_entry(|entry| {
        !(entry.file_type().is_dir()
            && EXCLUDED_DIRS.iter().any(|name| entry.file_name() == *name))
    });
    for entry in walker {
        let entry = entry.map_err(|e| Error::VerificationError(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::VerificationError(e.to_string()))?
            .to_path_buf();
        entries.insert(relative, entry.file_type().is_dir());
    }
    Ok(entries)
}

/// Compares two directories recursively and returns one human-readable
/// line per difference. Equal trees produce an empty list.
pub fn compare_dirs(left: &Path, right: &Path) -> Result<Vec<String>> {
    let left_entries = snapshot(left)?;
    let right_entries = snapshot(right)?;
    let mut differences = Vec::new();

    for (relative, left_is_dir) in &left_entries {
        match right_entries.get(relative) {
            None => {
                differences
                    .push(format!("Only in {}: {}", left.display(), relative.display()));
            }
            Some(right_is_dir) if right_is_dir != left_is_dir => {
                differences.push(format!(
                    "{} and {} differ",
                    left.join(relative).display(),
                    right.join(relative).display()
                ));
            }
            Some(_) if !*left_is_dir => {
                let left_content = fs::read(left.join(relative))?;
                let right_content = fs::read(right.join(relative))?;
                if left_content != right_content {
                    differences.push(format!(
                        "Files {} and {} differ",
                        left.join(relative).display(),
                        right.join(relative).display()
                    ));
                }
            }
            Some(_) => {}
        }
    }

    for relative in right_entries.keys() {
        if !left_entries.contains_key(relative) {
            differences
                .push(format!("Only in {}: {}", right.display(), relative.display()));
        }
    }

    Ok(differences)
}
