//! Startup configuration for gearspec.
//! Resolves the template directory and the packager identity once, before
//! any builder is constructed; nothing here is consulted again later.

use std::env;
use std::path::PathBuf;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Environment override for the template directory
pub const TEMPLATE_DIR_ENV: &str = "GEARSPEC_TEMPLATES";

/// Environment override for the packager identity
pub const PACKAGER_ENV: &str = "GEARSPEC_PACKAGER";

/// System-wide template directory used when no override is set
pub const DEFAULT_TEMPLATE_DIR: &str = "/usr/share/gearspec/templates";

/// Resolved configuration, passed into the builder constructor.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding the per-type spec templates
    pub template_dir: PathBuf,
    /// Packager identity placed into the changelog stamp,
    /// e.g. "John Doe <j@x.com>"
    pub packager: String,
}

impl BuildConfig {
    /// Resolves the configuration from the environment.
    ///
    /// # Errors
    /// * `Error::ConfigError` if no packager identity can be resolved,
    ///   neither from the environment nor from the rpm configuration
    pub fn resolve() -> Result<Self> {
        let template_dir = env::var(TEMPLATE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TEMPLATE_DIR));

        let packager = match env::var(PACKAGER_ENV) {
            Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => query_rpm_packager()?,
        };

        debug!("using templates from '{}', packager '{}'", template_dir.display(), packager);

        Ok(Self { template_dir, packager })
    }
}

/// Asks rpm for the `%packager` macro value.
fn query_rpm_packager() -> Result<String> {
    let output = Command::new("rpm").args(["--eval", "%packager"]).output().map_err(|e| {
        Error::ConfigError(format!("cannot query rpm for a packager identity: {}", e))
    })?;

    if !output.status.success() {
        return Err(Error::ConfigError(format!(
            "rpm --eval %packager exited with {}",
            output.status
        )));
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();

    // An undefined macro comes back verbatim.
    if value.is_empty() || value == "%packager" {
        return Err(Error::ConfigError(format!(
            "no packager identity: define %packager in ~/.rpmmacros or set {}",
            PACKAGER_ENV
        )));
    }

    Ok(value)
}
