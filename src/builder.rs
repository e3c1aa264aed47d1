//! The spec builder: holds the field mapping, renders the spec text and
//! stages the package directory, optionally bootstrapped from upstream.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::debug;
use tempfile::TempDir;

use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::fields::FieldMap;
use crate::render;
use crate::upstream;
use crate::verify;

/// Spec types whose packages carry an ecosystem naming prefix. Types
/// absent from this table use the module name unchanged.
pub const TYPE_PREFIXES: [(&str, &str); 5] = [
    ("python", "python-module-"),
    ("python3", "python3-module-"),
    ("perl", "perl-"),
    ("ruby", "gem-"),
    ("nodejs", "node-"),
];

/// Hidden subdirectory holding the gear build rules
pub const GEAR_DIR: &str = ".gear";

/// Rules file name inside [`GEAR_DIR`]
pub const RULES_FILE: &str = "rules";

/// Build-source descriptor for worktree-based packages
pub const WORKTREE_BUILD_PLACE: &str = ".";

/// Build-source descriptor for upstream-cloned packages; `@version@` is a
/// literal gear keyword, resolved at build time
pub const UPSTREAM_BUILD_PLACE: &str = "v@version@:.";

/// Derives the package name from the spec type and module name.
pub fn package_name(spec_type: &str, module: &str) -> String {
    for (known_type, prefix) in TYPE_PREFIXES {
        if known_type == spec_type {
            return format!("{}{}", prefix, module);
        }
    }
    module.to_string()
}

/// One line describing how source content maps into the package.
pub fn rules_line(build_place: &str, package: &str, module: &str) -> String {
    if package == module {
        format!("tar: {}\n", build_place)
    } else {
        format!(
            "tar: {} name={}-@version@ base={}-@version@\n",
            build_place, module, module
        )
    }
}

/// Builder state for one deploy-or-test invocation.
pub struct SpecBuilder {
    config: BuildConfig,
    fields: FieldMap,
    package: String,
    build_place: String,
    spec_text: String,
    date: NaiveDate,
    from_upstream: bool,
    tag: Option<String>,
}

impl SpecBuilder {
    /// Creates a builder over an already-complete field mapping.
    pub fn new(
        config: BuildConfig,
        fields: FieldMap,
        date: NaiveDate,
        tag: Option<String>,
    ) -> Self {
        Self {
            config,
            fields,
            package: String::new(),
            build_place: WORKTREE_BUILD_PLACE.to_string(),
            spec_text: String::new(),
            date,
            from_upstream: false,
            tag,
        }
    }

    /// The derived package name. Empty until [`render`](Self::render) ran.
    pub fn package(&self) -> &str {
        &self.package
    }

    fn field(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Renders the spec text and fixes the package name for the session.
    ///
    /// The packager identity and the changelog stamp are injected from the
    /// resolved configuration, overriding any caller-supplied values.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the template for the spec type is missing
    pub fn render(&mut self) -> Result<()> {
        let spec_type = self.field("spec_type");
        let module = self.field("module");
        self.package = package_name(&spec_type, &module);

        self.fields.insert("packager".to_string(), self.config.packager.clone());
        let stamp = render::stamp(self.date, &self.config.packager, &self.field("version"));
        self.fields.insert("stamp".to_string(), stamp);

        let template = render::load_template(&self.config.template_dir, &spec_type)?;
        self.spec_text = render::safe_substitute(&template, &self.fields);
        Ok(())
    }

    /// Deploys the rendered spec into a directory named after the package.
    ///
    /// Stages in place when the current directory already carries the
    /// package name; otherwise creates (or, in upstream mode, clones) the
    /// package directory and enters it.
    pub fn deploy(&mut self) -> Result<()> {
        self.render()?;

        let cwd = env::current_dir()?;
        let in_place =
            cwd.file_name().map(|name| name == self.package.as_str()).unwrap_or(false);

        if !in_place {
            if self.from_upstream {
                upstream::bootstrap(&self.field("url"), &self.package, self.tag.as_deref())?;
            } else {
                fs::create_dir(&self.package).map_err(|e| {
                    Error::FileSystemError(format!(
                        "cannot create directory '{}': {}",
                        self.package, e
                    ))
                })?;
            }
            env::set_current_dir(&self.package)?;
        }

        self.stage()?;

        if self.from_upstream {
            upstream::post_deploy()?;
        }
        Ok(())
    }

    /// Deploys from a clone of the upstream repository at the `url` field.
    pub fn deploy_from_upstream(&mut self) -> Result<()> {
        self.from_upstream = true;
        self.build_place = UPSTREAM_BUILD_PLACE.to_string();
        self.deploy()
    }

    /// Writes `.gear/rules` and the spec file into the current directory.
    ///
    /// A pre-existing `.gear` directory, e.g. from a prior failed run, is a
    /// conflict and never silently merged into.
    fn stage(&self) -> Result<()> {
        fs::create_dir(GEAR_DIR).map_err(|e| {
            Error::FileSystemError(format!("cannot create '{}': {}", GEAR_DIR, e))
        })?;

        let rule = rules_line(&self.build_place, &self.package, &self.field("module"));
        fs::write(Path::new(GEAR_DIR).join(RULES_FILE), rule)?;
        fs::write(format!("{}.spec", self.package), &self.spec_text)?;

        debug!("staged package '{}'", self.package);
        Ok(())
    }

    /// Self-test: runs a full deploy in a scratch directory and compares
    /// the result against `reference`.
    ///
    /// On mismatch, prints one line per difference and returns
    /// `Error::VerificationError`. The scratch directory is removed on
    /// every exit path.
    pub fn verify_against_reference(&mut self, reference: &Path) -> Result<()> {
        let reference: PathBuf = reference.canonicalize().map_err(|e| {
            Error::VerificationError(format!(
                "cannot read reference '{}': {}",
                reference.display(),
                e
            ))
        })?;

        let scratch = TempDir::new()?;
        let origin = env::current_dir()?;

        env::set_current_dir(scratch.path())?;
        let deployed = self.deploy();
        env::set_current_dir(&origin)?;
        deployed?;

        let generated = scratch.path().join(&self.package);
        let differences = verify::compare_dirs(&generated, &reference)?;
        if !differences.is_empty() {
            for line in &differences {
                eprintln!("{}", line);
            }
            return Err(Error::VerificationError(format!(
                "'{}' does not match '{}'",
                self.package,
                reference.display()
            )));
        }
        Ok(())
    }
}
