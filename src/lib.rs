//! Gearspec generates gear-ready RPM package directories.
//! It renders a spec file from a per-type template and a field mapping,
//! stages it together with `.gear/rules`, and can bootstrap the package
//! directory from an upstream git repository.

/// Builder state and the deploy / upstream-deploy / self-test operations
pub mod builder;

/// Command-line interface module for gearspec
pub mod cli;

/// Startup configuration: template directory and packager identity
pub mod config;

/// Error types and handling for gearspec
pub mod error;

/// The field mapping consumed by template substitution
pub mod fields;

/// Logger initialization
pub mod logger;

/// Interactive fill-in for fields omitted on the command line
pub mod prompt;

/// Template loading, safe placeholder substitution and stamp synthesis
pub mod render;

/// Upstream repository bootstrap and post-deploy bookkeeping
pub mod upstream;

/// Recursive directory comparison used by the self-test
pub mod verify;
