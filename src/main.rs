//! Gearspec's main application entry point and orchestration logic.
//! Parses arguments, resolves the startup configuration, assembles the
//! field mapping and dispatches one deploy-or-test sequence.

use chrono::Local;

use gearspec::{
    builder::SpecBuilder,
    cli::{get_args, Args},
    config::BuildConfig,
    error::{default_error_handler, Error, Result},
    fields::new_field_map,
    logger::init_logger,
    prompt,
    render::parse_changelog_date,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Resolves the startup configuration (template dir, packager)
/// 2. Completes the field mapping, asking for missing fields
/// 3. Runs the self-test, the upstream deploy or the plain deploy
fn run(args: Args) -> Result<()> {
    let config = BuildConfig::resolve()?;
    let date = match args.date {
        Some(text) => parse_changelog_date(&text)?,
        None => Local::now().date_naive(),
    };

    let module = match args.module {
        Some(module) => module,
        None if args.batch => {
            return Err(Error::ConfigError("module name is required".to_string()))
        }
        None => prompt::ask("Module name")?,
    };
    if module.is_empty() {
        return Err(Error::ConfigError("module name is required".to_string()));
    }

    let mut fields = new_field_map();
    fields.insert("spec_type".to_string(), args.spec_type);
    fields.insert("module".to_string(), module);
    fields.insert(
        "version".to_string(),
        prompt::field_or_ask(args.version, "Version", args.batch)?,
    );
    fields.insert(
        "summary".to_string(),
        prompt::field_or_ask(args.summary, "Summary", args.batch)?,
    );
    fields.insert(
        "license".to_string(),
        prompt::field_or_ask(args.license, "License", args.batch)?,
    );
    fields
        .insert("url".to_string(), prompt::field_or_ask(args.url, "Url", args.batch)?);
    fields.insert(
        "description".to_string(),
        prompt::field_or_ask(args.description, "Description", args.batch)?,
    );
    fields.insert(
        "lastchange".to_string(),
        prompt::field_or_ask(args.lastchange, "Changelog entry", args.batch)?,
    );

    let mut builder = SpecBuilder::new(config, fields, date, args.tag);

    if let Some(reference) = args.test {
        builder.verify_against_reference(&reference)?;
    } else if args.git {
        builder.deploy_from_upstream()?;
        println!("Deployed '{}' from upstream.", builder.package());
    } else {
        builder.deploy()?;
        println!("Deployed '{}'.", builder.package());
    }
    Ok(())
}
