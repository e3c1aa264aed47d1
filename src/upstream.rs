//! Upstream repository bootstrap.
//!
//! An ordered pipeline of fallible steps: clone, reset to a tag, switch to
//! the packaging branch, clear the tree. Each step must succeed before the
//! next runs; the first failure aborts the whole bootstrap and the
//! directory is left as-is for manual inspection. There is no rollback.

use std::env;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use git2::build::RepoBuilder;
use git2::{
    DescribeFormatOptions, DescribeOptions, FetchOptions, ObjectType, RemoteCallbacks,
    Repository, ResetType, Signature,
};
use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Fixed remote alias, distinct from the conventional default so that
/// remote-management tooling can tell the upstream apart
pub const REMOTE_NAME: &str = "upstream";

/// Fixed name of the packaging branch
pub const PACKAGING_BRANCH: &str = "sisyphus";

/// Fixed message of the tree-clearing commit
pub const CLEANUP_MESSAGE: &str = "cleanup";

/// Clones `url` into a directory named `package` and rebases it onto an
/// empty packaging branch, ready for spec staging.
pub fn bootstrap(url: &str, package: &str, tag: Option<&str>) -> Result<()> {
    let repo = clone(url, package)?;
    let tag = resolve_tag(&repo, tag)?;
    debug!("resetting '{}' to tag '{}'", package, tag);
    reset_to_tag(&repo, &tag)?;
    switch_to_branch(&repo)?;
    clear_tree(&repo)?;
    Ok(())
}

fn clone(url: &str, package: &str) -> Result<Repository> {
    debug!("cloning '{}' into '{}'", url, package);

    // Set up authentication callbacks
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, _allowed_types| {
        git2::Cred::ssh_key(
            username_from_url.unwrap_or("git"),
            None,
            Path::new(&format!(
                "{}/.ssh/id_rsa",
                env::var("HOME").unwrap_or_default()
            )),
            None,
        )
    });

    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_opts);
    builder.remote_create(|repo, _name, url| repo.remote(REMOTE_NAME, url));

    builder
        .clone(url, Path::new(package))
        .map_err(|e| Error::external("clone", "git", e))
}

/// The given tag, or the most recent tag reachable from HEAD. The fallback
/// is resolved at clone time and is not pinned anywhere, so re-running the
/// bootstrap after upstream moved may pick a different tag.
fn resolve_tag(repo: &Repository, tag: Option<&str>) -> Result<String> {
    if let Some(tag) = tag {
        return Ok(tag.to_string());
    }

    let mut opts = DescribeOptions::new();
    opts.describe_tags();
    let describe =
        repo.describe(&opts).map_err(|e| Error::external("resolve-tag", "git", e))?;

    let mut format = DescribeFormatOptions::new();
    format.abbreviated_size(0);
    describe
        .format(Some(&format))
        .map_err(|e| Error::external("resolve-tag", "git", e))
}

fn reset_to_tag(repo: &Repository, tag: &str) -> Result<()> {
    let target = repo
        .revparse_single(&format!("refs/tags/{}", tag))
        .and_then(|object| object.peel(ObjectType::Commit))
        .map_err(|e| Error::external("reset", "git", e))?;
    repo.reset(&target, ResetType::Hard, None)
        .map_err(|e| Error::external("reset", "git", e))
}

fn switch_to_branch(repo: &Repository) -> Result<()> {
    let head = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .map_err(|e| Error::external("branch", "git", e))?;
    repo.branch(PACKAGING_BRANCH, &head, false)
        .map_err(|e| Error::external("branch", "git", e))?;
    repo.set_head(&format!("refs/heads/{}", PACKAGING_BRANCH))
        .map_err(|e| Error::external("branch", "git", e))
}

/// Removes every tracked file from the index and the working tree, then
/// commits the removal. History stays intact; the packaging branch starts
/// from an empty tree.
fn clear_tree(repo: &Repository) -> Result<()> {
    let workdir = repo
        .workdir()
        .ok_or_else(|| Error::external("cleanup", "git", "repository has no working tree"))?
        .to_path_buf();

    let mut index = repo.index().map_err(|e| Error::external("cleanup", "git", e))?;
    for entry in index.iter() {
        let relative = String::from_utf8_lossy(&entry.path).into_owned();
        let path = workdir.join(&relative);
        if path.is_symlink() || path.is_file() {
            fs::remove_file(&path).map_err(|e| Error::external("cleanup", "rm", e))?;
        }
    }
    prune_empty_dirs(&workdir);

    index.clear().map_err(|e| Error::external("cleanup", "git", e))?;
    index.write().map_err(|e| Error::external("cleanup", "git", e))?;
    let tree_id = index.write_tree().map_err(|e| Error::external("cleanup", "git", e))?;

    let tree = repo.find_tree(tree_id).map_err(|e| Error::external("cleanup", "git", e))?;
    let parent = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .map_err(|e| Error::external("cleanup", "git", e))?;
    let signature = repo
        .signature()
        .or_else(|_| Signature::now("gearspec", "gearspec@localhost"))
        .map_err(|e| Error::external("cleanup", "git", e))?;

    repo.commit(Some("HEAD"), &signature, &signature, CLEANUP_MESSAGE, &tree, &[&parent])
        .map_err(|e| Error::external("cleanup", "git", e))?;
    Ok(())
}

/// Directories are not tracked by git; drop the ones the file removal
/// emptied out. Non-empty directories are left alone.
fn prune_empty_dirs(workdir: &Path) {
    let walker = WalkDir::new(workdir)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");
    for entry in walker.flatten() {
        if entry.file_type().is_dir() {
            let _ = fs::remove_dir(entry.path());
        }
    }
}

/// Post-deploy repository bookkeeping, run after the spec files are
/// written: store the version tag marker, persist the remote
/// configuration, stage everything for commit.
///
/// Each step fails independently with an `ExternalToolError`; earlier
/// steps are not rolled back.
pub fn post_deploy() -> Result<()> {
    run_tool("store-tags", "gear-store-tags", &["-a"])?;
    run_tool("save-remotes", "gear-remotes-save", &[])?;
    run_tool("stage", "git", &["add", "."])?;
    Ok(())
}

fn run_tool(step: &'static str, tool: &'static str, args: &[&str]) -> Result<()> {
    debug!("running '{} {}'", tool, args.join(" "));
    let status = Command::new(tool)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| Error::external(step, tool, e))?;

    if !status.success() {
        return Err(Error::external(step, tool, format!("exited with {}", status)));
    }
    Ok(())
}
