//! Git command wrappers.
//!
//! Commands run in the current working directory through a
//! [`CommandRunner`]; callers enter the project directory first.

use crate::constants::{DEFAULT_REMOTE, DEFAULT_UPSTREAM};
use crate::shell::{CommandRunner, run_args};
use anyhow::Context;

fn validate_ref(name: &str) -> anyhow::Result<()> {
    if name.contains('\0') || name.contains('\n') || name.is_empty() || name.starts_with('-') {
        anyhow::bail!("Invalid remote branch: {:?}", name);
    }
    Ok(())
}

/// A declared `remote branch`, split into its remote and branch names.
///
/// A bare branch name belongs to `origin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    pub remote: String,
    pub branch: String,
}

impl RemoteBranch {
    pub fn parse(name: &str) -> anyhow::Result<Self> {
        validate_ref(name)?;
        let (remote, branch) = name.split_once('/').unwrap_or((DEFAULT_REMOTE, name));
        if remote.is_empty() || branch.is_empty() {
            anyhow::bail!("Invalid remote branch: {:?}", name);
        }
        Ok(Self {
            remote: remote.to_string(),
            branch: branch.to_string(),
        })
    }

    /// Remote-tracking ref, e.g. `origin/main`.
    pub fn tracking_ref(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }
}

pub fn clone(runner: &dyn CommandRunner, url: &str, dir: &str) -> anyhow::Result<()> {
    run_args(runner, &["git", "clone", "--", url, dir])
        .with_context(|| format!("Failed to clone {} into {}", url, dir))?;
    Ok(())
}

pub fn fetch_prune(runner: &dyn CommandRunner) -> anyhow::Result<()> {
    run_args(runner, &["git", "fetch", "--prune"]).context("Failed to fetch from remote")?;
    Ok(())
}

/// Fetches, then reports whether `upstream` has commits missing locally.
///
/// `upstream` is a remote branch such as `origin/main` or `main`; `None`
/// means the current branch's configured upstream.
pub fn is_up_to_date(runner: &dyn CommandRunner, upstream: Option<&str>) -> anyhow::Result<bool> {
    let upstream = match upstream {
        Some(name) => RemoteBranch::parse(name)?.tracking_ref(),
        None => DEFAULT_UPSTREAM.to_string(),
    };
    fetch_prune(runner)?;

    let range = format!("HEAD..{}", upstream);
    run_args(runner, &["git", "log", &range, "--oneline"])
        .map(|output| output.is_empty())
        .with_context(|| format!("Failed to compare HEAD with {}", upstream))
}

/// Pulls from `upstream` (read like [`is_up_to_date`] does), or from the
/// configured upstream.
pub fn pull(runner: &dyn CommandRunner, upstream: Option<&str>) -> anyhow::Result<()> {
    let upstream = upstream.map(RemoteBranch::parse).transpose()?;
    let mut args = vec!["git", "pull"];
    if let Some(upstream) = &upstream {
        args.extend([upstream.remote.as_str(), upstream.branch.as_str()]);
    }
    run_args(runner, &args).context("Failed to pull from remote")?;
    Ok(())
}
