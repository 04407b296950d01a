//! Typed errors for configuration loading and product normalization.
//!
//! Orchestration code works with `anyhow::Result`; these variants are the
//! failures callers and tests need to tell apart.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Relative file names are looked up in the current directory.
    #[error(
        "Couldn't find {}",
        if is_bare_file_name(path) {
            format!("a {} file in the current directory", path.display())
        } else {
            path.display().to_string()
        }
    )]
    ConfigNotFound { path: PathBuf },

    #[error("Please set your products in {}", path.display())]
    ConfigMissingProducts { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A template pattern must carry exactly one `%s` placeholder.
    #[error(
        "template for `{field}` ({pattern:?}) must contain exactly one %s placeholder, found {found}"
    )]
    Template {
        field: String,
        pattern: String,
        found: usize,
    },

    #[error("invalid product declaration: {reason}")]
    InvalidProduct { reason: String },

    #[error("invalid step declaration: {reason}")]
    InvalidStep { reason: String },

    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error(
        "`{command}` exited with {status}{}",
        if stderr.is_empty() { String::new() } else { format!(": {}", stderr) }
    )]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

fn is_bare_file_name(path: &std::path::Path) -> bool {
    path.parent().is_none_or(|parent| parent.as_os_str().is_empty())
}

pub type Result<T> = std::result::Result<T, Error>;

/// A normalization failure tied to the product it came from.
#[derive(Error, Debug)]
#[error("{product}: {source}")]
pub struct ProductError {
    /// Display name of the product, or `#<position>` when it has none.
    pub product: String,
    pub source: Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_name_the_file() {
        let err = Error::ConfigNotFound {
            path: PathBuf::from(".updater.yml"),
        };
        assert_eq!(
            err.to_string(),
            "Couldn't find a .updater.yml file in the current directory"
        );

        let err = Error::ConfigNotFound {
            path: PathBuf::from("/etc/fleet.yml"),
        };
        assert_eq!(err.to_string(), "Couldn't find /etc/fleet.yml");

        let err = Error::ConfigMissingProducts {
            path: PathBuf::from(".updater.yml"),
        };
        assert_eq!(err.to_string(), "Please set your products in .updater.yml");
    }

    #[test]
    fn test_command_failed_includes_stderr_only_when_present() {
        let quiet = Error::CommandFailed {
            command: "make".to_string(),
            status: "exit status 2".to_string(),
            stderr: String::new(),
        };
        assert_eq!(quiet.to_string(), "`make` exited with exit status 2");

        let noisy = Error::CommandFailed {
            command: "make".to_string(),
            status: "exit status 2".to_string(),
            stderr: "no rule".to_string(),
        };
        assert_eq!(noisy.to_string(), "`make` exited with exit status 2: no rule");
    }

    #[test]
    fn test_product_error_prefixes_product_label() {
        let err = ProductError {
            product: "Site A".to_string(),
            source: Error::MissingField { field: "dir" },
        };
        assert_eq!(err.to_string(), "Site A: missing required field `dir`");
    }
}
