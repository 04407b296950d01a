//! Configuration types for CLI verbosity and options.

use crate::shell::{self, CommandLogger};

/// Runtime configuration derived from CLI arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Controls the verbosity level of CLI output.
    pub verbosity: Verbosity,
}

impl Config {
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Spinners are drawn only at normal verbosity.
    #[must_use]
    pub fn shows_spinners(&self) -> bool {
        self.verbosity == Verbosity::Normal
    }

    /// Returns the command logger matching the verbosity settings.
    ///
    /// Config only picks which callback runs; echoing is implemented in the
    /// shell module.
    #[must_use]
    pub fn command_logger(&self) -> CommandLogger {
        if self.is_verbose() {
            shell::verbose_logger
        } else {
            shell::no_op_logger
        }
    }
}

/// Verbosity level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// Maps the `--quiet` / `--verbose` flags; clap keeps them exclusive.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_quiet_and_verbose_flags() {
        let quiet = Config {
            verbosity: Verbosity::Quiet,
        };
        assert!(quiet.is_quiet());
        assert!(!quiet.is_verbose());
        assert!(!quiet.shows_spinners());

        let verbose = Config {
            verbosity: Verbosity::Verbose,
        };
        assert!(!verbose.is_quiet());
        assert!(verbose.is_verbose());
        assert!(!verbose.shows_spinners());

        assert!(Config::default().shows_spinners());
    }

    #[test]
    fn test_command_logger_selects_verbose_or_no_op() {
        let verbose = Config {
            verbosity: Verbosity::Verbose,
        };
        assert!(std::ptr::fn_addr_eq(
            verbose.command_logger() as CommandLogger,
            shell::verbose_logger as CommandLogger
        ));

        let normal = Config {
            verbosity: Verbosity::Normal,
        };
        assert!(std::ptr::fn_addr_eq(
            normal.command_logger() as CommandLogger,
            shell::no_op_logger as CommandLogger
        ));
    }

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
    }
}
