//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic strings throughout the codebase.

/// Conventional configuration file name, looked up in the current directory.
pub const CONFIG_FILENAME: &str = ".updater.yml";

/// Progress spinner tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;

/// Suffix appended to project step labels while they run.
pub const ELLIPSIS: &str = "...";

/// Completion text used when a step label has no known past-tense form.
pub const FALLBACK_DONE: &str = "Done";

/// Upstream used for the up-to-date check and pull when a project does not
/// declare a `remote branch`.
pub const DEFAULT_UPSTREAM: &str = "@{u}";

/// Remote assumed for a `remote branch` written without one.
pub const DEFAULT_REMOTE: &str = "origin";

/// Process manager executable.
pub const PM2: &str = "pm2";
