//! Product updater library.
//!
//! This crate keeps a fleet of locally cloned repositories up to date:
//! - Loading the `.updater.yml` product list and its templates
//! - Cloning missing repositories on request
//! - Checking each clone against its upstream and pulling
//! - Running the product's build steps
//! - Restarting pm2-managed apps

pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod git;
pub mod output;
pub mod pm2;
pub mod product;
pub mod prompt;
pub mod repo;
pub mod shell;
pub mod steps;
pub mod template;
pub mod workdir;
