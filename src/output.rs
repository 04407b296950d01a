//! Spinners, colored status lines, and summary formatting.
//!
//! This module provides visual feedback while steps run and the summary
//! printed once every product has been processed.

use crate::config::Config;
use crate::constants::PROGRESS_TICK_MS;
use crate::repo::{SkipReason, UpdateFailure, UpdateOutcome, UpdateResult, UpdateStep};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::time::Duration;

/// Transient "running" indicator.
/// Uses `Option` to avoid allocation when progress is hidden (quiet/verbose modes).
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Starts a spinner labelled `message`. In verbose mode the label is
    /// printed as a plain line instead.
    pub fn start(config: &Config, message: &str) -> Self {
        if config.is_verbose() {
            eprintln!("  {}", message.dimmed());
        }
        if !config.shows_spinners() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
        Self { bar: Some(bar) }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Shows a spinner labelled `message` while `f` runs.
pub fn with_spinner<T>(config: &Config, message: &str, f: impl FnOnce() -> T) -> T {
    let spinner = Spinner::start(config, message);
    let result = f();
    spinner.finish();
    result
}

/// Prints a step label as a plain line, used when its output is shown live.
pub fn print_label(config: &Config, label: &str) {
    if config.is_quiet() {
        return;
    }
    println!("{}", label.cyan());
}

/// Prints a permanent `✓ <message>.` confirmation line.
pub fn print_done(config: &Config, message: &str) {
    if config.is_quiet() {
        return;
    }
    println!("{} {}.", "✓".green(), message);
}

pub fn print_project_header(config: &Config, name: &str) {
    if config.is_quiet() {
        return;
    }
    println!("\n    {}", name.to_uppercase().white().bold());
}

pub fn print_group_start(config: &Config, group: &str, count: usize) {
    if config.is_quiet() || count == 0 {
        return;
    }
    println!("{}", format!("Running {} {} step(s)", count, group).dimmed());
}

pub fn print_skipped(config: &Config, reason: &SkipReason) {
    if config.is_quiet() {
        return;
    }
    println!("{} {}", "-".yellow(), format_skip_reason(reason).yellow());
}

pub fn print_failure(failure: &UpdateFailure) {
    eprintln!(
        "{} {} {}",
        "✗".red(),
        format!("failed while {}:", format_step(&failure.step)).red(),
        failure.error
    );
}

pub fn print_fatal(error: &dyn Display) {
    eprintln!("{} {}", "FATAL:".red().bold(), error);
}

pub fn print_error(error: &dyn Display) {
    eprintln!("{} {}", "error:".red().bold(), error);
}

pub fn print_summary(results: &[UpdateResult], duration: Duration, config: &Config) {
    if config.is_quiet() {
        print_quiet_summary(results);
    } else {
        print_normal_summary(results, duration);
    }
}

fn print_quiet_summary(results: &[UpdateResult]) {
    let updated = results
        .iter()
        .filter(|r| matches!(r.outcome, UpdateOutcome::Updated(_)))
        .count();

    // Always print count to stdout
    println!("{}/{} products updated", updated, results.len());

    for result in results {
        if let UpdateOutcome::Failed(failure) = &result.outcome {
            eprintln!("error: {}: {}", result.name, failure.error);
        }
    }
}

fn print_normal_summary(results: &[UpdateResult], duration: Duration) {
    print_section("Summary");

    let mut updated = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();
    for result in results {
        match &result.outcome {
            UpdateOutcome::Updated(_) => updated.push(result),
            UpdateOutcome::Skipped(_) => skipped.push(result),
            UpdateOutcome::Failed(_) => failed.push(result),
        }
    }

    print_updated(&updated);
    print_skipped_list(&skipped);
    print_failures(&failed);

    println!(
        "{}: {}/{} products updated in {}",
        "Total".white().bold(),
        updated.len(),
        results.len(),
        format_duration(duration)
    );
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f32())
}

fn print_section(title: &str) {
    let line = "=".repeat(50).cyan().dimmed();
    let padding = 50usize.saturating_sub(title.len()) / 2;
    let centered = format!("{:>width$}", title, width = padding + title.len());
    println!("\n{}\n{}\n{}\n", line, centered.cyan().bold(), line);
}

fn print_updated(updated: &[&UpdateResult]) {
    if updated.is_empty() {
        return;
    }
    println!("{}", format!("Updated ({}):", updated.len()).green().bold());

    for result in updated {
        if let UpdateOutcome::Updated(summary) = &result.outcome {
            let mut actions = Vec::new();
            if summary.pulled {
                actions.push("pulled".to_string());
            }
            if summary.steps_run > 0 {
                actions.push(format!("{} step(s)", summary.steps_run));
            }
            if summary.restarted {
                actions.push("restarted".to_string());
            }
            let actions = if actions.is_empty() {
                "no changes".to_string()
            } else {
                actions.join(", ")
            };
            println!(
                "  {} {} {} in {}",
                "OK".green().bold(),
                result.name.white(),
                format!("({})", actions).cyan(),
                format_duration(result.duration).dimmed(),
            );
        }
    }
    println!();
}

fn print_skipped_list(skipped: &[&UpdateResult]) {
    if skipped.is_empty() {
        return;
    }
    println!("{}", format!("Skipped ({}):", skipped.len()).yellow().bold());

    for result in skipped {
        if let UpdateOutcome::Skipped(reason) = &result.outcome {
            println!(
                "  {} {} {}",
                "SKIP".yellow().bold(),
                result.name.white(),
                format_skip_reason(reason).dimmed(),
            );
        }
    }
    println!();
}

fn print_failures(failures: &[&UpdateResult]) {
    if failures.is_empty() {
        return;
    }

    println!("{}", format!("Failed ({}):", failures.len()).red().bold());

    for result in failures {
        if let UpdateOutcome::Failed(failure) = &result.outcome {
            println!(
                "  {} {} {} in {}",
                "FAIL".red().bold(),
                result.name.white(),
                format!("while {}: {}", format_step(&failure.step), failure.error).red(),
                format_duration(result.duration).dimmed(),
            );
        }
    }
    println!();
}

fn format_skip_reason(reason: &SkipReason) -> &'static str {
    match reason {
        SkipReason::CloneDeclined => "not cloned",
        SkipReason::UpToDate => "already up to date",
    }
}

fn format_step(step: &UpdateStep) -> &'static str {
    match step {
        UpdateStep::Preparing => "reading the product",
        UpdateStep::Cloning => "cloning",
        UpdateStep::EnteringDirectory => "entering the directory",
        UpdateStep::CheckingForUpdates => "checking for updates",
        UpdateStep::Prompting => "prompting",
        UpdateStep::Pulling => "pulling",
        UpdateStep::RunningSteps => "running steps",
        UpdateStep::Restarting => "restarting",
    }
}
