//! Interactive prompts.
//!
//! The updater asks through a [`Prompter`] so tests (and `--yes`) can answer
//! without a terminal.

use colored::Colorize;
use dialoguer::{Confirm, Select, theme::ColorfulTheme};

/// An entry of a single-choice menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Item(String),
    /// Visual divider; never returned as a selection.
    Separator,
}

impl Choice {
    pub fn item(label: impl Into<String>) -> Self {
        Choice::Item(label.into())
    }

    #[must_use]
    pub fn is_selectable(&self) -> bool {
        matches!(self, Choice::Item(_))
    }
}

pub trait Prompter {
    fn confirm(&self, message: &str, default: bool) -> anyhow::Result<bool>;

    /// Returns the index of the chosen entry, which is always an
    /// [`Choice::Item`]. `default` must point at an item.
    fn choose(&self, message: &str, choices: &[Choice], default: usize) -> anyhow::Result<usize>;
}

/// Prompts on the terminal with dialoguer.
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

const SEPARATOR_RULE: &str = "──────────────";

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str, default: bool) -> anyhow::Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(default)
            .interact()?)
    }

    fn choose(&self, message: &str, choices: &[Choice], default: usize) -> anyhow::Result<usize> {
        let items: Vec<String> = choices
            .iter()
            .map(|choice| match choice {
                Choice::Item(label) => label.clone(),
                Choice::Separator => SEPARATOR_RULE.dimmed().to_string(),
            })
            .collect();

        // dialoguer has no disabled rows; picking a separator asks again.
        loop {
            let picked = Select::with_theme(&self.theme)
                .with_prompt(message)
                .items(&items)
                .default(default)
                .interact()?;
            if choices[picked].is_selectable() {
                return Ok(picked);
            }
        }
    }
}

/// Answers every prompt with its default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPrompter;

impl Prompter for DefaultPrompter {
    fn confirm(&self, message: &str, default: bool) -> anyhow::Result<bool> {
        log::info!("{} -> {}", message, if default { "yes" } else { "no" });
        Ok(default)
    }

    fn choose(&self, message: &str, choices: &[Choice], default: usize) -> anyhow::Result<usize> {
        if !choices.get(default).is_some_and(Choice::is_selectable) {
            anyhow::bail!("default choice {} of '{}' is not selectable", default, message);
        }
        log::info!("{} -> {:?}", message, choices[default]);
        Ok(default)
    }
}
