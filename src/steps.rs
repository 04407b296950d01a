//! Named shell steps and their runner.

use crate::config::Config;
use crate::constants::{ELLIPSIS, FALLBACK_DONE};
use crate::error::{Error, Result};
use crate::output;
use crate::product::scalar_text;
use crate::shell::{self, CommandRunner};
use anyhow::Context;
use serde_yaml::{Mapping, Value};

/// One labelled shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub command: String,
}

impl Step {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
        }
    }
}

/// Progressive verb → past form, keyed by a label's first word.
const PAST_TENSE: &[(&str, &str)] = &[
    ("Installing", "Installed"),
    ("Building", "Built"),
    ("Activating", "Activated"),
    ("Copying", "Copied"),
    ("Moving", "Moved"),
    ("Compiling", "Compiled"),
    ("Linting", "Linted"),
    ("Stopping", "Stopped"),
    ("Getting", "Got"),
    ("Setting", "Set"),
    ("Extracting", "Extracted"),
    ("Restarting", "Restarted"),
    ("Reloading", "Reloaded"),
    ("Launching", "Launched"),
];

/// Rewrites the first word of `label` into its past form.
///
/// Labels already starting with a past form come back unchanged; any other
/// label yields `fallback`. A trailing ellipsis is ignored.
pub fn past_tense(label: &str, fallback: &str) -> String {
    let label = label.strip_suffix(ELLIPSIS).unwrap_or(label);
    let (first, rest) = match label.split_once(' ') {
        Some((first, rest)) => (first, Some(rest)),
        None => (label, None),
    };

    if let Some((_, past)) = PAST_TENSE.iter().find(|(being, _)| *being == first) {
        return match rest {
            Some(rest) => format!("{} {}", past, rest),
            None => past.to_string(),
        };
    }
    if PAST_TENSE.iter().any(|(_, past)| *past == first) {
        return label.to_string();
    }
    fallback.to_string()
}

/// Parses a list of `label: command` mappings, in declared order.
pub fn parse_declarations(declarations: &[Mapping]) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for declaration in declarations {
        for (label, command) in declaration {
            let label = scalar_text(label).ok_or_else(|| Error::InvalidStep {
                reason: format!("label must be a string, got {:?}", label),
            })?;
            let command = scalar_text(command).ok_or_else(|| Error::InvalidStep {
                reason: format!("command for '{}' must be a string", label),
            })?;
            steps.push(Step { label, command });
        }
    }
    Ok(steps)
}

/// Parses a `steps` field value; null means no steps.
pub fn from_value(value: &Value) -> Result<Vec<Step>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => {
            let declarations = items
                .iter()
                .map(|item| match item {
                    Value::Mapping(mapping) => Ok(mapping.clone()),
                    other => Err(Error::InvalidStep {
                        reason: format!("expected a `label: command` mapping, got {:?}", other),
                    }),
                })
                .collect::<Result<Vec<_>>>()?;
            parse_declarations(&declarations)
        }
        other => Err(Error::InvalidStep {
            reason: format!("steps must be a list, got {:?}", other),
        }),
    }
}

/// Runs `steps` one after another.
///
/// A non-zero exit stops the group and returns an error naming the step.
pub fn run_steps(
    runner: &dyn CommandRunner,
    config: &Config,
    steps: &[Step],
    show: bool,
    ellipsis: bool,
) -> anyhow::Result<()> {
    for step in steps {
        let label = if ellipsis {
            format!("{}{}", step.label, ELLIPSIS)
        } else {
            step.label.clone()
        };

        let result = if show {
            output::print_label(config, &label);
            shell::run_checked(runner, &step.command, true)
        } else {
            output::with_spinner(config, &label, || {
                shell::run_checked(runner, &step.command, false)
            })
        };
        result.with_context(|| format!("Step '{}' failed", step.label))?;

        output::print_done(config, &past_tense(&step.label, FALLBACK_DONE));
    }
    Ok(())
}
