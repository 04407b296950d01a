// Per-product update procedure, decision plan, result types

use crate::config::Config;
use crate::output;
use crate::product::Project;
use crate::prompt::{Choice, Prompter};
use crate::shell::CommandRunner;
use crate::steps;
use crate::workdir::WorkingDir;
use crate::{git, pm2};
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStep {
    Preparing,
    Cloning,
    EnteringDirectory,
    CheckingForUpdates,
    Prompting,
    Pulling,
    RunningSteps,
    Restarting,
}

#[derive(Debug)]
pub struct UpdateResult {
    pub name: String,
    pub outcome: UpdateOutcome,
    pub duration: Duration,
}

impl UpdateResult {
    /// A product that could not be normalized.
    pub fn rejected(name: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            name: name.into(),
            outcome: UpdateOutcome::Failed(UpdateFailure {
                error: error.to_string(),
                step: UpdateStep::Preparing,
            }),
            duration: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, UpdateOutcome::Failed(_))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(UpdateSummary),
    Skipped(SkipReason),
    Failed(UpdateFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    pub pulled: bool,
    pub steps_run: usize,
    pub restarted: bool,
}

/// Normal early endings of a product's update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    CloneDeclined,
    UpToDate,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UpdateFailure {
    pub error: String,
    pub step: UpdateStep,
}

#[derive(Debug)]
struct UpdateError {
    source: anyhow::Error,
    step: UpdateStep,
}

fn at_step<T, E: Into<anyhow::Error>>(
    step: UpdateStep,
    result: Result<T, E>,
) -> Result<T, UpdateError> {
    result.map_err(|e| UpdateError {
        source: e.into(),
        step,
    })
}

/// What the operator can ask for when the repository is already up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpToDateAction {
    Nothing,
    /// Run the steps (and restart) as if there had been new commits.
    ForceSteps,
    JustRestart,
}

impl UpToDateAction {
    pub fn label(&self) -> &'static str {
        match self {
            UpToDateAction::Nothing => "Nothing",
            UpToDateAction::ForceSteps => "Do as if it was not up to date",
            UpToDateAction::JustRestart => "Just restart the app",
        }
    }

    /// Menu entries in display order; `None` is a separator.
    /// Restarting is only offered for pm2-managed apps.
    pub fn menu(has_pm2: bool) -> Vec<Option<UpToDateAction>> {
        let mut menu = vec![
            Some(UpToDateAction::Nothing),
            None,
            Some(UpToDateAction::ForceSteps),
        ];
        if has_pm2 {
            menu.push(Some(UpToDateAction::JustRestart));
        }
        menu
    }
}

/// The actions one product update will perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Plan {
    pub pull: bool,
    pub run_steps: bool,
    pub restart: bool,
}

impl Plan {
    /// `action` is the operator's answer, only asked for when up to date.
    ///
    /// Restart fires when pm2 manages the app and something was pulled,
    /// the steps were forced, or a restart alone was requested.
    pub fn decide(up_to_date: bool, action: Option<UpToDateAction>, has_pm2: bool) -> Plan {
        let (pull, run_steps, restart_requested) = match (up_to_date, action) {
            (false, _) => (true, true, true),
            (true, None | Some(UpToDateAction::Nothing)) => (false, false, false),
            (true, Some(UpToDateAction::ForceSteps)) => (false, true, true),
            (true, Some(UpToDateAction::JustRestart)) => (false, false, true),
        };
        Plan {
            pull,
            run_steps,
            restart: has_pm2 && restart_requested,
        }
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        !self.pull && !self.run_steps && !self.restart
    }
}

const CLONE_PROMPT: &str = "The repository does not exist. Clone it?";
const UP_TO_DATE_PROMPT: &str = "The repository is already up to date. What should I do?";

/// Runs the update procedure for one product at a time.
pub struct Updater<'a> {
    pub config: Config,
    pub runner: &'a dyn CommandRunner,
    pub prompter: &'a dyn Prompter,
    /// Show the output of product steps live instead of capturing it.
    pub show_step_output: bool,
}

impl<'a> Updater<'a> {
    pub fn new(config: Config, runner: &'a dyn CommandRunner, prompter: &'a dyn Prompter) -> Self {
        Self {
            config,
            runner,
            prompter,
            show_step_output: false,
        }
    }

    #[must_use]
    pub fn show_step_output(mut self, show: bool) -> Self {
        self.show_step_output = show;
        self
    }

    /// Updates `project`. Skips and failures are reported in the result and
    /// never affect other products.
    pub fn update(&self, project: &Project) -> UpdateResult {
        let start = Instant::now();
        let outcome = match self.do_update(project) {
            Ok(outcome) => outcome,
            Err(e) => {
                let failure = UpdateFailure {
                    error: format!("{:#}", e.source),
                    step: e.step,
                };
                if !self.config.is_quiet() {
                    output::print_failure(&failure);
                }
                UpdateOutcome::Failed(failure)
            }
        };
        if let UpdateOutcome::Skipped(reason) = &outcome {
            output::print_skipped(&self.config, reason);
        }

        UpdateResult {
            name: project.display_name().to_string(),
            outcome,
            duration: start.elapsed(),
        }
    }

    fn do_update(&self, project: &Project) -> Result<UpdateOutcome, UpdateError> {
        output::print_project_header(&self.config, project.display_name());

        let dir = at_step(UpdateStep::Preparing, project.dir())?;
        if !Path::new(dir).is_dir() {
            let clone = at_step(
                UpdateStep::Prompting,
                self.prompter.confirm(CLONE_PROMPT, true),
            )?;
            if !clone {
                return Ok(UpdateOutcome::Skipped(SkipReason::CloneDeclined));
            }
            let url = at_step(UpdateStep::Cloning, project.clone_url())?;
            at_step(
                UpdateStep::Cloning,
                output::with_spinner(&self.config, "Cloning repository...", || {
                    git::clone(self.runner, url, dir)
                }),
            )?;
        }

        let _cwd = at_step(UpdateStep::EnteringDirectory, WorkingDir::enter(dir))?;

        let up_to_date = at_step(
            UpdateStep::CheckingForUpdates,
            output::with_spinner(&self.config, "Checking for updates...", || {
                git::is_up_to_date(self.runner, project.remote_branch.as_deref())
            }),
        )?;

        let action = if up_to_date {
            Some(at_step(
                UpdateStep::Prompting,
                self.ask_up_to_date_action(project.pm2.is_some()),
            )?)
        } else {
            None
        };

        let plan = Plan::decide(up_to_date, action, project.pm2.is_some());
        log::debug!(
            "{}: up_to_date={} action={:?} plan={:?}",
            project.display_name(),
            up_to_date,
            action,
            plan
        );
        if plan.is_noop() {
            return Ok(UpdateOutcome::Skipped(SkipReason::UpToDate));
        }

        if plan.pull {
            at_step(
                UpdateStep::Pulling,
                output::with_spinner(&self.config, "Pulling from origin...", || {
                    git::pull(self.runner, project.remote_branch.as_deref())
                }),
            )?;
            output::print_done(&self.config, "Pulled");
        }

        if plan.run_steps {
            at_step(
                UpdateStep::RunningSteps,
                steps::run_steps(
                    self.runner,
                    &self.config,
                    &project.steps,
                    self.show_step_output,
                    true,
                ),
            )?;
        }

        let mut restarted = false;
        if let (true, Some(service)) = (plan.restart, project.pm2.as_deref()) {
            at_step(
                UpdateStep::Restarting,
                output::with_spinner(&self.config, "Restarting...", || {
                    pm2::restart(self.runner, service)
                }),
            )?;
            output::print_done(&self.config, "Restarted");
            restarted = true;
        }

        Ok(UpdateOutcome::Updated(UpdateSummary {
            pulled: plan.pull,
            steps_run: if plan.run_steps { project.steps.len() } else { 0 },
            restarted,
        }))
    }

    fn ask_up_to_date_action(&self, has_pm2: bool) -> anyhow::Result<UpToDateAction> {
        let menu = UpToDateAction::menu(has_pm2);
        let choices: Vec<Choice> = menu
            .iter()
            .map(|entry| match entry {
                Some(action) => Choice::item(action.label()),
                None => Choice::Separator,
            })
            .collect();

        let picked = self.prompter.choose(UP_TO_DATE_PROMPT, &choices, 0)?;
        match menu.get(picked) {
            Some(Some(action)) => Ok(*action),
            _ => anyhow::bail!("invalid menu selection {}", picked),
        }
    }
}
