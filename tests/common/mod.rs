//! Test infrastructure for product-updater integration tests.
#![allow(dead_code)]

use anyhow::Result;
use product_updater::config::{Config, Verbosity};
use product_updater::prompt::{Choice, Prompter};
use product_updater::shell::{CommandOutput, CommandRunner, ShellRunner, run_args};
use product_updater::workdir::WorkingDir;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Quiet config so tests don't draw spinners.
pub fn test_config() -> Config {
    Config {
        verbosity: Verbosity::Quiet,
    }
}

/// One recorded command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub show_output: bool,
}

/// Fake runner that records every command with the directory it ran in.
///
/// Commands succeed with empty stdout unless a rule matches their first
/// words. `git clone` creates the target directory so the updater can
/// enter it.
#[derive(Default)]
pub struct RecordingRunner {
    invocations: RefCell<Vec<Invocation>>,
    rules: Vec<(Vec<String>, CommandOutput)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers commands starting with `prefix` (split on whitespace) with `output`.
    pub fn respond(mut self, prefix: &str, output: CommandOutput) -> Self {
        let prefix = prefix.split_whitespace().map(str::to_string).collect();
        self.rules.push((prefix, output));
        self
    }

    /// Makes the up-to-date check report upstream commits.
    pub fn behind(self) -> Self {
        self.respond("git log", CommandOutput::success("abc1234 New commit\n"))
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Recorded commands, each joined back into one string.
    pub fn commands(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(|i| i.args.join(" "))
            .collect()
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.commands().iter().any(|c| c.starts_with(prefix))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str, show_output: bool) -> anyhow::Result<CommandOutput> {
        let args = shell_words::split(command)?;
        let cwd = std::env::current_dir()?;

        if args.len() >= 3 && args[0] == "git" && args[1] == "clone" {
            if let Some(target) = args.last() {
                std::fs::create_dir_all(cwd.join(target))?;
            }
        }

        let output = self
            .rules
            .iter()
            .find(|(prefix, _)| args.starts_with(prefix))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::success(""));

        self.invocations.borrow_mut().push(Invocation {
            args,
            cwd,
            show_output,
        });
        Ok(output)
    }
}

/// A scripted answer to the next prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm(bool),
    /// Picks the item with this label.
    Choose(&'static str),
}

/// Prompter that replays scripted answers and records what was asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<(String, Vec<Choice>)>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Prompts shown so far with the choices offered (empty for confirms).
    pub fn asked(&self) -> Vec<(String, Vec<Choice>)> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str, _default: bool) -> anyhow::Result<bool> {
        self.asked
            .borrow_mut()
            .push((message.to_string(), Vec::new()));
        match self.answers.borrow_mut().pop_front() {
            Some(Answer::Confirm(answer)) => Ok(answer),
            other => anyhow::bail!("unexpected confirm '{}', scripted {:?}", message, other),
        }
    }

    fn choose(&self, message: &str, choices: &[Choice], _default: usize) -> anyhow::Result<usize> {
        self.asked
            .borrow_mut()
            .push((message.to_string(), choices.to_vec()));
        match self.answers.borrow_mut().pop_front() {
            Some(Answer::Choose(label)) => choices
                .iter()
                .position(|c| *c == Choice::item(label))
                .ok_or_else(|| anyhow::anyhow!("'{}' is not offered", label)),
            other => anyhow::bail!("unexpected choice '{}', scripted {:?}", message, other),
        }
    }
}

/// Runs git in `dir` (entering it for the duration of the call).
pub fn git_in(dir: &Path, args: &[&str]) -> Result<String> {
    let _cwd = WorkingDir::enter(dir)?;
    run_args(&ShellRunner::default(), args)
}

/// A bare remote with one commit on `master`, plus a work tree used to push
/// further commits to it.
pub struct TestRemote {
    _temp_dir: TempDir,
    bare: PathBuf,
    author: PathBuf,
}

impl TestRemote {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let bare = temp_dir.path().join("remote.git");
        let author = temp_dir.path().join("author");
        std::fs::create_dir_all(&bare)?;
        std::fs::create_dir_all(&author)?;

        git_in(&bare, &["git", "init", "--bare", "-b", "master"])?;
        git_in(&author, &["git", "init", "-b", "master"])?;
        configure_identity(&author)?;
        std::fs::write(author.join("README.md"), "# Test Repo\n")?;
        git_in(&author, &["git", "add", "README.md"])?;
        git_in(&author, &["git", "commit", "-m", "Initial commit"])?;
        git_in(
            &author,
            &["git", "remote", "add", "origin", &bare.to_string_lossy()],
        )?;
        git_in(&author, &["git", "push", "-u", "origin", "master"])?;

        Ok(Self {
            _temp_dir: temp_dir,
            bare,
            author,
        })
    }

    pub fn url(&self) -> String {
        self.bare.to_string_lossy().into_owned()
    }

    /// Commits a new file from the author work tree and pushes it.
    pub fn push_commit(&self, file: &str) -> Result<()> {
        std::fs::write(self.author.join(file), "content\n")?;
        git_in(&self.author, &["git", "add", file])?;
        git_in(&self.author, &["git", "commit", "-m", &format!("Add {}", file)])?;
        git_in(&self.author, &["git", "push", "origin", "master"])?;
        Ok(())
    }
}

pub fn configure_identity(repo: &Path) -> Result<()> {
    git_in(repo, &["git", "config", "user.email", "test@example.com"])?;
    git_in(repo, &["git", "config", "user.name", "Test User"])?;
    Ok(())
}
