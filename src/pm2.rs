//! pm2 process manager wrapper.

use crate::constants::PM2;
use crate::shell::{CommandRunner, run_args};
use anyhow::Context;

pub fn restart(runner: &dyn CommandRunner, service: &str) -> anyhow::Result<()> {
    run_args(runner, &[PM2, "restart", service])
        .with_context(|| format!("Failed to restart pm2 app '{}'", service))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::CommandOutput;
    use std::cell::RefCell;

    struct Recorder(RefCell<Vec<String>>, CommandOutput);

    impl CommandRunner for Recorder {
        fn run(&self, command: &str, _show_output: bool) -> anyhow::Result<CommandOutput> {
            self.0.borrow_mut().push(command.to_string());
            Ok(self.1.clone())
        }
    }

    #[test]
    fn test_restart_issues_pm2_restart() -> anyhow::Result<()> {
        let runner = Recorder(RefCell::new(Vec::new()), CommandOutput::success(""));
        restart(&runner, "api")?;
        assert_eq!(*runner.0.borrow(), vec!["pm2 restart api"]);
        Ok(())
    }

    #[test]
    fn test_restart_failure_names_the_app() {
        let runner = Recorder(
            RefCell::new(Vec::new()),
            CommandOutput::failure(1, "[PM2][ERROR] Process api not found"),
        );
        let err = restart(&runner, "api").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to restart pm2 app 'api'"));
        assert!(format!("{:#}", err).contains("not found"));
    }
}
