use clap::Parser;
use product_updater::config::{Config, Verbosity};
use product_updater::prompt::{DefaultPrompter, Prompter, TerminalPrompter};
use product_updater::repo::{UpdateResult, Updater};
use product_updater::shell::ShellRunner;
use product_updater::{document, output, product, steps};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Pull, build and restart every product listed in .updater.yml
#[derive(Parser, Debug)]
#[command(name = "update-products", version, about, long_about = None)]
struct Cli {
    /// Configuration file [default: ./.updater.yml]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Answer every prompt with its default (clone missing repos, skip up-to-date ones)
    #[arg(short = 'y', long)]
    yes: bool,

    /// Only print the final summary
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Echo every command before it runs
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config {
        verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
    };

    let loaded = match &cli.config {
        Some(path) => document::load_from(path),
        None => document::load(),
    };
    let doc = match loaded {
        Ok(doc) => doc,
        Err(e) => {
            output::print_fatal(&e);
            return ExitCode::FAILURE;
        }
    };

    let runner = ShellRunner::new(config.command_logger());
    let prompter: Box<dyn Prompter> = if cli.yes {
        Box::new(DefaultPrompter)
    } else {
        Box::new(TerminalPrompter::default())
    };
    let show = doc.options.show_stdout;

    output::print_group_start(&config, "before", doc.before.len());
    if let Err(e) = steps::run_steps(&runner, &config, &doc.before, show.before, false) {
        output::print_fatal(&format!("{:#}", e));
        return ExitCode::FAILURE;
    }

    let start = Instant::now();
    let updater = Updater::new(config, &runner, prompter.as_ref()).show_step_output(show.steps);
    let results: Vec<UpdateResult> = product::normalize(&doc.products, &doc.templates)
        .map(|item| match item {
            Ok(project) => updater.update(&project),
            Err(e) => {
                output::print_error(&e);
                UpdateResult::rejected(e.product.clone(), &e.source)
            }
        })
        .collect();

    output::print_group_start(&config, "after", doc.after.len());
    let after = steps::run_steps(&runner, &config, &doc.after, show.after, false);
    if let Err(e) = &after {
        output::print_error(&format!("{:#}", e));
    }

    output::print_summary(&results, start.elapsed(), &config);

    if after.is_err() || results.iter().any(UpdateResult::is_failure) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
