use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use locsync::LocsyncContext;
use locsync::cli::{Cli, Commands};
use locsync::commands::setup::SetupAction;
use locsync::commands::{self, Outcome};
use locsync::config::Config;
use locsync::errors::SyncError;
use locsync::output::{self, Verbosity};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

/// Exit code for failures, distinct from "changes pending"
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    output::set_verbosity(if cli.quiet {
        Verbosity::Quiet
    } else if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    });

    match run(cli) {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(e) => {
            match e.downcast_ref::<SyncError>() {
                Some(sync_error) => commands::print_error(&format!(
                    "{}: {}",
                    sync_error.error_type(),
                    sync_error.user_message()
                )),
                None => commands::print_error(&format!("{e:#}")),
            }
            process::exit(EXIT_ERROR);
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug output with `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "locsync=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<Outcome> {
    let context = || LocsyncContext::new(&cli.target, cli.source.as_deref());

    match cli.command {
        Commands::Check => commands::check::execute(&context()?),
        Commands::Status { format } => {
            commands::status::execute(&context()?, format)?;
            Ok(Outcome::Clean)
        }
        Commands::Sync { dry_run } => commands::sync::execute(&context()?, dry_run),
        Commands::Setup {
            ref directory,
            all,
            list,
            ref base,
        } => {
            let action = match (directory, all, list) {
                (Some(dir), _, _) => SetupAction::One(dir.clone()),
                (None, true, _) => SetupAction::All,
                (None, false, _) => SetupAction::List,
            };
            let (config, _) = Config::discover(base)?;
            commands::setup::execute(base, &config, &action)
        }
        Commands::Completion { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(Outcome::Clean)
        }
    }
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
