//! frpbar - supervisor CLI for the frp tunneling client
//!
//! A command-line port of the xFRP menu-bar app:
//! - start/stop/verify/reload of a user-selected frpc executable
//! - combined-output capture with ANSI cleanup
//! - Docker Hub image and tag search
//! - persisted paths and start-on-login registration

mod autostart;
mod cli;
mod logging;
mod notifications;
mod registry;
mod settings;
mod supervisor;

use clap::Parser;
use cli::{exit_codes, Cli, Commands};
use registry::RegistryError;
use supervisor::SupervisorError;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.json_output) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return exit_codes::UNEXPECTED_FAILURE;
        }
    };

    match cli.command {
        Commands::Run(args) => rt.block_on(report(cli::run::run(args))),
        Commands::Verify(args) => rt.block_on(report(cli::oneshot::verify(args))),
        Commands::Reload(args) => rt.block_on(report(cli::oneshot::reload(args))),
        Commands::Kill(args) => report_sync(cli::run::kill(args.executable)),
        Commands::Search(args) => rt.block_on(report(cli::search::search(args))),
        Commands::Tags(args) => rt.block_on(report(cli::search::tags(args))),
        Commands::Config(args) => report_sync(cli::config::run(args.command)),
        Commands::Autostart(args) => report_sync(cli::autostart::run(args.command)),
    }
}

async fn report(result: impl std::future::Future<Output = anyhow::Result<()>>) -> i32 {
    report_sync(result.await)
}

fn report_sync(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            categorize_error(&e)
        }
    }
}

/// Categorize an error into the appropriate exit code
fn categorize_error(e: &anyhow::Error) -> i32 {
    if let Some(err) = e.downcast_ref::<SupervisorError>() {
        return match err {
            SupervisorError::MissingInput => exit_codes::MISSING_INPUT,
            _ => exit_codes::PROCESS_FAILURE,
        };
    }
    if e.downcast_ref::<RegistryError>().is_some() {
        return exit_codes::NETWORK_FAILURE;
    }
    exit_codes::UNEXPECTED_FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_maps_to_its_own_code() {
        let err = anyhow::Error::from(SupervisorError::MissingInput);
        assert_eq!(categorize_error(&err), exit_codes::MISSING_INPUT);
    }

    #[test]
    fn spawn_failures_map_to_process_code() {
        let err = anyhow::Error::from(SupervisorError::SpawnFailed("exec failed".into()));
        assert_eq!(categorize_error(&err), exit_codes::PROCESS_FAILURE);
    }

    #[test]
    fn other_errors_are_unexpected() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&err), exit_codes::UNEXPECTED_FAILURE);
    }
}
