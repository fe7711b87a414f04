//! Command-line interface
//!
//! Stands in for the original menu-bar UI: every button maps to a
//! subcommand. Paths come from flags first, then from saved settings.

pub mod autostart;
pub mod config;
pub mod oneshot;
pub mod run;
pub mod search;

use clap::{Args, Parser, Subcommand};

use crate::settings::Settings;
use crate::supervisor::SupervisorError;

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    /// A required path was not supplied (flag or saved setting).
    pub const MISSING_INPUT: i32 = 2;
    /// The child process could not be launched or supervised.
    pub const PROCESS_FAILURE: i32 = 3;
    /// A registry request failed.
    pub const NETWORK_FAILURE: i32 = 4;
    pub const UNEXPECTED_FAILURE: i32 = 70;
}

#[derive(Parser)]
#[command(
    name = "frpbar",
    version,
    about = "Supervisor for the frp tunneling client",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_output: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start frpc and stream its output until it exits or Ctrl-C
    Run(ProcessArgs),
    /// Verify a config file without starting frpc
    Verify(ProcessArgs),
    /// Ask a running frpc to reload its config
    Reload(ProcessArgs),
    /// Force-kill every process matching the frpc executable name
    Kill(KillArgs),
    /// Search Docker Hub for images
    Search(SearchArgs),
    /// List tags for a Docker Hub image
    Tags(TagsArgs),
    /// Show or change persisted settings
    Config(ConfigArgs),
    /// Manage start-on-login registration
    Autostart(AutostartArgs),
}

#[derive(Args)]
pub struct ProcessArgs {
    /// Path to the frpc executable (defaults to the saved setting)
    #[arg(short = 'e', long)]
    pub executable: Option<String>,

    /// Path to the frpc config file (defaults to the saved setting)
    #[arg(short = 'c', long)]
    pub config: Option<String>,
}

#[derive(Args)]
pub struct KillArgs {
    /// Executable whose name to kill (defaults to the saved setting, then "frpc")
    #[arg(short = 'e', long)]
    pub executable: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Free-text image name to search for
    pub query: String,
}

#[derive(Args)]
pub struct TagsArgs {
    /// Image name; bare names are looked up under the library/ namespace
    pub image: String,

    /// Number of tags to fetch
    #[arg(long, default_value_t = crate::registry::DEFAULT_TAG_PAGE_SIZE)]
    pub page_size: u32,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: config::ConfigCommand,
}

#[derive(Args)]
pub struct AutostartArgs {
    #[command(subcommand)]
    pub command: autostart::AutostartCommand,
}

/// Flag beats saved setting; missing both is the caller error the
/// supervisor would report anyway.
pub fn resolve_paths(
    args: &ProcessArgs,
    settings: &Settings,
) -> Result<(String, String), SupervisorError> {
    let executable = args
        .executable
        .clone()
        .or_else(|| settings.executable_path.clone())
        .unwrap_or_default();
    let config = args
        .config
        .clone()
        .or_else(|| settings.config_path.clone())
        .unwrap_or_default();
    if executable.is_empty() || config.is_empty() {
        return Err(SupervisorError::MissingInput);
    }
    Ok((executable, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(executable: Option<&str>, config: Option<&str>) -> ProcessArgs {
        ProcessArgs {
            executable: executable.map(String::from),
            config: config.map(String::from),
        }
    }

    #[test]
    fn flags_beat_saved_settings() {
        let settings = Settings {
            executable_path: Some("/saved/frpc".into()),
            config_path: Some("/saved/frpc.yaml".into()),
            ..Settings::default()
        };
        let (exe, cfg) =
            resolve_paths(&args(Some("/flag/frpc"), None), &settings).unwrap();
        assert_eq!(exe, "/flag/frpc");
        assert_eq!(cfg, "/saved/frpc.yaml");
    }

    #[test]
    fn missing_both_sources_is_rejected() {
        let err = resolve_paths(&args(None, None), &Settings::default()).unwrap_err();
        assert!(matches!(err, SupervisorError::MissingInput));
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["frpbar", "tags", "nginx", "--page-size", "10"]).unwrap();
        match cli.command {
            Commands::Tags(tags) => {
                assert_eq!(tags.image, "nginx");
                assert_eq!(tags.page_size, 10);
            }
            _ => panic!("expected tags subcommand"),
        }
    }
}
