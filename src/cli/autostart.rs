//! `frpbar autostart` — start-on-login registration

use clap::Subcommand;

use crate::autostart;
use crate::settings::Settings;

#[derive(Subcommand)]
pub enum AutostartCommand {
    /// Register frpbar to run at login
    Enable,
    /// Remove the login-item registration
    Disable,
    /// Report whether the registration is present
    Status,
}

pub fn run(command: AutostartCommand) -> anyhow::Result<()> {
    match command {
        AutostartCommand::Enable => {
            autostart::enable()?;
            update_flag(true)?;
            println!("Autostart enabled.");
        }
        AutostartCommand::Disable => {
            autostart::disable()?;
            update_flag(false)?;
            println!("Autostart disabled.");
        }
        AutostartCommand::Status => {
            println!(
                "Autostart is {}.",
                if autostart::is_enabled() {
                    "enabled"
                } else {
                    "disabled"
                }
            );
        }
    }
    Ok(())
}

fn update_flag(enabled: bool) -> anyhow::Result<()> {
    let mut settings = Settings::load()?;
    settings.start_on_login = enabled;
    settings.save()
}
