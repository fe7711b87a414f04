//! `frpbar config` — persisted settings

use clap::Subcommand;

use crate::settings::Settings;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the current settings
    Show,
    /// Remember the frpc executable path
    SetExecutable { path: String },
    /// Remember the frpc config file path
    SetConfig { path: String },
    /// Start frpc automatically when the app launches
    SetStartOnLaunch { value: bool },
}

pub fn run(command: ConfigCommand) -> anyhow::Result<()> {
    let mut settings = Settings::load()?;
    match command {
        ConfigCommand::Show => {
            println!(
                "executable:      {}",
                settings.executable_path.as_deref().unwrap_or("-")
            );
            println!(
                "config:          {}",
                settings.config_path.as_deref().unwrap_or("-")
            );
            println!("start on login:  {}", settings.start_on_login);
            println!("start on launch: {}", settings.start_on_launch);
            return Ok(());
        }
        ConfigCommand::SetExecutable { path } => settings.executable_path = Some(path),
        ConfigCommand::SetConfig { path } => settings.config_path = Some(path),
        ConfigCommand::SetStartOnLaunch { value } => settings.start_on_launch = value,
    }
    settings.save()?;
    println!("Saved.");
    Ok(())
}
