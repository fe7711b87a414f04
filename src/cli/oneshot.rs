//! `frpbar verify` / `frpbar reload` — one-shot frpc invocations

use crate::cli::{resolve_paths, ProcessArgs};
use crate::settings::Settings;
use crate::supervisor::{strip_ansi, ProcessSupervisor};

pub async fn verify(args: ProcessArgs) -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let (executable, config) = resolve_paths(&args, &settings)?;

    let supervisor = ProcessSupervisor::new();
    let output = supervisor.verify_config_async(&executable, &config).await?;
    println!("Config verification result:");
    print!("{}", strip_ansi(&output));
    Ok(())
}

pub async fn reload(args: ProcessArgs) -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let (executable, config) = resolve_paths(&args, &settings)?;

    let supervisor = ProcessSupervisor::new();
    let output = supervisor.reload_config_async(&executable, &config).await?;
    println!("Config reload result:");
    print!("{}", strip_ansi(&output));
    Ok(())
}
