//! `frpbar run` — start frpc and stream its output

use std::io::Write;

use crate::cli::{resolve_paths, ProcessArgs};
use crate::notifications;
use crate::settings::Settings;
use crate::supervisor::{strip_ansi, trailing_escape_len, ProcessSupervisor, SupervisorEvent};

pub async fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let (executable, config) = resolve_paths(&args, &settings)?;

    let supervisor = ProcessSupervisor::new();
    let events = supervisor.subscribe();

    if let Err(err) = supervisor.start(&executable, &config) {
        notifications::show_notification("frpc start failed", &err.to_string());
        return Err(err.into());
    }

    // Ctrl-C asks the supervisor for a graceful stop; the event stream ends
    // with the StateChanged(false) that follows.
    let stopper = supervisor.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping frpc");
            stopper.stop();
        }
    });

    tokio::task::spawn_blocking(move || {
        let mut stdout = std::io::stdout();
        // Escape sequences can be cut at chunk boundaries; hold the
        // unfinished tail back until the rest arrives.
        let mut pending = String::new();
        for event in events {
            match event {
                SupervisorEvent::Output(chunk) => {
                    pending.push_str(&chunk);
                    let split = pending.len() - trailing_escape_len(&pending);
                    let complete: String = pending.drain(..split).collect();
                    let _ = write!(stdout, "{}", strip_ansi(&complete));
                    let _ = stdout.flush();
                }
                SupervisorEvent::StateChanged(false) => break,
                SupervisorEvent::StateChanged(true) => {}
            }
        }
        if !pending.is_empty() {
            let _ = write!(stdout, "{}", strip_ansi(&pending));
            let _ = stdout.flush();
        }
    })
    .await?;

    Ok(())
}

pub fn kill(executable: Option<String>) -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let target = executable
        .or(settings.executable_path)
        .unwrap_or_else(|| "frpc".to_string());

    let supervisor = ProcessSupervisor::new();
    supervisor.force_kill(&target);
    print!("{}", supervisor.cleaned_output());
    Ok(())
}
