//! Login-item registration ("start on login")
//!
//! macOS gets a LaunchAgent plist, Windows a Run-key registry value, and
//! everything else an XDG autostart desktop entry. The registered command
//! is `frpbar run`, which picks up the saved executable and config paths.

use anyhow::Context;
use std::path::Path;

/// Registers the current executable to run at login.
pub fn enable() -> anyhow::Result<()> {
    let exe = std::env::current_exe().context("could not resolve current executable")?;
    platform_enable(&exe)?;
    tracing::info!(exe = %exe.display(), "autostart enabled");
    Ok(())
}

/// Removes the login-item registration. No-op when not registered.
pub fn disable() -> anyhow::Result<()> {
    platform_disable()?;
    tracing::info!("autostart disabled");
    Ok(())
}

pub fn is_enabled() -> bool {
    platform_is_enabled()
}

#[cfg(any(target_os = "macos", test))]
fn render_launch_agent(exe: &Path) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>com.frpbar.app</string>
    <key>ProgramArguments</key>
    <array>
        <string>{}</string>
        <string>run</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
        exe.display()
    )
}

#[cfg(any(all(unix, not(target_os = "macos")), test))]
fn render_desktop_entry(exe: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=frpbar\n\
         Exec={} run\n\
         X-GNOME-Autostart-enabled=true\n",
        exe.display()
    )
}

#[cfg(target_os = "macos")]
fn agent_path() -> anyhow::Result<std::path::PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home
        .join("Library/LaunchAgents")
        .join("com.frpbar.app.plist"))
}

#[cfg(target_os = "macos")]
fn platform_enable(exe: &Path) -> anyhow::Result<()> {
    let path = agent_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, render_launch_agent(exe))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn platform_disable() -> anyhow::Result<()> {
    let path = agent_path()?;
    if path.exists() {
        std::fs::remove_file(&path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn platform_is_enabled() -> bool {
    agent_path().map(|p| p.exists()).unwrap_or(false)
}

#[cfg(windows)]
const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";
#[cfg(windows)]
const RUN_VALUE: &str = "frpbar";

#[cfg(windows)]
fn platform_enable(exe: &Path) -> anyhow::Result<()> {
    use winreg::enums::HKEY_CURRENT_USER;
    use winreg::RegKey;

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let (key, _) = hkcu
        .create_subkey(RUN_KEY)
        .context("failed to open Run key")?;
    key.set_value(RUN_VALUE, &format!("\"{}\" run", exe.display()))
        .context("failed to set Run value")?;
    Ok(())
}

#[cfg(windows)]
fn platform_disable() -> anyhow::Result<()> {
    use winreg::enums::HKEY_CURRENT_USER;
    use winreg::RegKey;

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    if let Ok(key) = hkcu.open_subkey_with_flags(RUN_KEY, winreg::enums::KEY_ALL_ACCESS) {
        let _ = key.delete_value(RUN_VALUE);
    }
    Ok(())
}

#[cfg(windows)]
fn platform_is_enabled() -> bool {
    use winreg::enums::HKEY_CURRENT_USER;
    use winreg::RegKey;

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    hkcu.open_subkey(RUN_KEY)
        .and_then(|key| key.get_value::<String, _>(RUN_VALUE))
        .is_ok()
}

#[cfg(all(unix, not(target_os = "macos")))]
fn entry_path() -> anyhow::Result<std::path::PathBuf> {
    let base = dirs::config_dir().context("could not determine config directory")?;
    Ok(base.join("autostart").join("frpbar.desktop"))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_enable(exe: &Path) -> anyhow::Result<()> {
    let path = entry_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, render_desktop_entry(exe))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_disable() -> anyhow::Result<()> {
    let path = entry_path()?;
    if path.exists() {
        std::fs::remove_file(&path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
    }
    Ok(())
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_is_enabled() -> bool {
    entry_path().map(|p| p.exists()).unwrap_or(false)
}

#[cfg(not(any(unix, windows)))]
fn platform_enable(_exe: &Path) -> anyhow::Result<()> {
    anyhow::bail!("autostart is not supported on this platform")
}

#[cfg(not(any(unix, windows)))]
fn platform_disable() -> anyhow::Result<()> {
    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn platform_is_enabled() -> bool {
    false
}
