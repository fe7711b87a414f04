//! User-facing notifications
//!
//! Fire-and-forget alerts for start failures. Nothing here is part of the
//! supervisor's return contract; callers already get the error value.

/// Shows a one-off system notification.
pub fn show_notification(title: &str, body: &str) {
    show_toast(title, body);
}

#[cfg(target_os = "macos")]
fn show_toast(title: &str, body: &str) {
    use std::process::Command;

    let script = format!(
        r#"display notification "{}" with title "{}""#,
        escape_applescript(body),
        escape_applescript(title),
    );
    let _ = Command::new("osascript").args(["-e", &script]).spawn();
}

#[cfg(target_os = "macos")]
fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(target_os = "windows")]
fn show_toast(title: &str, body: &str) {
    use std::os::windows::process::CommandExt;
    use std::process::Command;

    // PowerShell toast; avoids pulling WinRT bindings in for one alert.
    let script = format!(
        r#"
        [Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null
        [Windows.Data.Xml.Dom.XmlDocument, Windows.Data.Xml.Dom.XmlDocument, ContentType = WindowsRuntime] | Out-Null

        $template = @"
        <toast>
            <visual>
                <binding template="ToastText02">
                    <text id="1">{}</text>
                    <text id="2">{}</text>
                </binding>
            </visual>
        </toast>
"@

        $xml = New-Object Windows.Data.Xml.Dom.XmlDocument
        $xml.LoadXml($template)
        $toast = [Windows.UI.Notifications.ToastNotification]::new($xml)
        [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier("frpbar").Show($toast)
        "#,
        title.replace('"', "'"),
        body.replace('"', "'")
    );

    let _ = Command::new("powershell")
        .args(["-ExecutionPolicy", "Bypass", "-Command", &script])
        .creation_flags(0x08000000) // CREATE_NO_WINDOW
        .spawn();
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn show_toast(title: &str, body: &str) {
    tracing::info!("Notification: {} - {}", title, body);
}

#[cfg(test)]
mod tests {
    #[cfg(target_os = "macos")]
    #[test]
    fn escapes_applescript_quotes() {
        assert_eq!(
            super::escape_applescript(r#"say "hi" \now"#),
            r#"say \"hi\" \\now"#
        );
    }

    #[test]
    fn show_notification_does_not_panic() {
        super::show_notification("frpc start failed", "executable not found");
    }
}
