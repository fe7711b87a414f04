//! Lifecycle management for the supervised frpc process
//!
//! The supervisor owns zero or one child process. Output from both pipes is
//! relayed onto the console buffer by background reader threads; every state
//! mutation goes through one mutex so callers always observe appends in
//! producer order. Construct one supervisor at startup and hand references
//! to whoever needs it.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::console::ConsoleBuffer;

/// Line appended to the console whenever `stop` runs.
pub const STOPPED_MARKER: &str = "frpc stopped";

/// How long `stop` waits after SIGTERM before falling back to a hard kill.
const GRACEFUL_STOP_TIMEOUT: Duration = Duration::from_millis(1_500);
/// Poll interval for child exit checks.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(120);

#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("select a config file and an executable first")]
    MissingInput,
    #[error("executable not found at '{0}'")]
    ExecutableNotFound(String),
    #[error(
        "'{0}' is not executable by the current user; fix the file mode or \
         grant the app broader file access"
    )]
    PermissionDenied(String),
    #[error("a supervised process is already running; stop it first")]
    AlreadyRunning,
    #[error("failed to launch process: {0}")]
    SpawnFailed(String),
}

/// Events delivered to subscribers, in the order they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// A chunk of combined stdout/stderr output (raw, not ANSI-cleaned).
    Output(String),
    /// The running flag changed.
    StateChanged(bool),
}

struct Inner {
    console: ConsoleBuffer,
    child: Option<Child>,
    running: bool,
    /// Bumped by `stop`/`force_kill`; readers holding a stale epoch discard
    /// their chunk instead of appending after the stopped marker.
    epoch: u64,
    subscribers: Vec<Sender<SupervisorEvent>>,
}

impl Inner {
    fn broadcast(&mut self, event: SupervisorEvent) {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn append(&mut self, chunk: &str) {
        self.console.append(chunk);
        self.broadcast(SupervisorEvent::Output(chunk.to_string()));
    }
}

/// Supervises at most one frpc child process at a time.
///
/// Cloning is cheap and shares the same supervised state.
#[derive(Clone)]
pub struct ProcessSupervisor {
    inner: Arc<Mutex<Inner>>,
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                console: ConsoleBuffer::new(),
                child: None,
                running: false,
                epoch: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Spawns `<executable> -c <config>` and begins relaying its output.
    ///
    /// Fails without spawning when either path is missing, when the
    /// executable does not exist or is not executable, or when a child is
    /// already supervised.
    pub fn start(&self, executable: &str, config: &str) -> Result<(), SupervisorError> {
        let resolved = match validate_invocation(executable, config) {
            Ok(path) => path,
            Err(err) => {
                self.report_start_failure(&err);
                return Err(err);
            }
        };

        let mut inner = lock(&self.inner);
        if inner.running {
            return Err(SupervisorError::AlreadyRunning);
        }

        let mut command = Command::new(&resolved);
        command
            .args(["-c", config])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(error) => {
                let err = SupervisorError::SpawnFailed(error.to_string());
                drop(inner);
                self.report_start_failure(&err);
                return Err(err);
            }
        };

        tracing::info!(
            pid = child.id(),
            executable = %resolved.display(),
            config,
            "frpc started"
        );

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        inner.child = Some(child);
        inner.running = true;
        let epoch = inner.epoch;
        inner.broadcast(SupervisorEvent::StateChanged(true));
        drop(inner);

        if let Some(pipe) = stdout {
            spawn_reader(Arc::clone(&self.inner), pipe, epoch);
        }
        if let Some(pipe) = stderr {
            spawn_reader(Arc::clone(&self.inner), pipe, epoch);
        }
        spawn_exit_watcher(Arc::clone(&self.inner));

        Ok(())
    }

    /// Gracefully terminates the supervised child, if any.
    ///
    /// Idempotent: always clears the running flag and appends the stopped
    /// marker, whether or not a child was alive.
    pub fn stop(&self) {
        let child = {
            let mut inner = lock(&self.inner);
            inner.running = false;
            inner.epoch += 1;
            inner.child.take()
        };

        if let Some(mut child) = child {
            terminate_gracefully(&mut child);
        }

        let mut inner = lock(&self.inner);
        inner.append(&format!("{STOPPED_MARKER}\n"));
        inner.broadcast(SupervisorEvent::StateChanged(false));
    }

    /// Kills every process whose image name matches the executable's file
    /// name, not just the one this supervisor spawned.
    ///
    /// Escape hatch for when the owned handle is unresponsive or lost.
    pub fn force_kill(&self, executable: &str) {
        let name = executable_name(executable);
        kill_by_name(&name);

        let mut inner = lock(&self.inner);
        if let Some(mut child) = inner.child.take() {
            // Reap whatever the environment-wide kill left behind.
            let _ = child.kill();
            let _ = child.wait();
        }
        let was_running = inner.running;
        inner.running = false;
        inner.epoch += 1;
        inner.append(&format!("force killed {name}\n"));
        if was_running {
            inner.broadcast(SupervisorEvent::StateChanged(false));
        }
    }

    /// Runs `<executable> verify -c <config>` to completion and appends a
    /// labeled report to the console. Returns the combined output.
    pub fn verify_config(
        &self,
        executable: &str,
        config: &str,
    ) -> Result<String, SupervisorError> {
        self.one_shot(executable, config, "verify", "Config verification result")
    }

    /// Runs `<executable> reload -c <config>` to completion and appends a
    /// labeled report to the console. Returns the combined output.
    ///
    /// The supervisor does not check that a child is running; frpc itself
    /// reports when there is nothing listening on the admin port.
    pub fn reload_config(
        &self,
        executable: &str,
        config: &str,
    ) -> Result<String, SupervisorError> {
        self.one_shot(executable, config, "reload", "Config reload result")
    }

    /// Async wrapper around [`verify_config`](Self::verify_config) for use
    /// from the tokio runtime; the blocking wait happens off-thread.
    pub async fn verify_config_async(
        &self,
        executable: &str,
        config: &str,
    ) -> Result<String, SupervisorError> {
        self.one_shot_async(executable, config, OneShot::Verify).await
    }

    /// Async wrapper around [`reload_config`](Self::reload_config).
    pub async fn reload_config_async(
        &self,
        executable: &str,
        config: &str,
    ) -> Result<String, SupervisorError> {
        self.one_shot_async(executable, config, OneShot::Reload).await
    }

    /// Registers a subscriber. Dropping the receiver cancels the
    /// subscription; dead subscribers are pruned on the next event.
    pub fn subscribe(&self) -> Receiver<SupervisorEvent> {
        let (tx, rx) = unbounded();
        lock(&self.inner).subscribers.push(tx);
        rx
    }

    pub fn is_running(&self) -> bool {
        lock(&self.inner).running
    }

    /// Snapshot of the raw accumulated output.
    pub fn output(&self) -> String {
        lock(&self.inner).console.raw().to_string()
    }

    /// Snapshot of the ANSI-cleaned accumulated output.
    pub fn cleaned_output(&self) -> String {
        lock(&self.inner).console.cleaned().to_string()
    }

    /// Resets both output buffers to empty.
    pub fn clear_output(&self) {
        lock(&self.inner).console.clear();
    }

    fn one_shot(
        &self,
        executable: &str,
        config: &str,
        action: &str,
        label: &str,
    ) -> Result<String, SupervisorError> {
        let result = run_one_shot(executable, config, action);
        let mut inner = lock(&self.inner);
        match &result {
            Ok(text) => inner.append(&format!("{label}:\n{text}\n")),
            Err(err) => inner.append(&format!("{label} failed: {err}\n")),
        }
        result
    }

    async fn one_shot_async(
        &self,
        executable: &str,
        config: &str,
        kind: OneShot,
    ) -> Result<String, SupervisorError> {
        let supervisor = self.clone();
        let executable = executable.to_string();
        let config = config.to_string();
        tokio::task::spawn_blocking(move || match kind {
            OneShot::Verify => supervisor.verify_config(&executable, &config),
            OneShot::Reload => supervisor.reload_config(&executable, &config),
        })
        .await
        .map_err(|e| SupervisorError::SpawnFailed(e.to_string()))?
    }

    fn report_start_failure(&self, err: &SupervisorError) {
        tracing::warn!(error = %err, "frpc start failed");
        lock(&self.inner).append(&format!("Failed to start frpc: {err}\n"));
    }
}

#[derive(Clone, Copy)]
enum OneShot {
    Verify,
    Reload,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Validates both paths and resolves the executable.
///
/// Bare names (no path separator) are looked up on PATH; anything else must
/// exist on disk as given. The config file itself is not checked — frpc
/// reports its own config errors.
fn validate_invocation(executable: &str, config: &str) -> Result<PathBuf, SupervisorError> {
    if executable.trim().is_empty() || config.trim().is_empty() {
        return Err(SupervisorError::MissingInput);
    }

    let path = Path::new(executable);
    let resolved = if path.exists() {
        path.to_path_buf()
    } else if !executable.contains(std::path::MAIN_SEPARATOR) && !executable.contains('/') {
        which::which(executable)
            .map_err(|_| SupervisorError::ExecutableNotFound(executable.to_string()))?
    } else {
        return Err(SupervisorError::ExecutableNotFound(executable.to_string()));
    };

    if !is_executable(&resolved) {
        return Err(SupervisorError::PermissionDenied(
            resolved.display().to_string(),
        ));
    }

    Ok(resolved)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

fn executable_name(executable: &str) -> String {
    Path::new(executable)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "frpc".to_string())
}

/// Runs the one-shot invocation to completion, returning stdout and stderr
/// concatenated. Non-zero exit is not an error: the report is whatever the
/// subprocess printed.
fn run_one_shot(
    executable: &str,
    config: &str,
    action: &str,
) -> Result<String, SupervisorError> {
    let resolved = validate_invocation(executable, config)?;
    let output = Command::new(&resolved)
        .args([action, "-c", config])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| SupervisorError::SpawnFailed(e.to_string()))?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(text)
}

/// Relays one pipe onto the console buffer, chunk by chunk, until EOF.
///
/// Once `stop`/`force_kill` has bumped the epoch, nothing more may land in
/// the buffer: the stopped marker stays the final line even when pipe data
/// arrives late (a descheduled read, or a grandchild holding the pipe open).
fn spawn_reader<R: Read + Send + 'static>(inner: Arc<Mutex<Inner>>, mut pipe: R, epoch: u64) {
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                    let mut guard = lock(&inner);
                    if guard.epoch != epoch {
                        break;
                    }
                    guard.append(&chunk);
                }
            }
        }
    });
}

/// Flips the running flag when the child exits on its own. Exits quietly if
/// `stop`/`force_kill` already claimed the handle.
fn spawn_exit_watcher(inner: Arc<Mutex<Inner>>) {
    thread::spawn(move || loop {
        thread::sleep(EXIT_POLL_INTERVAL);
        let mut guard = lock(&inner);
        let Some(child) = guard.child.as_mut() else {
            break;
        };
        match child.try_wait() {
            Ok(None) => {}
            Ok(Some(status)) => {
                tracing::info!(%status, "supervised process exited");
                guard.child = None;
                guard.running = false;
                guard.broadcast(SupervisorEvent::StateChanged(false));
                break;
            }
            Err(error) => {
                tracing::warn!(%error, "lost track of supervised process");
                guard.child = None;
                guard.running = false;
                guard.broadcast(SupervisorEvent::StateChanged(false));
                break;
            }
        }
    });
}

/// Waits for the child to exit, polling `try_wait`, up to `timeout`.
fn wait_for_exit(child: &mut Child, timeout: Duration) -> bool {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return true,
            Ok(None) => {
                if start.elapsed() >= timeout {
                    return false;
                }
                thread::sleep(EXIT_POLL_INTERVAL);
            }
            Err(_) => return false,
        }
    }
}

#[cfg(unix)]
fn terminate_gracefully(child: &mut Child) {
    let pid = child.id().to_string();
    let status = Command::new("kill")
        .args(["-TERM", &pid])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if !matches!(&status, Ok(s) if s.success()) {
        tracing::warn!(%pid, ?status, "kill -TERM did not succeed");
    }
    if !wait_for_exit(child, GRACEFUL_STOP_TIMEOUT) {
        tracing::warn!(%pid, "graceful stop timed out, killing");
        let _ = child.kill();
        let _ = child.wait();
    }
}

#[cfg(windows)]
fn terminate_gracefully(child: &mut Child) {
    let pid = child.id().to_string();
    let status = Command::new("taskkill")
        .args(["/pid", &pid, "/t"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if !matches!(&status, Ok(s) if s.success()) {
        tracing::warn!(%pid, ?status, "taskkill did not succeed");
    }
    if !wait_for_exit(child, GRACEFUL_STOP_TIMEOUT) {
        tracing::warn!(%pid, "graceful stop timed out, killing");
        let _ = child.kill();
        let _ = child.wait();
    }
}

#[cfg(not(any(unix, windows)))]
fn terminate_gracefully(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(unix)]
fn kill_by_name(name: &str) {
    let status = Command::new("pkill")
        .args(["-x", name])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    tracing::info!(name, ?status, "pkill issued");
}

#[cfg(windows)]
fn kill_by_name(name: &str) {
    let image = if name.to_ascii_lowercase().ends_with(".exe") {
        name.to_string()
    } else {
        format!("{name}.exe")
    };
    let status = Command::new("taskkill")
        .args(["/IM", &image, "/F", "/T"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    tracing::info!(%image, ?status, "taskkill issued");
}

#[cfg(not(any(unix, windows)))]
fn kill_by_name(name: &str) {
    tracing::warn!(name, "kill-by-name is not supported on this platform");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(25));
        }
        cond()
    }

    #[cfg(unix)]
    fn write_script(dir: &std::path::Path, name: &str, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[test]
    fn start_rejects_missing_input() {
        let supervisor = ProcessSupervisor::new();
        assert!(matches!(
            supervisor.start("", "/tmp/cfg.yaml"),
            Err(SupervisorError::MissingInput)
        ));
        assert!(matches!(
            supervisor.start("/usr/bin/true", ""),
            Err(SupervisorError::MissingInput)
        ));
        assert!(!supervisor.is_running());
    }

    #[test]
    fn one_shots_reject_missing_input() {
        let supervisor = ProcessSupervisor::new();
        assert!(matches!(
            supervisor.verify_config("", "/tmp/cfg.yaml"),
            Err(SupervisorError::MissingInput)
        ));
        assert!(matches!(
            supervisor.reload_config("/usr/bin/true", ""),
            Err(SupervisorError::MissingInput)
        ));
    }

    #[test]
    fn start_rejects_nonexistent_executable() {
        let supervisor = ProcessSupervisor::new();
        let err = supervisor
            .start("/tmp/does-not-exist", "/tmp/cfg.yaml")
            .unwrap_err();
        assert!(matches!(err, SupervisorError::ExecutableNotFound(_)));
        assert!(!supervisor.is_running());
        assert!(supervisor.output().contains("Failed to start frpc"));
    }

    #[cfg(unix)]
    #[test]
    fn start_rejects_non_executable_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("frpc");
        fs::write(&path, "not a binary").unwrap();

        let supervisor = ProcessSupervisor::new();
        let err = supervisor
            .start(&path.display().to_string(), "/tmp/cfg.yaml")
            .unwrap_err();
        assert!(matches!(err, SupervisorError::PermissionDenied(_)));
        assert!(!supervisor.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn start_relays_output_in_order_and_flags_exit() {
        let tmp = tempfile::tempdir().unwrap();
        let script = write_script(tmp.path(), "frpc", "echo A\necho B");

        let supervisor = ProcessSupervisor::new();
        let events = supervisor.subscribe();
        supervisor.start(&script, "/tmp/cfg.yaml").unwrap();

        let mut produced = String::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match events.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(SupervisorEvent::Output(chunk)) => produced.push_str(&chunk),
                Ok(SupervisorEvent::StateChanged(false)) => break,
                Ok(SupervisorEvent::StateChanged(true)) => {}
                Err(_) => panic!("timed out waiting for exit"),
            }
        }

        assert_eq!(produced, "A\nB\n");
        assert_eq!(supervisor.output(), "A\nB\n");
        assert!(!supervisor.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn stop_terminates_and_appends_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let script = write_script(tmp.path(), "frpc", "exec sleep 30");

        let supervisor = ProcessSupervisor::new();
        supervisor.start(&script, "/tmp/cfg.yaml").unwrap();
        assert!(supervisor.is_running());

        supervisor.stop();
        assert!(!supervisor.is_running());
        assert!(supervisor.output().ends_with(&format!("{STOPPED_MARKER}\n")));
    }

    #[cfg(unix)]
    #[test]
    fn output_arriving_after_stop_is_discarded() {
        let tmp = tempfile::tempdir().unwrap();
        // The background subshell inherits the pipe and outlives the stop.
        let script = write_script(
            tmp.path(),
            "frpc",
            "( sleep 2; echo LATE ) &\nexec sleep 30",
        );

        let supervisor = ProcessSupervisor::new();
        let events = supervisor.subscribe();
        supervisor.start(&script, "/tmp/cfg.yaml").unwrap();
        supervisor.stop();

        // Give the straggler time to write into the inherited pipe.
        thread::sleep(Duration::from_secs(3));
        assert!(supervisor.output().ends_with(&format!("{STOPPED_MARKER}\n")));
        assert!(!supervisor.output().contains("LATE"));

        // Subscribers see no Output event after the terminal state change.
        let mut stopped_seen = false;
        while let Ok(event) = events.try_recv() {
            match event {
                SupervisorEvent::StateChanged(false) => stopped_seen = true,
                SupervisorEvent::Output(chunk) => {
                    assert!(!stopped_seen, "output after stop: {chunk:?}");
                }
                SupervisorEvent::StateChanged(true) => {}
            }
        }
        assert!(stopped_seen);
    }

    #[test]
    fn stop_is_idempotent_without_a_child() {
        let supervisor = ProcessSupervisor::new();
        supervisor.stop();
        supervisor.stop();
        assert!(!supervisor.is_running());
        assert_eq!(
            supervisor.output(),
            format!("{STOPPED_MARKER}\n{STOPPED_MARKER}\n")
        );
    }

    #[cfg(unix)]
    #[test]
    fn start_while_running_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let script = write_script(tmp.path(), "frpc", "exec sleep 30");

        let supervisor = ProcessSupervisor::new();
        supervisor.start(&script, "/tmp/cfg.yaml").unwrap();
        assert!(matches!(
            supervisor.start(&script, "/tmp/cfg.yaml"),
            Err(SupervisorError::AlreadyRunning)
        ));
        supervisor.stop();
    }

    #[cfg(unix)]
    #[test]
    fn verify_config_captures_labeled_output() {
        let tmp = tempfile::tempdir().unwrap();
        let script = write_script(tmp.path(), "frpc", "echo \"$@\"");

        let supervisor = ProcessSupervisor::new();
        let output = supervisor
            .verify_config(&script, "/tmp/cfg.yaml")
            .unwrap();
        assert_eq!(output, "verify -c /tmp/cfg.yaml\n");
        assert!(supervisor
            .output()
            .contains("Config verification result:\nverify -c /tmp/cfg.yaml"));
        assert!(!supervisor.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn reload_config_captures_labeled_output() {
        let tmp = tempfile::tempdir().unwrap();
        let script = write_script(tmp.path(), "frpc", "echo \"$@\"");

        let supervisor = ProcessSupervisor::new();
        let output = supervisor
            .reload_config(&script, "/tmp/cfg.yaml")
            .unwrap();
        assert_eq!(output, "reload -c /tmp/cfg.yaml\n");
        assert!(supervisor.output().contains("Config reload result:"));
    }

    #[cfg(unix)]
    #[test]
    fn one_shot_merges_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let script = write_script(tmp.path(), "frpc", "echo out\necho err >&2\nexit 3");

        let supervisor = ProcessSupervisor::new();
        // Non-zero exit is reported as plain text, not as an error.
        let output = supervisor.verify_config(&script, "/tmp/cfg.yaml").unwrap();
        assert!(output.contains("out"));
        assert!(output.contains("err"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn async_one_shot_runs_off_thread() {
        let tmp = tempfile::tempdir().unwrap();
        let script = write_script(tmp.path(), "frpc", "echo \"$@\"");

        let supervisor = ProcessSupervisor::new();
        let output = supervisor
            .verify_config_async(&script, "/tmp/cfg.yaml")
            .await
            .unwrap();
        assert_eq!(output, "verify -c /tmp/cfg.yaml\n");
    }

    #[test]
    fn clear_output_empties_both_buffers() {
        let supervisor = ProcessSupervisor::new();
        supervisor.stop(); // appends the marker
        supervisor.clear_output();
        assert_eq!(supervisor.output(), "");
        assert_eq!(supervisor.cleaned_output(), "");
    }

    #[cfg(unix)]
    #[test]
    fn natural_exit_flips_running_flag() {
        let tmp = tempfile::tempdir().unwrap();
        let script = write_script(tmp.path(), "frpc", "exit 0");

        let supervisor = ProcessSupervisor::new();
        supervisor.start(&script, "/tmp/cfg.yaml").unwrap();
        assert!(wait_until(Duration::from_secs(5), || !supervisor.is_running()));
    }

    #[test]
    fn executable_name_falls_back_to_frpc() {
        assert_eq!(executable_name("/opt/frp/frpc"), "frpc");
        assert_eq!(executable_name("frpc-arm64"), "frpc-arm64");
        assert_eq!(executable_name(""), "frpc");
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let supervisor = ProcessSupervisor::new();
        drop(supervisor.subscribe());
        supervisor.stop(); // triggers a broadcast that prunes the dead sender
        assert_eq!(lock(&supervisor.inner).subscribers.len(), 0);
    }
}
