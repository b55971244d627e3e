use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use std::process::Command;
use thiserror::Error;

/// Format requested from `list-sessions`: attached flag, creation time, name
const LIST_FORMAT: &str = "#{session_attached} #{session_created} #{session_name}";

/// Older tmux reports a missing server as a failed socket connect.
/// Only matches when that is the whole of stderr, bar a final newline.
static RE_NO_SOCKET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^error connecting to .+ \(No such file or directory\)\n?$").unwrap()
});

#[derive(Debug, Error)]
pub enum ListError {
    #[error("tmux command failed: {0}")]
    CommandFailed(String),
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs external commands. Enables mock injection for testing.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<RawOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<RawOutput> {
        (**self).run(program, args)
    }
}

/// Real runner backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<RawOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(RawOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// How a `list-sessions` invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// Listing text, possibly empty
    Sessions(String),
    /// No server is running, so there is nothing to list
    NoServer,
    /// Anything else
    Failed(String),
}

/// Classify a finished (or unstartable) `list-sessions` run.
///
/// tmux signals "no sessions" with a non-zero exit in two different ways
/// depending on version, both are normalized to [`ListOutcome::NoServer`].
pub fn classify(result: io::Result<RawOutput>) -> ListOutcome {
    let output = match result {
        Ok(output) => output,
        Err(e) => return ListOutcome::Failed(format!("failed to run tmux: {}", e)),
    };

    if output.success {
        return ListOutcome::Sessions(output.stdout);
    }
    if output.stderr.contains("no server running") {
        return ListOutcome::NoServer;
    }
    if RE_NO_SOCKET.is_match(&output.stderr) {
        return ListOutcome::NoServer;
    }

    tracing::debug!(code = ?output.code, "tmux list-sessions exited with failure");
    ListOutcome::Failed(output.stderr.trim().to_string())
}

/// Client for interacting with tmux via CLI
pub struct TmuxClient<R = SystemRunner> {
    /// Path to tmux binary
    tmux_path: String,
    runner: R,
}

impl TmuxClient {
    pub fn new() -> Self {
        Self::with_runner(SystemRunner)
    }
}

impl Default for TmuxClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> TmuxClient<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            tmux_path: "tmux".to_string(),
            runner,
        }
    }

    /// List all tmux sessions as raw `list-sessions` output
    pub fn list_sessions(&self) -> Result<String, ListError> {
        let result = self
            .runner
            .run(&self.tmux_path, &["list-sessions", "-F", LIST_FORMAT]);

        match classify(result) {
            ListOutcome::Sessions(text) => Ok(text),
            ListOutcome::NoServer => {
                tracing::debug!("tmux server not running, no sessions");
                Ok(String::new())
            }
            ListOutcome::Failed(detail) => {
                tracing::warn!(%detail, "tmux list-sessions failed");
                Err(ListError::CommandFailed(detail))
            }
        }
    }
}

/// Reattach command template for the given terminal, with `%s` for the session
pub fn attach_template(terminal: &str) -> String {
    format!("{} -e tmux attach -d -t %s", terminal)
}
