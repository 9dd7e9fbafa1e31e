//! Child process execution with an optional timeout.
//!
//! Interpreters are run directly (no shell). Both pipes are drained on
//! reader threads so a chatty child cannot deadlock on a full pipe while the
//! caller waits for it.

use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{RagEnvError, Result};

/// How often a child with a deadline is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of running a child process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal or by the timeout).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Wall-clock duration.
    pub duration: Duration,

    /// Whether the child was killed for exceeding its timeout.
    pub timed_out: bool,
}

impl CommandOutput {
    /// Whether the child exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Options for running a child process.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables set on top of the inherited environment.
    pub env: HashMap<String, OsString>,

    /// Kill the child after this long (None = wait indefinitely).
    pub timeout: Option<Duration>,
}

/// Run `program` with `args`, capturing both output streams.
///
/// Failing to start the program at all is an error; a non-zero exit status
/// or a timeout is reported through [`CommandOutput`].
pub fn run(program: &Path, args: &[&str], options: &CommandOptions) -> Result<CommandOutput> {
    let start = Instant::now();
    let spawn_error = |e: std::io::Error| RagEnvError::InterpreterFailed {
        interpreter: program.to_path_buf(),
        message: e.to_string(),
    };

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::trace!("Running {} {:?}", program.display(), args);
    let mut child = cmd.spawn().map_err(spawn_error)?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_handle = thread::spawn(move || drain(stdout));
    let stderr_handle = thread::spawn(move || drain(stderr));

    let status = match options.timeout {
        None => Some(child.wait().map_err(spawn_error)?),
        Some(limit) => loop {
            if let Some(status) = child.try_wait().map_err(spawn_error)? {
                break Some(status);
            }
            if start.elapsed() >= limit {
                tracing::debug!(
                    "{} exceeded {:?}, killing",
                    program.display(),
                    limit
                );
                // The child may have exited between try_wait and kill.
                let _ = child.kill();
                let _ = child.wait();
                break None;
            }
            thread::sleep(POLL_INTERVAL);
        },
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();
    let duration = start.elapsed();

    Ok(CommandOutput {
        exit_code: status.and_then(|s| s.code()),
        stdout,
        stderr,
        duration,
        timed_out: status.is_none(),
    })
}

fn drain<R: Read>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Write an executable shell script into `dir`.
    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn run_captures_stdout_and_exit_code() {
        let temp = TempDir::new().unwrap();
        let prog = script(temp.path(), "ok", "echo hello");

        let out = run(&prog, &[], &CommandOptions::default()).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
        assert!(!out.timed_out);
    }

    #[test]
    fn run_reports_non_zero_exit() {
        let temp = TempDir::new().unwrap();
        let prog = script(temp.path(), "fail", "echo oops >&2; exit 3");

        let out = run(&prog, &[], &CommandOptions::default()).unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, Some(3));
        assert!(out.stderr.contains("oops"));
    }

    #[test]
    fn run_passes_arguments() {
        let temp = TempDir::new().unwrap();
        let prog = script(temp.path(), "args", "echo \"$1-$2\"");

        let out = run(&prog, &["a", "b"], &CommandOptions::default()).unwrap();
        assert_eq!(out.stdout.trim(), "a-b");
    }

    #[test]
    fn run_sets_extra_env() {
        let temp = TempDir::new().unwrap();
        let prog = script(temp.path(), "env", "echo \"$RAGENV_TEST_VAR\"");
        let mut options = CommandOptions::default();
        options
            .env
            .insert("RAGENV_TEST_VAR".to_string(), OsString::from("my_value"));

        let out = run(&prog, &[], &options).unwrap();
        assert_eq!(out.stdout.trim(), "my_value");
    }

    #[test]
    fn run_kills_child_after_timeout() {
        let temp = TempDir::new().unwrap();
        let prog = script(temp.path(), "slow", "exec sleep 5");
        let options = CommandOptions {
            timeout: Some(Duration::from_millis(100)),
            ..Default::default()
        };

        let out = run(&prog, &[], &options).unwrap();
        assert!(out.timed_out);
        assert!(!out.success());
        assert!(out.duration < Duration::from_secs(5));
    }

    #[test]
    fn fast_child_finishes_before_timeout() {
        let temp = TempDir::new().unwrap();
        let prog = script(temp.path(), "fast", "echo done");
        let options = CommandOptions {
            timeout: Some(Duration::from_secs(10)),
            ..Default::default()
        };

        let out = run(&prog, &[], &options).unwrap();
        assert!(!out.timed_out);
        assert!(out.success());
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = run(
            Path::new("/nonexistent/bin/python3"),
            &[],
            &CommandOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RagEnvError::InterpreterFailed { .. }));
    }
}
