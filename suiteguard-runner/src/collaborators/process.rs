//! Child process execution for command-backed collaborators.
//!
//! Commands are argv arrays run without a shell. Each run is bounded by a
//! timeout; the child is killed if the timeout fires or the future is
//! dropped.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("command is empty")]
    Empty,

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write stdin of {program}: {source}")]
    Stdin {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} timed out after {timeout:?}")]
    TimedOut { program: String, timeout: Duration },
}

/// Runs argv commands with a fixed environment and timeout.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    envs: Vec<(String, String)>,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            envs: Vec::new(),
            timeout,
        }
    }

    /// Add an environment variable passed to every command.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Set `KUBECONFIG` for every command, if a path is given.
    pub fn kubeconfig(self, path: Option<&Path>) -> Self {
        match path {
            Some(path) => self.env("KUBECONFIG", path.display().to_string()),
            None => self,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `argv` and return its stdout.
    ///
    /// # Errors
    ///
    /// Fails on an empty argv, spawn failure, non-zero exit (stderr is
    /// included in the error), or timeout.
    pub async fn run(&self, argv: &[String]) -> Result<String, CommandError> {
        self.run_with_input(argv, None).await
    }

    /// Run `argv` with `input` written to its stdin.
    pub async fn run_with_input(
        &self,
        argv: &[String],
        input: Option<&[u8]>,
    ) -> Result<String, CommandError> {
        let (program, args) = argv.split_first().ok_or(CommandError::Empty)?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(program = %program, args = ?args, "running command");

        let mut child = cmd.spawn().map_err(|source| CommandError::Spawn {
            program: program.clone(),
            source,
        })?;

        // stdin is fed while stdout/stderr drain, so a child that writes
        // before it finishes reading cannot block on a full pipe
        let stdin = input.zip(child.stdin.take());
        let feed = async move {
            if let Some((input, mut stdin)) = stdin {
                match stdin.write_all(input).await {
                    Ok(()) => {}
                    // exited without reading everything; the exit status decides
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                    Err(source) => {
                        return Err(CommandError::Stdin {
                            program: program.clone(),
                            source,
                        });
                    }
                }
                // dropping stdin closes the pipe
            }
            Ok(())
        };
        let collect = async move {
            child
                .wait_with_output()
                .await
                .map_err(|source| CommandError::Wait {
                    program: program.clone(),
                    source,
                })
        };
        let wait = async { tokio::try_join!(feed, collect).map(|((), output)| output) };

        let output = tokio::time::timeout(self.timeout, wait)
            .await
            .map_err(|_| CommandError::TimedOut {
                program: program.clone(),
                timeout: self.timeout,
            })??;

        if !output.status.success() {
            return Err(CommandError::Failed {
                program: program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
