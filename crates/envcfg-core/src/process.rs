//! Blocking subprocess execution with a timeout
//!
//! Output pipes are drained on helper threads while the caller polls the
//! child, so a chatty tool cannot stall on a full pipe and a hung tool is
//! killed once its deadline passes.

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::evaluator::EvaluationError;

/// Interval between liveness checks while waiting on a child
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the child was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external programs
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner {
    timeout: Option<Duration>,
}

impl CommandRunner {
    /// A runner that waits at most `timeout` for each command.
    ///
    /// `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Run `argv`, optionally feeding `stdin`, and capture its output.
    ///
    /// A non-zero exit is not an error here; see [`CommandRunner::run_checked`].
    pub fn run(&self, argv: &[String], stdin: Option<&str>) -> Result<CommandOutput, EvaluationError> {
        let (program, args) = argv.split_first().ok_or_else(|| EvaluationError::InvalidOutput {
            program: String::new(),
            message: "empty command line".to_string(),
        })?;

        debug!(program = %program, ?args, "Running command");

        let mut child = Command::new(program)
            .args(args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EvaluationError::Spawn {
                program: program.clone(),
                source,
            })?;

        let writer = match (stdin, child.stdin.take()) {
            (Some(input), Some(mut pipe)) => {
                let input = input.to_owned();
                Some(thread::spawn(move || pipe.write_all(input.as_bytes())))
            }
            _ => None,
        };
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = self.wait(&mut child, program)?;

        if let Some(writer) = writer {
            // A tool may exit without consuming all of stdin
            if let Ok(Err(e)) = writer.join() {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    warn!(program = %program, error = %e, "Failed to write command input");
                }
            }
        }

        let output = CommandOutput {
            code: status.code(),
            stdout: collect(stdout, program)?,
            stderr: collect(stderr, program)?,
        };
        debug!(program = %program, code = ?output.code, "Command finished");
        Ok(output)
    }

    /// Run `argv` and return its stdout, failing on a non-zero exit.
    pub fn run_checked(&self, argv: &[String], stdin: Option<&str>) -> Result<String, EvaluationError> {
        let output = self.run(argv, stdin)?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(EvaluationError::CommandFailed {
                program: argv[0].clone(),
                code: output.code.unwrap_or(-1),
                stderr: output.stderr.trim_end().to_string(),
            })
        }
    }

    fn wait(&self, child: &mut Child, program: &str) -> Result<ExitStatus, EvaluationError> {
        let io_error = |source| EvaluationError::Io {
            program: program.to_string(),
            source,
        };

        let Some(timeout) = self.timeout else {
            return child.wait().map_err(io_error);
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait().map_err(io_error)? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                warn!(program = %program, ?timeout, "Command timed out, killing it");
                let _ = child.kill();
                let _ = child.wait();
                return Err(EvaluationError::Timeout {
                    program: program.to_string(),
                    timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(handle: Option<JoinHandle<io::Result<Vec<u8>>>>, program: &str) -> Result<String, EvaluationError> {
    let Some(handle) = handle else {
        return Ok(String::new());
    };
    let bytes = handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("output reader panicked")))
        .map_err(|source| EvaluationError::Io {
            program: program.to_string(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
