//! Formatter backed by an external program
//!
//! The program reads source on stdin and writes the formatted result to stdout
//! (`rubyfmt` behaves this way). A non-zero exit status is a failure whose
//! message is whatever the program wrote to stderr. A program that outlives
//! its deadline is killed and reported as a failure.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::{FormatError, FormatOutcome, Formatter};

/// How long an external engine may run before it is killed
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Clone)]
pub struct CommandFormatter {
    name: String,
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandFormatter {
    pub fn new(program: PathBuf, args: Vec<String>) -> Self {
        let name = program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.display().to_string());
        Self {
            name,
            program,
            args,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Formatter for CommandFormatter {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self, source: &str) -> FormatOutcome {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                FormatError::new(format!(
                    "Failed to start {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        // Every pipe gets its own thread so neither side can stall on a full
        // buffer while we wait on the deadline.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = source.to_owned();
            thread::spawn(move || stdin.write_all(input.as_bytes()))
        });
        let stdout = child.stdout.take().map(drain_pipe);
        let stderr = child.stderr.take().map(drain_pipe);

        let status = match wait_with_deadline(&mut child, self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                if let Err(e) = child.kill() {
                    tracing::warn!("Failed to kill {}: {}", self.name, e);
                }
                if let Err(e) = child.wait() {
                    tracing::debug!("Failed to reap {}: {}", self.name, e);
                }
                // Reader threads are left to finish on their own; a grandchild
                // may still hold the pipes open.
                tracing::warn!("{} killed after {:?}", self.name, self.timeout);
                return Err(FormatError::new(format!(
                    "Formatter timed out after {} ms",
                    self.timeout.as_millis()
                )));
            }
            Err(e) => {
                return Err(FormatError::new(format!(
                    "Failed to wait for {}: {}",
                    self.name, e
                )))
            }
        };

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // The program may exit before reading all input; its status decides.
                Ok(Err(e)) => tracing::debug!("Writing to {} failed: {}", self.name, e),
                Err(_) => tracing::warn!("stdin writer for {} panicked", self.name),
            }
        }
        let stdout = collect(stdout, &self.name);
        let stderr = collect(stderr, &self.name);

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            tracing::debug!("{} exited with {}", self.name, status);
            return Err(if stderr.trim().is_empty() {
                FormatError::unexplained()
            } else {
                FormatError::new(stderr.trim())
            });
        }

        String::from_utf8(stdout)
            .map_err(|_| FormatError::new(format!("{} produced non UTF-8 output", self.name)))
    }
}

/// Read a pipe to its end on a background thread
fn drain_pipe(mut pipe: impl Read + Send + 'static) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            tracing::debug!("Reading formatter pipe failed: {}", e);
        }
        buf
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>, name: &str) -> Vec<u8> {
    match reader.map(JoinHandle::join) {
        Some(Ok(bytes)) => bytes,
        Some(Err(_)) => {
            tracing::warn!("pipe reader for {} panicked", name);
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Wait for `child` to exit; `None` once `timeout` has passed
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(WAIT_POLL_INTERVAL.min(deadline - now));
    }
}
