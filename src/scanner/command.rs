use std::collections::VecDeque;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use crate::errors::BoefjeError;
use tracing::{debug, warn};

/// Number of stderr lines kept for the failure message.
const STDERR_TAIL: usize = 20;

/// A fully resolved scanner invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct ScanExit {
    pub duration_ms: u64,
    pub stdout_lines: usize,
}

impl ScannerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Command line for logs and `inspect`, quoting arguments with whitespace.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| {
                if part.is_empty() || part.chars().any(|c| c.is_whitespace() || c == '\'') {
                    format!("'{}'", part.replace('\'', "'\\''"))
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the scanner to completion. A non-zero exit is an error carrying
    /// the tail of its stderr.
    pub async fn run(&self, timeout: Option<Duration>) -> Result<ScanExit, BoefjeError> {
        debug!(command = %self.display(), "Spawning scanner");
        let started = Instant::now();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BoefjeError::Scanner(format!("Failed to start {}: {}", self.program, e)))?;

        let stdout = child.stdout.take().map(|out| spawn_reader(out, "stdout"));
        let stderr = child.stderr.take().map(|err| spawn_reader(err, "stderr"));

        let status = match timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    if let Err(e) = child.kill().await {
                        warn!(error = %e, "Failed to kill timed out scanner");
                    }
                    return Err(BoefjeError::Scanner(format!(
                        "{} timed out after {}s",
                        self.program,
                        limit.as_secs()
                    )));
                }
            },
            None => child.wait().await,
        }
        .map_err(|e| BoefjeError::Scanner(format!("Failed to wait for {}: {}", self.program, e)))?;

        let stdout_tail = collect(stdout).await;
        let stderr_tail = collect(stderr).await;

        if !status.success() {
            let reason = match status.code() {
                Some(code) => format!("{} exited with code {}", self.program, code),
                None => format!("{} was terminated by a signal", self.program),
            };
            let detail = stderr_tail.lines.iter().cloned().collect::<Vec<_>>().join("\n");
            return Err(BoefjeError::Scanner(if detail.is_empty() {
                reason
            } else {
                format!("{}: {}", reason, detail)
            }));
        }

        Ok(ScanExit {
            duration_ms: started.elapsed().as_millis() as u64,
            stdout_lines: stdout_tail.count,
        })
    }
}

#[derive(Default)]
struct StreamTail {
    lines: VecDeque<String>,
    count: usize,
}

/// Drain a child pipe line by line into the log, keeping the last lines.
fn spawn_reader<R>(reader: R, stream: &'static str) -> JoinHandle<StreamTail>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut tail = StreamTail::default();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf).trim_end().to_string();
                    debug!(stream, "{}", line);
                    tail.count += 1;
                    if tail.lines.len() == STDERR_TAIL {
                        tail.lines.pop_front();
                    }
                    tail.lines.push_back(line);
                }
                Err(e) => {
                    warn!(stream, error = %e, "Failed to read scanner output");
                    break;
                }
            }
        }
        tail
    })
}

async fn collect(handle: Option<JoinHandle<StreamTail>>) -> StreamTail {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => StreamTail::default(),
    }
}
