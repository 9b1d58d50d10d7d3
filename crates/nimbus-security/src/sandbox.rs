//! Allow-listed diagnostic command execution.
//!
//! Commands are tokenized on whitespace and spawned directly (never through
//! a shell) with a scrubbed environment, a wall-clock limit, and a cap on
//! captured output. Both the program and every argument token must appear
//! in the policy's allow-list. The outcome is always a [`DiagnosticReport`]; a non-zero
//! exit status is data, not an error.

use std::collections::{HashMap, HashSet};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use nimbus_shared::config::DiagnosticsSettings;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{info, warn};

const SANDBOX_PATH: &str = "/usr/local/bin:/usr/bin:/bin";
const READER_GRACE: Duration = Duration::from_millis(200);
const DISALLOWED_CHARS: &[char] = &[';', '|', '&', '`', '$', '>', '<', '(', ')', '\\', '"', '\''];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SandboxError {
    #[error("empty command")]
    Empty,
    #[error("program '{0}' is not allowed")]
    ProgramNotAllowed(String),
    #[error("argument '{arg}' is not allowed for {program}")]
    ArgumentNotAllowed { program: String, arg: String },
    #[error("too many arguments: {count} > {max}")]
    TooManyArguments { count: usize, max: usize },
    #[error("unsafe argument: {0}")]
    UnsafeArgument(String),
    #[error("failed to spawn command: {0}")]
    Spawn(String),
    #[error("failed to wait for command: {0}")]
    Wait(String),
}

#[derive(Debug, Clone)]
pub struct CommandPolicy {
    /// Program name to the exact argument tokens it accepts.
    pub allowed: HashMap<String, HashSet<String>>,
    pub max_args: usize,
    pub timeout: Duration,
    pub max_output_bytes: usize,
}

impl From<&DiagnosticsSettings> for CommandPolicy {
    fn from(settings: &DiagnosticsSettings) -> Self {
        Self {
            allowed: settings
                .allowed_programs
                .iter()
                .map(|program| {
                    let args = settings
                        .allowed_args
                        .get(program)
                        .map(|args| args.iter().cloned().collect())
                        .unwrap_or_default();
                    (program.clone(), args)
                })
                .collect(),
            max_args: settings.max_args,
            timeout: Duration::from_millis(settings.timeout_ms),
            max_output_bytes: settings.max_output_bytes,
        }
    }
}

impl Default for CommandPolicy {
    fn default() -> Self {
        Self::from(&DiagnosticsSettings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Checks command text against a [`CommandPolicy`] before anything runs.
#[derive(Debug, Clone)]
pub struct CommandValidator {
    policy: CommandPolicy,
}

impl CommandValidator {
    pub fn new(policy: CommandPolicy) -> Self {
        Self { policy }
    }

    pub fn validate(&self, text: &str) -> Result<ParsedCommand, SandboxError> {
        let mut parts = text.split_whitespace();
        let program = parts.next().ok_or(SandboxError::Empty)?.to_string();
        let args: Vec<String> = parts.map(str::to_string).collect();

        // Bare names only, resolved against the sandbox PATH.
        let permitted_args = match self.policy.allowed.get(&program) {
            Some(permitted) if !program.contains('/') => permitted,
            _ => return Err(SandboxError::ProgramNotAllowed(program)),
        };

        if args.len() > self.policy.max_args {
            return Err(SandboxError::TooManyArguments {
                count: args.len(),
                max: self.policy.max_args,
            });
        }

        for arg in &args {
            if arg.chars().any(|c| DISALLOWED_CHARS.contains(&c) || c.is_control()) {
                return Err(SandboxError::UnsafeArgument(arg.clone()));
            }
            if arg.contains("..") {
                return Err(SandboxError::UnsafeArgument(arg.clone()));
            }
            if !permitted_args.contains(arg) {
                return Err(SandboxError::ArgumentNotAllowed {
                    program: program.clone(),
                    arg: arg.clone(),
                });
            }
        }

        Ok(ParsedCommand { program, args })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub program: String,
    pub args: Vec<String>,
    /// `None` when the process was killed or ended by a signal.
    pub exit_code: Option<i32>,
    /// Interleaved stdout and stderr, trimmed.
    pub output: String,
    pub truncated: bool,
    pub timed_out: bool,
    pub duration_ms: u64,
}

impl DiagnosticReport {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }
}

#[derive(Default)]
struct Capture {
    bytes: Vec<u8>,
    truncated: bool,
}

impl Capture {
    fn push(&mut self, chunk: &[u8], limit: usize) {
        let remaining = limit.saturating_sub(self.bytes.len());
        if chunk.len() > remaining {
            self.truncated = true;
        }
        self.bytes.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
    }
}

/// Reads until EOF; bytes past the limit are drained and dropped so the
/// child never blocks on a full pipe.
async fn pump<R>(mut reader: R, sink: Arc<Mutex<Capture>>, limit: usize)
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; 4096];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => sink.lock().await.push(&chunk[..n], limit),
        }
    }
}

pub struct SandboxedExecutor {
    policy: CommandPolicy,
    validator: CommandValidator,
}

impl SandboxedExecutor {
    pub fn new(policy: CommandPolicy) -> Self {
        Self {
            validator: CommandValidator::new(policy.clone()),
            policy,
        }
    }

    pub async fn run(&self, text: &str) -> Result<DiagnosticReport, SandboxError> {
        let parsed = self.validator.validate(text)?;
        info!("Running diagnostic command: {}", parsed.program);
        let start = Instant::now();

        let mut child = Command::new(&parsed.program)
            .args(&parsed.args)
            .env_clear()
            .env("PATH", SANDBOX_PATH)
            .env("LC_ALL", "C")
            .current_dir(std::env::temp_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SandboxError::Spawn(e.to_string()))?;

        let capture = Arc::new(Mutex::new(Capture::default()));
        let limit = self.policy.max_output_bytes;
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(pump(stdout, capture.clone(), limit)));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(pump(stderr, capture.clone(), limit)));
        }

        let (exit_code, timed_out) = match timeout(self.policy.timeout, child.wait()).await {
            Ok(Ok(status)) => (status.code(), false),
            Ok(Err(e)) => return Err(SandboxError::Wait(e.to_string())),
            Err(_) => {
                warn!(
                    "Diagnostic command {} exceeded {:?}, killing",
                    parsed.program, self.policy.timeout
                );
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill diagnostic command: {}", e);
                }
                (None, true)
            }
        };

        for mut reader in readers {
            if timeout(READER_GRACE, &mut reader).await.is_err() {
                reader.abort();
            }
        }

        let capture = capture.lock().await;
        let report = DiagnosticReport {
            program: parsed.program,
            args: parsed.args,
            exit_code,
            output: String::from_utf8_lossy(&capture.bytes).trim().to_string(),
            truncated: capture.truncated,
            timed_out,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Diagnostic command {} finished (exit: {:?}, timed_out: {})",
            report.program, report.exit_code, report.timed_out
        );
        Ok(report)
    }
}
