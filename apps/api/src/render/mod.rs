//! PDF rendering — runs an external LaTeX compiler over the compiled resume source.
//!
//! Each job owns a fresh temporary directory and a child process. Both are released
//! on every exit path: the `TempDir` is removed on drop, and the child is spawned with
//! `kill_on_drop` so a timeout or a cancelled request future kills it.
//!
//! `AppState` holds an `Arc<dyn Renderer>` so tests can swap in a stub.

pub mod handlers;

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SOURCE_FILE: &str = "resume.tex";
const OUTPUT_FILE: &str = "resume.pdf";
const LOG_FILE: &str = "resume.log";
/// Lines of the compiler log kept in `RenderError::Failed` for diagnostics.
const LOG_TAIL_LINES: usize = 20;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to start renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Renderer I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Renderer exited with {status}: {log_tail}")]
    Failed { status: String, log_tail: String },

    #[error("Renderer timed out after {0:?}")]
    Timeout(Duration),

    #[error("Renderer produced no PDF")]
    MissingOutput,
}

/// Compiles markup source into PDF bytes. Implementations must not interpret or
/// repair compiler failures; they report them as `RenderError`.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, source: &str) -> Result<Bytes, RenderError>;
}

/// Renders through a LaTeX engine (`pdflatex` by default) in an isolated temp dir.
#[derive(Debug, Clone)]
pub struct LatexRenderer {
    program: String,
    timeout: Duration,
}

impl LatexRenderer {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn command(&self, workdir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg("-no-shell-escape")
            .arg(format!("-output-directory={}", workdir.display()))
            .arg(SOURCE_FILE)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Renderer for LatexRenderer {
    async fn render(&self, source: &str) -> Result<Bytes, RenderError> {
        let job_id = Uuid::new_v4();
        let workdir = tempfile::Builder::new()
            .prefix("resume-render-")
            .tempdir()?;
        let path = workdir.path().to_path_buf();

        tokio::fs::write(path.join(SOURCE_FILE), source).await?;
        debug!("Render job {job_id}: wrote {} bytes to {}", source.len(), path.display());

        let child = self.command(&path).spawn().map_err(|e| RenderError::Spawn {
            program: self.program.clone(),
            source: e,
        })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Render job {job_id}: timed out after {:?}", self.timeout);
                return Err(RenderError::Timeout(self.timeout));
            }
        };

        if !output.status.success() {
            let log = tokio::fs::read_to_string(path.join(LOG_FILE))
                .await
                .unwrap_or_else(|_| String::from_utf8_lossy(&output.stdout).into_owned());
            warn!("Render job {job_id}: renderer exited with {}", output.status);
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                log_tail: log_tail(&log, LOG_TAIL_LINES),
            });
        }

        let pdf = match tokio::fs::read(path.join(OUTPUT_FILE)).await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => return Err(RenderError::MissingOutput),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::MissingOutput)
            }
            Err(e) => return Err(RenderError::Io(e)),
        };

        info!("Render job {job_id}: produced {} byte PDF", pdf.len());
        Ok(Bytes::from(pdf))
    }
}

/// The last `lines` lines of `log`, joined with newlines.
fn log_tail(log: &str, lines: usize) -> String {
    let all: Vec<&str> = log.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
