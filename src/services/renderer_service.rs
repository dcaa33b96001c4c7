//! capture-website invocation

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::models::RenderRequest;
use crate::services::{argument_service, validation_service};
use crate::utils::{ChartError, RenderError, UnsupportedPlatformError};

lazy_static! {
    /// Where capture-website is installed by default, keyed by `std::env::consts::OS`
    static ref DEFAULT_BINARY_PATHS: HashMap<&'static str, &'static str> = HashMap::from([
        ("linux", "/usr/bin/capture-website"),
        ("macos", "/usr/local/bin/capture-website"),
    ]);
}

/// Resolve the renderer executable once at startup.
///
/// An explicitly configured path always wins; otherwise the host OS must be in
/// the default table.
pub fn resolve_binary_path(
    configured: Option<PathBuf>,
    os: &str,
) -> Result<PathBuf, UnsupportedPlatformError> {
    if let Some(path) = configured {
        return Ok(path);
    }

    DEFAULT_BINARY_PATHS
        .get(os)
        .map(|path| PathBuf::from(*path))
        .ok_or_else(|| UnsupportedPlatformError { os: os.to_string() })
}

/// Runs an external program to completion
pub trait ProcessRunner: Send + Sync {
    /// Returns combined stdout/stderr. `stdin` is piped in when present,
    /// otherwise the child gets no input at all.
    fn run(&self, program: &Path, args: &[String], stdin: Option<&[u8]>) -> Result<Vec<u8>, RenderError>;
}

/// `std::process` backed runner
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, program: &Path, args: &[String], stdin: Option<&[u8]>) -> Result<Vec<u8>, RenderError> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|e| RenderError::Spawn {
            program: program.display().to_string(),
            reason: e.to_string(),
        })?;

        // stdin is written on its own thread while stdout/stderr are drained
        let writer = match (stdin, child.stdin.take()) {
            (Some(bytes), Some(mut pipe)) => {
                let bytes = bytes.to_vec();
                Some(std::thread::spawn(move || pipe.write_all(&bytes)))
            }
            _ => None,
        };

        let output = child
            .wait_with_output()
            .map_err(|e| RenderError::Io(e.to_string()))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Failed to write markup to renderer stdin: {}", e),
                Err(_) => tracing::warn!("Renderer stdin writer panicked"),
            }
        }

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                output: String::from_utf8_lossy(&combined).trim().to_string(),
            });
        }

        Ok(combined)
    }
}

/// Validates, builds arguments and runs capture-website for a request
pub struct ChartRenderer {
    binary_path: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl ChartRenderer {
    pub fn new(binary_path: PathBuf, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { binary_path, runner }
    }

    /// Resolve the executable for `os` and build a renderer around it
    pub fn for_platform(
        configured: Option<PathBuf>,
        os: &str,
        runner: Arc<dyn ProcessRunner>,
    ) -> Result<Self, UnsupportedPlatformError> {
        let binary_path = resolve_binary_path(configured, os)?;
        Ok(Self::new(binary_path, runner))
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Blocks until the renderer exits. On success the image is expected at
    /// the returned path; it is not checked.
    pub fn render(&self, request: &mut RenderRequest) -> Result<PathBuf, ChartError> {
        validation_service::validate_request(request)?;
        let args = argument_service::build_arguments(request)?;

        let stdin = request.html.as_deref().map(str::as_bytes);
        let output = self.runner.run(&self.binary_path, &args, stdin)?;

        if !output.is_empty() {
            tracing::debug!("capture-website output: {}", String::from_utf8_lossy(&output).trim());
        }

        Ok(request.artifact_path())
    }
}
