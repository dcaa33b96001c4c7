//! Chart rendering models

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Input marker telling the renderer to read HTML from stdin
pub const INLINE_INPUT: &str = "-";

/// Raster format every artifact is written in
pub const IMAGE_FORMAT: &str = "png";

/// One chart render, owned by a single command invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRequest {
    pub symbol: String,
    pub description: String,
    /// Widget time-range code, e.g. `|1M`
    pub time_range: String,
    pub technical_analysis: bool,
    /// `INLINE_INPUT` or a remote source marker
    pub input: String,
    /// Output base name, without directory or extension
    pub output: String,
    pub dir: PathBuf,
    /// Markup piped to the renderer; `None` lets it fetch the source itself
    pub html: Option<String>,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub delay: u32,
    pub overwrite: bool,
    pub dark_mode: bool,
}

impl RenderRequest {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.output, self.format)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join(self.file_name())
    }
}

/// The image file a successful render leaves on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

impl RenderedArtifact {
    pub fn from_request(request: &RenderRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            path: request.artifact_path(),
            file_name: request.file_name(),
            created_at,
        }
    }
}
