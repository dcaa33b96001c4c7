use thiserror::Error;

/// A required render request field was left empty
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Must provide symbol")]
    MissingSymbol,
    #[error("Must provide description")]
    MissingDescription,
    #[error("Must provide input")]
    MissingInput,
    #[error("Must provide output")]
    MissingOutput,
}

/// No default renderer location is known for the host OS
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported platform for capture-website: {os}")]
pub struct UnsupportedPlatformError {
    pub os: String,
}

/// The renderer process could not be started or exited unsuccessfully
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to start renderer {program}: {reason}")]
    Spawn { program: String, reason: String },
    #[error("Renderer I/O failed: {0}")]
    Io(String),
    #[error("Renderer exited with {status}: {output}")]
    Failed { status: String, output: String },
}

/// Anything that can stop the render pipeline
#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatformError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Render task aborted: {0}")]
    Aborted(String),
}

/// Chat transport failures (send/delete)
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Failed to send message: {0}")]
    Send(String),
    #[error("Failed to attach {path}: {reason}")]
    Attachment { path: String, reason: String },
    #[error("Failed to delete message {id}: {reason}")]
    Delete { id: u64, reason: String },
}

/// Startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
