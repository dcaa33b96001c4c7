pub mod errors;

pub use errors::{
    ChartError, ChatError, ConfigError, RenderError, UnsupportedPlatformError, ValidationError,
};
