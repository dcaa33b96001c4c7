//! Data models for chart commands and services
//!
//! `chart` holds the render pipeline's request/artifact types,
//! `command` holds what the chat layer hands to the pipeline.

pub mod chart;
pub mod command;

pub use chart::{RenderRequest, RenderedArtifact, IMAGE_FORMAT, INLINE_INPUT};
pub use command::{ChartCommand, MessageHandle, Photo};
