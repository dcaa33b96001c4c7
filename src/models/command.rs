//! Chat command models

use std::path::PathBuf;

/// Transport-level id of a chat message
pub type MessageHandle = u64;

/// A parsed `$chart` / `$ta` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartCommand {
    /// `None` when the user left the ticker out
    pub symbol: Option<String>,
    /// Widget time-range code, e.g. `|1M`
    pub time_range: String,
    pub technical_analysis: bool,
    pub delete_source: bool,
    pub unix_time: i64,
    pub message_id: MessageHandle,
    pub username: String,
}

/// An image reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}
