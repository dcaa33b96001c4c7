use std::sync::Arc;

use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::chat::DiscordChannel;
use crate::models::ChartCommand;
use crate::services::chart_service::ChartOutcome;

pub const DEFAULT_RANGE: &str = "1M";
/// Joins symbol and range in the overview widget (`AAPL|1M`)
pub const RANGE_SEPARATOR: char = '|';
/// Trailing token asking the bot to remove the command message
pub const DELETE_FLAG: &str = "del";

/// TradingView tickers: `NASDAQ:AAPL`, `BRK.B`, `ES1!`, `BTC-USD`, `EUR_USD`
fn is_valid_ticker(ticker: &str) -> bool {
    !ticker.is_empty()
        && ticker
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, ':' | '.' | '_' | '!' | '-'))
}

/// Ticker, widget time-range code and delete flag pulled from command args
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArgs {
    pub symbol: Option<String>,
    pub time_range: String,
    pub delete_source: bool,
}

pub fn parse_chart_args(args: &[&str]) -> ChartArgs {
    let delete_source = args.iter().any(|a| a.eq_ignore_ascii_case(DELETE_FLAG));
    let mut positional = args.iter().filter(|a| !a.eq_ignore_ascii_case(DELETE_FLAG));

    // anything outside the ticker charset is answered with the usage prompt
    let symbol = positional
        .next()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| is_valid_ticker(s));
    let range = positional
        .next()
        .map(|r| r.trim().trim_start_matches(RANGE_SEPARATOR))
        .filter(|r| !r.is_empty() && r.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(DEFAULT_RANGE);

    ChartArgs {
        symbol,
        time_range: format!("{}{}", RANGE_SEPARATOR, range),
        delete_source,
    }
}

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str], technical_analysis: bool) -> Result<(), String> {
    tracing::info!("📈 Chart command from user {} with args: {:?}", msg.author.id, args);

    let service = {
        let data = ctx.data.read().await;
        data.get::<crate::ChartServiceKey>()
            .ok_or("Chart service not initialized".to_string())?
            .clone()
    };

    let parsed = parse_chart_args(args);
    let command = ChartCommand {
        symbol: parsed.symbol,
        time_range: parsed.time_range,
        technical_analysis,
        delete_source: parsed.delete_source,
        unix_time: msg.timestamp.unix_timestamp(),
        message_id: msg.id.get(),
        username: msg.author.name.clone(),
    };

    if command.symbol.is_some() {
        if let Err(e) = msg.channel_id.broadcast_typing(ctx.http.as_ref()).await {
            tracing::warn!("Failed to broadcast typing: {}", e);
        }
    }

    let chat = Arc::new(DiscordChannel::for_message(ctx, msg));
    match service.handle_command(chat, command).await {
        ChartOutcome::UsagePrompt { cleanup } => tracing::debug!(
            "Chart command answered with usage prompt (cleanup pending: {})",
            !cleanup.is_finished()
        ),
        ChartOutcome::Rendered { artifact, error: Some(e), .. } => {
            tracing::warn!("Chart {} delivered best-effort after error: {}", artifact.file_name, e)
        }
        ChartOutcome::Rendered { artifact, error: None, cleanup } => tracing::debug!(
            "Chart {} created at {} delivered (deletion pending: {})",
            artifact.file_name,
            artifact.created_at,
            !cleanup.is_finished()
        ),
    }

    Ok(())
}
