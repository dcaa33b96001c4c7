pub mod chart;
pub mod help;

use serenity::model::channel::Message;
use serenity::prelude::Context;

/// Split a message into `(command, args)` when it starts with `prefix`
pub fn split_command<'a>(content: &'a str, prefix: &str) -> Option<(&'a str, Vec<&'a str>)> {
    let mut parts = content.split_whitespace();
    let command = parts.next()?.strip_prefix(prefix)?;
    if command.is_empty() {
        return None;
    }
    Some((command, parts.collect()))
}

pub async fn handle_message(ctx: &Context, msg: &Message, prefix: &str) {
    if msg.author.bot {
        return;
    }

    let Some((command, args)) = split_command(&msg.content, prefix) else {
        return;
    };

    let result = match command.to_lowercase().as_str() {
        "chart" | "c" => chart::execute(ctx, msg, &args, false).await,
        "ta" => chart::execute(ctx, msg, &args, true).await,
        "help" => help::execute(ctx, msg, prefix).await,
        _ => return,
    };

    if let Err(e) = result {
        tracing::error!("❌ Error executing command {}: {}", command, e);

        let user_message = if e.contains("429") || e.contains("rate limit") {
            "⚠️ **Rate Limited**: Discord is rate limiting us. Please try again in a moment.".to_string()
        } else if !e.is_empty() {
            format!("❌ {}", e)
        } else {
            "❌ An error occurred while executing the command.".to_string()
        };

        let embed = serenity::builder::CreateEmbed::default()
            .title("Command Error")
            .description(user_message)
            .color(0xff0000);

        let _ = msg.channel_id
            .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
            .await;
    }
}
