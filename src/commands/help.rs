use serenity::builder::CreateEmbed;
use serenity::model::channel::Message;
use serenity::prelude::Context;

pub async fn execute(ctx: &Context, msg: &Message, prefix: &str) -> Result<(), String> {
    let embed = CreateEmbed::default()
        .title("📖 Chart Commands Help")
        .description("Snapshots of TradingView charts, rendered on demand. Images are removed shortly after they are posted.")
        .color(0x00b0f4)
        .field(
            "📊 Overview",
            format!("`{p}chart <TICKER> [range] [del]` - Compact price widget (alias `{p}c`)", p = prefix),
            false,
        )
        .field(
            "📈 Technical Analysis",
            format!("`{p}ta <TICKER> [range] [del]` - Full chart with moving average", p = prefix),
            false,
        )
        .field(
            "Options",
            "`range` - TradingView range such as 1D, 5D, 1M, 3M, 12M, 60M (default 1M)\n`del` - delete your command message after the chart is posted",
            false,
        )
        .field(
            "🎯 General",
            format!("`{}help` - Show this help message", prefix),
            false,
        );

    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| format!("Failed to send help message: {}", e))?;

    Ok(())
}
