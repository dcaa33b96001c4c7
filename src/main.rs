use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

mod chat;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use config::Settings;
use services::chart_service::ChartService;
use services::renderer_service::{ChartRenderer, SystemProcessRunner};

struct Handler {
    prefix: String,
}

struct ChartServiceKey;

impl TypeMapKey for ChartServiceKey {
    type Value = ChartService;
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        commands::handle_message(&ctx, &msg, &self.prefix).await;
    }

    async fn ready(&self, _: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("chartshot=debug".parse().unwrap())
            .add_directive("serenity=warn".parse().unwrap()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📈 Starting chartshot bot...");

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let renderer = match ChartRenderer::for_platform(
        settings.renderer_path.clone(),
        std::env::consts::OS,
        Arc::new(SystemProcessRunner),
    ) {
        Ok(r) => r,
        Err(e) => {
            error!("Cannot locate capture-website: {}", e);
            return;
        }
    };
    info!("Using capture-website at {}", renderer.binary_path().display());

    if let Err(e) = std::fs::create_dir_all(&settings.image_dir) {
        error!("Failed to create image directory {}: {}", settings.image_dir.display(), e);
        return;
    }

    let chart_service = ChartService::new(Arc::new(renderer), settings.image_dir.clone());
    info!("Charts will be written to {}", chart_service.image_dir().display());

    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGES;

    let handler = Handler {
        prefix: settings.command_prefix.clone(),
    };

    let mut client = match Client::builder(&settings.discord_token, intents)
        .event_handler(handler)
        .await
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create client: {}", e);
            return;
        }
    };

    {
        let mut data = client.data.write().await;
        data.insert::<ChartServiceKey>(chart_service);
    }

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }
}
