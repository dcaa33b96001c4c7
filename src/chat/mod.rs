//! Chat transport capability
//!
//! The chart pipeline only ever needs to reply with text, reply with a photo
//! and delete messages. Everything Discord-specific lives in `discord`.

pub mod discord;

use serenity::async_trait;

use crate::models::{MessageHandle, Photo};
use crate::utils::ChatError;

pub use discord::DiscordChannel;

/// Replies go to the conversation the triggering command came from
#[async_trait]
pub trait ChatChannel: Send + Sync {
    async fn reply_text(&self, text: &str) -> Result<MessageHandle, ChatError>;

    async fn reply_photo(&self, photo: &Photo) -> Result<MessageHandle, ChatError>;

    async fn delete_message(&self, id: MessageHandle) -> Result<(), ChatError>;
}
