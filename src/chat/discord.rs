use std::sync::Arc;

use serenity::all::CreateAttachment;
use serenity::async_trait;
use serenity::builder::CreateMessage;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, MessageId};
use serenity::prelude::Context;

use super::ChatChannel;
use crate::models::{MessageHandle, Photo};
use crate::utils::ChatError;

/// A Discord channel, replying to one source message
#[derive(Clone)]
pub struct DiscordChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
    source_id: MessageId,
}

impl DiscordChannel {
    pub fn for_message(ctx: &Context, msg: &Message) -> Self {
        Self {
            http: ctx.http.clone(),
            channel_id: msg.channel_id,
            source_id: msg.id,
        }
    }

    fn reply(&self) -> CreateMessage {
        CreateMessage::default().reference_message((self.channel_id, self.source_id))
    }
}

#[async_trait]
impl ChatChannel for DiscordChannel {
    async fn reply_text(&self, text: &str) -> Result<MessageHandle, ChatError> {
        let http: &Http = &self.http;
        let sent = self
            .channel_id
            .send_message(http, self.reply().content(text))
            .await
            .map_err(|e| ChatError::Send(e.to_string()))?;

        Ok(sent.id.get())
    }

    async fn reply_photo(&self, photo: &Photo) -> Result<MessageHandle, ChatError> {
        let attachment = CreateAttachment::path(&photo.path)
            .await
            .map_err(|e| ChatError::Attachment {
                path: photo.path.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            "Sending {}x{} chart {} to channel {}",
            photo.width,
            photo.height,
            photo.path.display(),
            self.channel_id
        );

        let http: &Http = &self.http;
        let sent = self
            .channel_id
            .send_message(http, self.reply().add_file(attachment))
            .await
            .map_err(|e| ChatError::Send(e.to_string()))?;

        Ok(sent.id.get())
    }

    async fn delete_message(&self, id: MessageHandle) -> Result<(), ChatError> {
        let http: &Http = &self.http;
        self.channel_id
            .delete_message(http, MessageId::new(id))
            .await
            .map_err(|e| ChatError::Delete {
                id,
                reason: e.to_string(),
            })
    }
}
