use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
#[error("Ошибка при отправке сообщения в Telegram ({chat_id}): {reason}")]
pub struct NotifyError {
    pub chat_id: String,
    pub reason: String,
}

/// Outbound messaging primitive. Implementations do no retrying of their own.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    pub fn new(bot_token: String) -> Self {
        Self {
            bot: Bot::new(bot_token),
        }
    }
}

/// Numeric ids address a chat directly; anything else is treated as a
/// channel username such as `@my_channel`.
pub fn recipient(chat_id: &str) -> Recipient {
    let trimmed = chat_id.trim();
    match trimmed.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(trimmed.to_string()),
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send(&self, chat_id: &str, text: &str) -> Result<()> {
        self.bot.send_message(recipient(chat_id), text).await?;
        Ok(())
    }
}

/// Delivers notifications to one configured chat. Failures are logged and
/// returned, never escalated.
pub struct Notifier {
    sender: Box<dyn MessageSender>,
    chat_id: String,
}

impl Notifier {
    pub fn new(sender: Box<dyn MessageSender>, chat_id: String) -> Self {
        Self { sender, chat_id }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        match self.sender.send(&self.chat_id, message).await {
            Ok(()) => {
                debug!(chat_id = %self.chat_id, %message, "message sent");
                Ok(())
            }
            Err(err) => {
                error!(?err, chat_id = %self.chat_id, "failed to send telegram message");
                Err(NotifyError {
                    chat_id: self.chat_id.clone(),
                    reason: format!("{err:#}"),
                })
            }
        }
    }
}
