mod start;

use async_trait::async_trait;
use teloxide::{Bot, RequestError};
use teloxide::payloads::SendMessageSetters;
use teloxide::requests::Requester;
use teloxide::types::{ChatId, MessageId, ReplyParameters};

pub use start::*;

/// The only outbound action the bot ever performs.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_reply(&self, chat_id: ChatId, reply_to: MessageId, text: String) -> Result<(), RequestError>;
}

#[async_trait]
impl ReplySender for Bot {
    async fn send_reply(&self, chat_id: ChatId, reply_to: MessageId, text: String) -> Result<(), RequestError> {
        self.send_message(chat_id, text)
            .reply_parameters(ReplyParameters::new(reply_to))
            .await?;
        Ok(())
    }
}
