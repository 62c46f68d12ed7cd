use teloxide::types::ChatId;
use crate::config::AppConfig;
use crate::domain::{HandlerError, IncomingUpdate};
use crate::handlers::ReplySender;
use crate::{greeting, metrics};

pub const START_COMMAND: &str = "/start";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateOutcome {
    Replied(ChatId),
    Ignored,
}

/// Parses a raw update and answers the `/start` command with the chat's identifier.
/// Anything else is accepted silently.
pub async fn handle_update<S>(sender: &S, config: &AppConfig, body: &str) -> Result<UpdateOutcome, HandlerError>
where
    S: ReplySender + ?Sized
{
    let update = IncomingUpdate::from_json(body)?;
    metrics::UPDATES_COUNTER.inc();

    let message = match update.message() {
        Some(message) if message.text() == Some(START_COMMAND) => message,
        _ => {
            log::debug!("ignoring the update {}", update.id);
            return Ok(UpdateOutcome::Ignored)
        }
    };

    let chat_id = message.chat_id();
    let answer = greeting::render_greeting(&config.app_name, chat_id)?;
    sender.send_reply(chat_id, message.id(), answer).await?;

    metrics::CMD_START_COUNTER.inc();
    log::info!("the chat ID was sent to the chat {chat_id}");
    Ok(UpdateOutcome::Replied(chat_id))
}
