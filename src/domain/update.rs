use serde::Deserialize;
use teloxide::types::{ChatId, MessageId};

/// An inbound webhook event. Only the parts the bot reacts to are modelled; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingUpdate {
    pub id: i64,
    pub kind: UpdateKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateKind {
    Message(IncomingMessage),
    /// Edited messages, callback queries, inline queries and everything else.
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IncomingMessage {
    message_id: i32,
    chat: IncomingChat,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct IncomingChat {
    id: i64,
}

#[derive(Deserialize)]
struct RawUpdate {
    update_id: i64,
    #[serde(default)]
    message: Option<IncomingMessage>,
}

impl IncomingUpdate {
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        let raw: RawUpdate = serde_json::from_str(body)?;
        let kind = match raw.message {
            Some(message) => UpdateKind::Message(message),
            None => UpdateKind::Other,
        };
        Ok(Self { id: raw.update_id, kind })
    }

    pub fn message(&self) -> Option<&IncomingMessage> {
        match &self.kind {
            UpdateKind::Message(message) => Some(message),
            UpdateKind::Other => None,
        }
    }
}

impl IncomingMessage {
    pub fn id(&self) -> MessageId {
        MessageId(self.message_id)
    }

    pub fn chat_id(&self) -> ChatId {
        ChatId(self.chat.id)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_message_update() {
        let update = IncomingUpdate::from_json(
            r#"{"update_id":1,"message":{"message_id":5,"date":0,"chat":{"id":42,"type":"private"},"text":"/start"}}"#
        ).unwrap();
        assert_eq!(update.id, 1);
        let message = update.message().expect("the message must be parsed");
        assert_eq!(message.id(), MessageId(5));
        assert_eq!(message.chat_id(), ChatId(42));
        assert_eq!(message.text(), Some("/start"));
    }

    #[test]
    fn test_message_without_text() {
        let update = IncomingUpdate::from_json(
            r#"{"update_id":3,"message":{"message_id":1,"date":0,"chat":{"id":-100500,"type":"supergroup"},"sticker":{}}}"#
        ).unwrap();
        let message = update.message().unwrap();
        assert_eq!(message.chat_id(), ChatId(-100500));
        assert_eq!(message.text(), None);
    }

    #[test]
    fn test_update_without_message() {
        let update = IncomingUpdate::from_json(
            r#"{"update_id":4,"callback_query":{"id":"1","data":"x"}}"#
        ).unwrap();
        assert_eq!(update.kind, UpdateKind::Other);
        assert!(update.message().is_none());

        let update = IncomingUpdate::from_json(r#"{"update_id":5,"message":null}"#).unwrap();
        assert_eq!(update.kind, UpdateKind::Other);
    }

    #[test]
    fn test_malformed_updates() {
        assert!(IncomingUpdate::from_json("not-json").is_err());
        assert!(IncomingUpdate::from_json("").is_err());
        assert!(IncomingUpdate::from_json("{}").is_err());
        assert!(IncomingUpdate::from_json(r#"{"update_id":"one"}"#).is_err());
        assert!(IncomingUpdate::from_json(r#"{"update_id":1,"message":{"message_id":1}}"#).is_err());
        assert!(IncomingUpdate::from_json(r#"{"update_id":1,"message":{"message_id":1,"chat":{"id":"abc"}}}"#).is_err());
    }
}
