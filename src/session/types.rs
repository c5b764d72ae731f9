//! Session types: messages, speakers, and archived session entries.

use serde::{Deserialize, Serialize};

/// Which side of the conversation produced a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

/// A single conversational turn. Immutable once appended; ordering within a
/// session is insertion order and carries meaning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
        }
    }
}

/// A session as stored in the remote archive: a store-assigned id, the full
/// message sequence, and the creation timestamp set at first persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchivedSession {
    pub id: String,
    pub messages: Vec<Message>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Speaker::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Speaker::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn message_roundtrip() {
        let msg = Message::user("Hello");
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn archived_session_roundtrip() {
        let session = ArchivedSession {
            id: "doc-1".into(),
            messages: vec![Message::user("Hi"), Message::bot("Hello there")],
            created_at: "2026-01-01T00:00:00Z".into(),
        };
        let json = serde_json::to_string(&session).unwrap();
        let parsed: ArchivedSession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }

    #[test]
    fn constructors_tag_the_right_speaker() {
        assert_eq!(Message::user("a").speaker, Speaker::User);
        assert_eq!(Message::bot("b").speaker, Speaker::Bot);
    }
}
