//! Turn, session, and conversation types.
//!
//! A `Turn` is one logged utterance. Turns sharing a `SessionId` form a
//! `Conversation`, ordered by the store-assigned timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::RelayError;

/// Who produced a turn.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sender IN ('user', 'bot'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// Opaque per-client identifier correlating turns with one classifier context.
///
/// Never empty. The value is otherwise uninterpreted: clients usually send a
/// UUID, but any non-empty token is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw token, rejecting the empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, RelayError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(RelayError::InvalidRequest(
                "sessionId must not be empty".to_string(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = RelayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        value.0
    }
}

/// A turn that has not been written yet.
///
/// The store assigns `id` and `created_at` when it persists the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTurn {
    pub session_id: SessionId,
    pub sender: Sender,
    pub message: String,
}

impl NewTurn {
    pub fn user(session_id: SessionId, message: impl Into<String>) -> Self {
        Self {
            session_id,
            sender: Sender::User,
            message: message.into(),
        }
    }

    pub fn bot(session_id: SessionId, message: impl Into<String>) -> Self {
        Self {
            session_id,
            sender: Sender::Bot,
            message: message.into(),
        }
    }
}

/// One persisted utterance. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub session_id: SessionId,
    pub sender: Sender,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Stamp a pending turn with a fresh time-sortable id and timestamp.
    pub fn stamp(new: NewTurn) -> Self {
        Self::stamp_at(new, Utc::now())
    }

    /// Stamp with a caller-chosen timestamp, so both turns of one exchange
    /// can share it.
    pub fn stamp_at(new: NewTurn, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id: new.session_id,
            sender: new.sender,
            message: new.message,
            created_at,
        }
    }
}

/// All turns of one session, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub session_id: SessionId,
    pub turns: Vec<Turn>,
}

impl Conversation {
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// The most recent bot turn, if any.
    pub fn last_reply(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.sender == Sender::Bot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_roundtrip() {
        for sender in [Sender::User, Sender::Bot] {
            let parsed: Sender = sender.to_string().parse().unwrap();
            assert_eq!(parsed, sender);
        }
        assert_eq!("BOT".parse::<Sender>().unwrap(), Sender::Bot);
        assert!("assistant".parse::<Sender>().is_err());
    }

    #[test]
    fn test_sender_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        let bot: Sender = serde_json::from_str("\"bot\"").unwrap();
        assert_eq!(bot, Sender::Bot);
    }

    #[test]
    fn test_session_id_rejects_empty() {
        assert!(matches!(
            SessionId::new(""),
            Err(RelayError::InvalidRequest(_))
        ));
        // Whitespace is opaque data, not absence.
        assert_eq!(SessionId::new(" ").unwrap().as_str(), " ");
    }

    #[test]
    fn test_session_id_deserialize_validates() {
        let ok: SessionId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(ok.as_str(), "abc");
        assert!(serde_json::from_str::<SessionId>("\"\"").is_err());
    }

    #[test]
    fn test_stamp_preserves_fields() {
        let session = SessionId::new("abc").unwrap();
        let turn = Turn::stamp(NewTurn::user(session.clone(), "Hello"));
        assert_eq!(turn.session_id, session);
        assert_eq!(turn.sender, Sender::User);
        assert_eq!(turn.message, "Hello");
        assert_eq!(turn.id.get_version_num(), 7);
    }

    #[test]
    fn test_stamp_at_uses_given_time() {
        let session = SessionId::new("abc").unwrap();
        let at = Utc::now() - chrono::Duration::seconds(30);
        let user = Turn::stamp_at(NewTurn::user(session.clone(), "Hello"), at);
        let bot = Turn::stamp_at(NewTurn::bot(session, "Hi"), at);
        assert_eq!(user.created_at, at);
        assert_eq!(bot.created_at, at);
        assert_ne!(user.id, bot.id);
    }

    #[test]
    fn test_conversation_last_reply() {
        let session = SessionId::new("abc").unwrap();
        let conversation = Conversation {
            session_id: session.clone(),
            turns: vec![
                Turn::stamp(NewTurn::user(session.clone(), "Hello")),
                Turn::stamp(NewTurn::bot(session.clone(), "Hi there!")),
                Turn::stamp(NewTurn::user(session, "Still there?")),
            ],
        };
        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation.last_reply().unwrap().message, "Hi there!");
    }
}
