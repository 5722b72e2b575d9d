//! TranscriptStore trait definition.
//!
//! Append-only persistence for conversation turns. Follows the RPITIT
//! repository pattern: native async fn in traits, implementations in
//! relaybot-infra (e.g., `SqliteTranscriptStore`).

use relaybot_types::error::StoreError;
use relaybot_types::turn::{Conversation, NewTurn, SessionId, Turn};

/// Durable append-only log of turns.
///
/// Implementations assign the turn id and timestamp on write. No uniqueness
/// is enforced: appending the same message twice yields two turns.
pub trait TranscriptStore: Send + Sync {
    /// Append a single turn.
    fn append(
        &self,
        turn: NewTurn,
    ) -> impl std::future::Future<Output = Result<Turn, StoreError>> + Send;

    /// Append the user turn and the bot turn of one exchange atomically.
    ///
    /// Either both turns are persisted or neither is. The user turn is
    /// always ordered before the bot turn.
    fn append_exchange(
        &self,
        user: NewTurn,
        bot: NewTurn,
    ) -> impl std::future::Future<Output = Result<(Turn, Turn), StoreError>> + Send;

    /// All turns of one session, ordered by timestamp then insertion order.
    ///
    /// An unknown session yields an empty conversation, not an error.
    fn conversation(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Conversation, StoreError>> + Send;

    /// Total number of turns across all sessions.
    fn count_turns(&self) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
