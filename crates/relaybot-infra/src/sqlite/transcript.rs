//! SQLite transcript store implementation.
//!
//! Implements `TranscriptStore` from `relaybot-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, writes on the single
//! writer connection.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use uuid::Uuid;

use relaybot_core::transcript::store::TranscriptStore;
use relaybot_types::error::StoreError;
use relaybot_types::turn::{Conversation, NewTurn, Sender, SessionId, Turn};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `TranscriptStore`.
#[derive(Clone)]
pub struct SqliteTranscriptStore {
    pool: DatabasePool,
}

impl SqliteTranscriptStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct TurnRow {
    id: String,
    session_id: String,
    sender: String,
    message: String,
    created_at: String,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            sender: row.try_get("sender")?,
            message: row.try_get("message")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<Turn, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Corrupt(format!("invalid turn id: {e}")))?;
        let session_id = SessionId::new(self.session_id)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let sender: Sender = self.sender.parse().map_err(StoreError::Corrupt)?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Turn {
            id,
            session_id,
            sender,
            message: self.message,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("invalid datetime: {e}")))
}

/// Fixed-width timestamps so `ORDER BY created_at` sorts chronologically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

async fn insert_turn<'e, E>(executor: E, turn: &Turn) -> Result<(), StoreError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r#"INSERT INTO conversations (id, session_id, sender, message, created_at)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(turn.id.to_string())
    .bind(turn.session_id.to_string())
    .bind(turn.sender.to_string())
    .bind(turn.message.clone())
    .bind(format_datetime(&turn.created_at))
    .execute(executor)
    .await
    .map_err(unavailable)?;

    Ok(())
}

// ---------------------------------------------------------------------------
// TranscriptStore implementation
// ---------------------------------------------------------------------------

impl TranscriptStore for SqliteTranscriptStore {
    async fn append(&self, turn: NewTurn) -> Result<Turn, StoreError> {
        let turn = Turn::stamp(turn);
        insert_turn(&self.pool.writer, &turn).await?;
        Ok(turn)
    }

    async fn append_exchange(&self, user: NewTurn, bot: NewTurn) -> Result<(Turn, Turn), StoreError> {
        // One timestamp for the exchange; rowid keeps user before bot even if
        // the wall clock steps back between the two stamps.
        let now = Utc::now();
        let user = Turn::stamp_at(user, now);
        let bot = Turn::stamp_at(bot, now);

        // Both rows or neither: a failed bot insert must not orphan the user turn.
        let mut tx = self.pool.writer.begin().await.map_err(unavailable)?;
        insert_turn(&mut *tx, &user).await?;
        insert_turn(&mut *tx, &bot).await?;
        tx.commit().await.map_err(unavailable)?;

        Ok((user, bot))
    }

    async fn conversation(&self, session_id: &SessionId) -> Result<Conversation, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM conversations WHERE session_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(session_id.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(unavailable)?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row =
                TurnRow::from_row(row).map_err(|e| StoreError::Corrupt(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }

        Ok(Conversation {
            session_id: session_id.clone(),
            turns,
        })
    }

    async fn count_turns(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM conversations")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(unavailable)?;

        let count: i64 = row.try_get("cnt").map_err(unavailable)?;
        Ok(count as u64)
    }
}
