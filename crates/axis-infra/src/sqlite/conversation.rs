//! SQLite conversation store.
//!
//! Implements `ConversationStore` from `axis-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, writes on the
//! single writer connection and reads on the reader pool.

use axis_core::chat::repository::ConversationStore;
use axis_types::chat::{ConversationRecord, NewConversation};
use axis_types::error::RepositoryError;
use axis_types::pagination::{HistoryQuery, PagedResult};
use sqlx::Row;
use uuid::Uuid;

use super::error::classify;
use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `ConversationStore`.
#[derive(Clone)]
pub struct SqliteConversationStore {
    pool: DatabasePool,
}

impl SqliteConversationStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ConversationRecord.
struct ConversationRow {
    id: String,
    user_id: String,
    text_query: String,
    response_text: String,
    llm_model_name: String,
    timestamp: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            text_query: row.try_get("text_query")?,
            response_text: row.try_get("response_text")?,
            llm_model_name: row.try_get("llm_model_name")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_record(self) -> Result<ConversationRecord, RepositoryError> {
        Ok(ConversationRecord {
            id: parse_uuid(&self.id, "conversation id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            text_query: self.text_query,
            response_text: self.response_text,
            llm_model_name: self.llm_model_name,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

const COLUMNS: &str = "id, user_id, text_query, response_text, llm_model_name, timestamp";

impl ConversationStore for SqliteConversationStore {
    async fn append(
        &self,
        conversation: NewConversation,
    ) -> Result<ConversationRecord, RepositoryError> {
        let record = conversation.into_record();
        let row = sqlx::query(&format!(
            "INSERT INTO conversation_logs ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(&record.text_query)
        .bind(&record.response_text)
        .bind(&record.llm_model_name)
        .bind(format_datetime(&record.timestamp))
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(classify)?;

        let Some(row) = row else {
            return Err(RepositoryError::NoRowsAffected);
        };
        ConversationRow::from_row(&row)
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_record()
    }

    async fn page(
        &self,
        user_id: Uuid,
        query: &HistoryQuery,
    ) -> Result<PagedResult<ConversationRecord>, RepositoryError> {
        let (page, limit) = (query.page(), query.limit());
        let user_id = user_id.to_string();

        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM conversation_logs WHERE user_id = ? \
             ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(&user_id)
        .bind(i64::from(limit))
        .bind(query.offset() as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(classify)?;

        // An empty first page means the user has no history at all.
        if rows.is_empty() && page == 1 {
            return Ok(PagedResult::empty(page, limit));
        }

        let data = rows
            .iter()
            .map(|row| {
                ConversationRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_record()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = sqlx::query("SELECT COUNT(*) AS cnt FROM conversation_logs WHERE user_id = ?")
            .bind(&user_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(classify)?
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(PagedResult::new(data, page, limit, total.max(0) as u64))
    }
}
