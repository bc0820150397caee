//! Store selection.
//!
//! `Database` is chosen once at startup from `database.kind` and then used
//! everywhere a store trait is needed.

use axis_core::auth::repository::UserStore;
use axis_core::chat::repository::ConversationStore;
use axis_core::storage::StorageProbe;
use axis_types::chat::{ConversationRecord, NewConversation};
use axis_types::config::{DatabaseConfig, DatabaseKind};
use axis_types::error::RepositoryError;
use axis_types::pagination::{HistoryQuery, PagedResult};
use axis_types::user::{NewUser, User};
use tracing::info;
use uuid::Uuid;

use crate::memory::MemoryStore;
use crate::sqlite::conversation::SqliteConversationStore;
use crate::sqlite::pool::DatabasePool;
use crate::sqlite::user::SqliteUserStore;

/// The configured store. Cheap to clone; clones share connections.
#[derive(Clone)]
pub enum Database {
    Sqlite {
        pool: DatabasePool,
        conversations: SqliteConversationStore,
        users: SqliteUserStore,
    },
    Memory(MemoryStore),
}

impl Database {
    /// Open the store named by `config.kind`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let database = match config.kind {
            DatabaseKind::Sqlite => {
                Self::sqlite(DatabasePool::new(&config.url, config.max_connections).await?)
            }
            DatabaseKind::Memory => Self::Memory(MemoryStore::new()),
        };
        info!(kind = %config.kind, "database connected");
        Ok(database)
    }

    pub fn sqlite(pool: DatabasePool) -> Self {
        Self::Sqlite {
            conversations: SqliteConversationStore::new(pool.clone()),
            users: SqliteUserStore::new(pool.clone()),
            pool,
        }
    }

    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub fn kind(&self) -> DatabaseKind {
        match self {
            Self::Sqlite { .. } => DatabaseKind::Sqlite,
            Self::Memory(_) => DatabaseKind::Memory,
        }
    }
}

impl ConversationStore for Database {
    async fn append(
        &self,
        conversation: NewConversation,
    ) -> Result<ConversationRecord, RepositoryError> {
        match self {
            Self::Sqlite { conversations, .. } => conversations.append(conversation).await,
            Self::Memory(store) => store.append(conversation).await,
        }
    }

    async fn page(
        &self,
        user_id: Uuid,
        query: &HistoryQuery,
    ) -> Result<PagedResult<ConversationRecord>, RepositoryError> {
        match self {
            Self::Sqlite { conversations, .. } => conversations.page(user_id, query).await,
            Self::Memory(store) => store.page(user_id, query).await,
        }
    }
}

impl UserStore for Database {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        match self {
            Self::Sqlite { users, .. } => users.create_user(user).await,
            Self::Memory(store) => store.create_user(user).await,
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        match self {
            Self::Sqlite { users, .. } => users.find_by_email(email).await,
            Self::Memory(store) => store.find_by_email(email).await,
        }
    }
}

impl StorageProbe for Database {
    fn is_initialized(&self) -> bool {
        match self {
            Self::Sqlite { pool, .. } => pool.is_initialized(),
            Self::Memory(store) => store.is_initialized(),
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Sqlite { pool, .. } => pool.ping().await,
            Self::Memory(store) => store.ping().await,
        }
    }

    async fn close(&self) {
        match self {
            Self::Sqlite { pool, .. } => pool.close().await,
            Self::Memory(store) => store.close().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_memory() {
        let config = DatabaseConfig {
            kind: DatabaseKind::Memory,
            ..Default::default()
        };
        let db = Database::connect(&config).await.unwrap();
        assert_eq!(db.kind(), DatabaseKind::Memory);
        assert!(db.is_initialized());
    }

    #[tokio::test]
    async fn test_connect_sqlite_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            kind: DatabaseKind::Sqlite,
            url: format!("sqlite://{}?mode=rwc", dir.path().join("axis.db").display()),
            max_connections: 2,
        };
        let db = Database::connect(&config).await.unwrap();
        assert_eq!(db.kind(), DatabaseKind::Sqlite);

        let user = db
            .create_user(NewUser {
                email: "ada@example.com".into(),
                password_hash: "h".into(),
            })
            .await
            .unwrap();
        db.append(NewConversation {
            user_id: user.id,
            text_query: "hi".into(),
            response_text: "hello".into(),
            llm_model_name: "qwen3".into(),
        })
        .await
        .unwrap();

        let page = db.page(user.id, &HistoryQuery::new(1, 10)).await.unwrap();
        assert_eq!(page.total, 1);

        db.ping().await.unwrap();
        db.close().await;
        assert!(!db.is_initialized());
    }
}
