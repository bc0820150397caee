//! In-memory store for development and tests.
//!
//! Implements the same store traits as the SQLite layer on top of
//! `tokio::sync::RwLock`. Nothing survives a restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axis_core::auth::repository::UserStore;
use axis_core::chat::repository::ConversationStore;
use axis_core::storage::StorageProbe;
use axis_types::chat::{ConversationRecord, NewConversation};
use axis_types::error::RepositoryError;
use axis_types::pagination::{HistoryQuery, PagedResult};
use axis_types::user::{NewUser, User};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    /// Append order; newest last.
    conversations: Vec<ConversationRecord>,
    users_by_email: HashMap<String, User>,
}

/// Shared in-memory store. Clones share state.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    open: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    fn ensure_open(&self) -> Result<(), RepositoryError> {
        if self.open.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(RepositoryError::Connection)
        }
    }
}

impl ConversationStore for MemoryStore {
    async fn append(
        &self,
        conversation: NewConversation,
    ) -> Result<ConversationRecord, RepositoryError> {
        self.ensure_open()?;
        let record = conversation.into_record();
        self.state.write().await.conversations.push(record.clone());
        Ok(record)
    }

    async fn page(
        &self,
        user_id: Uuid,
        query: &HistoryQuery,
    ) -> Result<PagedResult<ConversationRecord>, RepositoryError> {
        self.ensure_open()?;
        let state = self.state.read().await;
        let mut mine: Vec<&ConversationRecord> = state
            .conversations
            .iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        mine.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));

        let total = mine.len() as u64;
        let data = mine
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(query.limit() as usize)
            .cloned()
            .collect();
        Ok(PagedResult::new(data, query.page(), query.limit(), total))
    }
}

impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.ensure_open()?;
        let mut state = self.state.write().await;
        if state.users_by_email.contains_key(&user.email) {
            return Err(RepositoryError::Conflict {
                field: Some("email".to_string()),
                detail: format!("email '{}' already registered", user.email),
            });
        }
        let user = user.into_user();
        state.users_by_email.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.ensure_open()?;
        Ok(self.state.read().await.users_by_email.get(email).cloned())
    }
}

impl StorageProbe for MemoryStore {
    fn is_initialized(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.ensure_open()
    }

    async fn close(&self) {
        self.open.store(false, Ordering::Release);
    }
}
