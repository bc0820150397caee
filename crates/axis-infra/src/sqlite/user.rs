//! SQLite user store.

use axis_core::auth::repository::UserStore;
use axis_types::error::RepositoryError;
use axis_types::user::{NewUser, User};
use sqlx::Row;

use super::error::classify;
use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `UserStore`.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: DatabasePool,
}

impl SqliteUserStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: parse_uuid(&self.id, "user id")?,
            email: self.email,
            password_hash: self.password_hash,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl UserStore for SqliteUserStore {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let user = user.into_user();
        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NoRowsAffected);
        }
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(classify)?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::tests::test_pool;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$v=19$placeholder".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = SqliteUserStore::new(test_pool().await);
        let created = store.create_user(new_user("ada@example.com")).await.unwrap();
        let found = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, created.password_hash);
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let store = SqliteUserStore::new(test_pool().await);
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict_on_email() {
        let store = SqliteUserStore::new(test_pool().await);
        store.create_user(new_user("ada@example.com")).await.unwrap();
        let err = store.create_user(new_user("ada@example.com")).await.unwrap_err();
        match err {
            RepositoryError::Conflict { field, .. } => assert_eq!(field.as_deref(), Some("email")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }
}
