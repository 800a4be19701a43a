use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::db::{is_unique_violation, PgStore};

/// Persistence seam for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    /// Insert a new user. `Ok(None)` means the username is already taken.
    async fn insert(&self, username: &str, password_hash: &str) -> anyhow::Result<Option<User>>;

    async fn list(&self) -> anyhow::Result<Vec<User>>;
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, password_hash, created_at FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn insert(&self, username: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(user) => Ok(Some(user)),
            // lost a registration race against the same username
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e).context("insert user"),
        }
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list users")?;
        Ok(users)
    }
}
