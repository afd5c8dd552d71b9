//! Postgres-backed user repository (the production identity path).
//!
//! Other repositories currently use in-memory stores and can be swapped to
//! Postgres the same way. Every query goes through the shared `PgPool`;
//! sqlx's pool is the thread-safe read path the authentication filter
//! ultimately awaits on.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use accessmate_accounts::{User, UserStatus};
use accessmate_auth::Role;
use accessmate_core::UserId;

use crate::repository::{RepoError, UserRepository};

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist yet.
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                display_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(storage)?;
        Ok(())
    }
}

fn storage(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return RepoError::Duplicate(db.message().to_string());
        }
    }
    RepoError::Storage(err.to_string())
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, RepoError> {
    let status = match row.try_get::<String, _>("status").map_err(storage)?.as_str() {
        "suspended" => UserStatus::Suspended,
        _ => UserStatus::Active,
    };

    Ok(User {
        id: UserId::from_uuid(row.try_get("id").map_err(storage)?),
        email: row.try_get("email").map_err(storage)?,
        display_name: row.try_get("display_name").map_err(storage)?,
        password_hash: row.try_get("password_hash").map_err(storage)?,
        role: Role::new(row.try_get::<String, _>("role").map_err(storage)?),
        status,
        created_at: row.try_get("created_at").map_err(storage)?,
        updated_at: row.try_get("updated_at").map_err(storage)?,
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: User) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, password_hash, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.to_string())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage)?;
        Ok(())
    }

    async fn update(&self, user: User) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE users
            SET email = $2,
                display_name = $3,
                password_hash = $4,
                role = $5,
                status = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.to_string())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage)?;
        Ok(())
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        rows.iter().map(row_to_user).collect()
    }

    async fn remove(&self, id: UserId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        Ok(result.rows_affected() > 0)
    }
}
