use crate::auth::repo_types::User;
use sqlx::SqlitePool;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("user already exists")]
    AlreadyExists,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, username, created_at, last_login
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, username, created_at, last_login
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password. A taken email is reported as
    /// `AlreadyExists` rather than a database failure.
    pub async fn create(
        db: &SqlitePool,
        email: &str,
        password_hash: &str,
        username: &str,
    ) -> Result<User, CreateUserError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, username, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, email, password_hash, username, created_at, last_login
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(username)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(CreateUserError::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn touch_last_login(db: &SqlitePool, id: i64) -> anyhow::Result<OffsetDateTime> {
        let now = OffsetDateTime::now_utc();
        sqlx::query("UPDATE users SET last_login = ?1 WHERE id = ?2")
            .bind(now)
            .bind(id)
            .execute(db)
            .await?;
        Ok(now)
    }
}
