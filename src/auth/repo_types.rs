use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,                             // autoincrement user ID
    pub email: String,                       // unique, lowercased
    #[serde(skip_serializing)]
    pub password_hash: String,               // Argon2 hash, not exposed in JSON
    pub username: String,                    // display name
    pub created_at: OffsetDateTime,          // creation timestamp
    pub last_login: Option<OffsetDateTime>,  // set on every successful login
}
