use axum::http::StatusCode;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use super::dto::RegisterRequest;
use super::password::{hash_password, is_valid_email, verify_password, MIN_PASSWORD_LEN};
use super::repo::CreateUserError;
use super::repo_types::User;

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("User with this email already exists")]
    AlreadyExists,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RegisterError {
    pub fn status(&self) -> StatusCode {
        match self {
            RegisterError::AlreadyExists => StatusCode::CONFLICT,
            RegisterError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Validate a sign-up form and create the account. The email is stored
/// trimmed and lowercased, so lookups are case-insensitive.
pub async fn register(db: &SqlitePool, form: RegisterRequest) -> Result<User, RegisterError> {
    let email = form.email.trim().to_lowercase();
    let username = form.username.trim();

    if username.is_empty()
        || email.is_empty()
        || form.password.is_empty()
        || form.password_confirm.is_empty()
    {
        return Err(RegisterError::MissingFields);
    }
    if !is_valid_email(&email) {
        return Err(RegisterError::InvalidEmail);
    }
    if form.password != form.password_confirm {
        return Err(RegisterError::PasswordMismatch);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RegisterError::PasswordTooShort);
    }

    let hash = hash_password(&form.password)?;
    User::create(db, &email, &hash, username)
        .await
        .map_err(|e| match e {
            CreateUserError::AlreadyExists => RegisterError::AlreadyExists,
            CreateUserError::Database(e) => RegisterError::Internal(e.into()),
        })
}

/// Look up the user and check the password. A match also records the login
/// time; unknown email and wrong password both yield `None`.
pub async fn authenticate(db: &SqlitePool, email: &str, password: &str) -> anyhow::Result<Option<User>> {
    let Some(mut user) = User::find_by_email(db, email).await? else {
        debug!(email = %email, "login unknown email");
        return Ok(None);
    };
    if !verify_password(password, &user.password_hash)? {
        debug!(user_id = user.id, "login invalid password");
        return Ok(None);
    }
    user.last_login = Some(User::touch_last_login(db, user.id).await?);
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    fn form(email: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: " Ana ".into(),
            email: email.into(),
            password: password.into(),
            password_confirm: confirm.into(),
        }
    }

    #[tokio::test]
    async fn register_normalizes_and_rejects_bad_forms() {
        let state = AppState::fake().await;

        let user = register(&state.db, form(" Ana@Example.COM", "s3cret", "s3cret"))
            .await
            .unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.username, "Ana");
        assert_ne!(user.password_hash, "s3cret");

        let cases = [
            (form("", "s3cret", "s3cret"), StatusCode::BAD_REQUEST),
            (form("ana-at-example", "s3cret", "s3cret"), StatusCode::BAD_REQUEST),
            (form("b@example.com", "s3cret", "s3creT"), StatusCode::BAD_REQUEST),
            (form("b@example.com", "s3c", "s3c"), StatusCode::BAD_REQUEST),
            (form("ANA@example.com", "s3cret", "s3cret"), StatusCode::CONFLICT),
        ];
        for (bad, status) in cases {
            let err = register(&state.db, bad).await.unwrap_err();
            assert_eq!(err.status(), status, "{}", err);
        }
    }

    #[tokio::test]
    async fn authenticate_checks_password_and_records_login() {
        let state = AppState::fake().await;
        register(&state.db, form("auth@example.com", "s3cret!", "s3cret!"))
            .await
            .unwrap();

        assert!(authenticate(&state.db, "auth@example.com", "wrong").await.unwrap().is_none());
        assert!(authenticate(&state.db, "nobody@example.com", "s3cret!").await.unwrap().is_none());

        let user = authenticate(&state.db, "auth@example.com", "s3cret!")
            .await
            .unwrap()
            .expect("valid credentials");
        assert!(user.last_login.is_some());
    }
}
