use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::dto::{
    AuthResponse, LoginRequest, PasswordCheckRequest, PasswordSuggestion, PublicUser,
    RefreshRequest, RegisterRequest,
};
use super::extractors::CurrentUser;
use super::password::{password_strength, suggest_password, PasswordStrength};
use super::repo_types::User;
use super::services::{self, authenticate, RegisterError};
use super::tokens::TokenKind;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/password-strength", post(check_password))
        .route("/auth/password-suggestion", get(password_suggestion))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn internal(e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn auth_response(state: &AppState, user: User) -> Result<AuthResponse, (StatusCode, String)> {
    let tokens = state.tokens.issue(&user).map_err(|e| {
        error!(error = %e, user_id = user.id, "token signing failed");
        internal(e)
    })?;
    Ok(AuthResponse {
        tokens,
        user: user.into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    let user = services::register(&state.db, payload).await.map_err(|e| {
        match &e {
            RegisterError::Internal(inner) => error!(error = %inner, "register failed"),
            other => warn!(reason = %other, "register rejected"),
        }
        (e.status(), e.to_string())
    })?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(auth_response(&state, user)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "All fields are required".into()));
    }

    let user = match authenticate(&state.db, &payload.email, &payload.password).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login rejected");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %e, "authenticate failed");
            return Err(internal(e));
        }
    };

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(auth_response(&state, user)?))
}

/// Trade a refresh token for a new pair. The account must still exist.
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let claims = state
        .tokens
        .verify(&payload.refresh_token, TokenKind::Refresh)
        .map_err(|e| {
            warn!(error = %e, "refresh rejected");
            (StatusCode::UNAUTHORIZED, e.to_string())
        })?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(auth_response(&state, user)?))
}

pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user.into())
}

pub async fn check_password(Json(payload): Json<PasswordCheckRequest>) -> Json<PasswordStrength> {
    Json(password_strength(&payload.password))
}

pub async fn password_suggestion() -> Json<PasswordSuggestion> {
    Json(PasswordSuggestion {
        password: suggest_password(),
    })
}
