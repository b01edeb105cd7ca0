use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use tracing::{error, warn};

use super::repo_types::User;
use super::tokens::TokenKind;
use crate::state::AppState;

/// Account behind a bearer access token. Refresh tokens and tokens whose
/// user no longer exists are refused with 401.
pub struct CurrentUser(pub User);

fn unauthorized(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::UNAUTHORIZED, msg.into())
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| unauthorized("Missing bearer token"))?;
        let claims = state.tokens.verify(token, TokenKind::Access).map_err(|e| {
            warn!(error = %e, "bearer token rejected");
            unauthorized(e.to_string())
        })?;

        match User::find_by_id(&state.db, claims.sub).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                warn!(user_id = claims.sub, "token for unknown user");
                Err(unauthorized("User not found"))
            }
            Err(e) => {
                error!(error = %e, user_id = claims.sub, "load token user failed");
                Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
            }
        }
    }
}
