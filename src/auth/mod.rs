use crate::state::AppState;
use axum::Router;

mod dto;
pub(crate) mod extractors;
pub mod handlers;
mod password;
pub mod repo;
mod repo_types;
pub mod services;
pub mod tokens;

pub use extractors::CurrentUser;
pub use repo_types::User;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
