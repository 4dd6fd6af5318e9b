use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub(crate) mod jwt;
mod password;
pub mod repo;
pub mod repo_types;
pub(crate) mod services;

pub use extractors::AuthUser;
pub use repo::{AccountRepo, PgAccountRepo};
pub use repo_types::Role;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
