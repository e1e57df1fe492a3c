use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod jwt;
mod otp;
mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

#[cfg(test)]
mod store_tests;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
