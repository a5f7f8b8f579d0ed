pub mod health;
pub mod recipes;

use axum::Router;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(recipes::routes())
        .merge(health::routes())
        .with_state(state)
}
