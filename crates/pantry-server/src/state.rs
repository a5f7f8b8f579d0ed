use std::sync::Arc;

use pantry_upstream::SpoonacularClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<SpoonacularClient>,
}

impl AppState {
    pub fn new(upstream: SpoonacularClient) -> Self {
        Self {
            upstream: Arc::new(upstream),
        }
    }
}
