use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};

use crate::{
    handlers::moods::{create_mood, delete_mood, list_moods, update_mood},
    middleware::create_middleware_stack,
    store::SharedStore,
};

/// Create the Axum router with all endpoints and middleware
pub fn create_router(store: SharedStore, allowed_origin: HeaderValue) -> Router {
    Router::new()
        .route("/add-mood", post(create_mood))
        .route("/moods", get(list_moods))
        .route("/moods/:id", put(update_mood).delete(delete_mood))
        .with_state(store)
        .layer(create_middleware_stack(allowed_origin))
}
