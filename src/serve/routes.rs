use axum::Router;
use axum::routing::get;

use crate::serve::context::AppContext;
use crate::serve::handlers;

/// Build the application router.
pub fn build_router(context: AppContext) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/index", get(handlers::index))
        .route("/go", get(handlers::go))
        .with_state(context)
}
