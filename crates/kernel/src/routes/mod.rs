//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod front;
pub mod health;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::require_bearer;
use crate::state::AppState;

/// Build the full application router.
///
/// Page and admin routes sit behind [`require_bearer`]; `/`, `/login` and
/// `/health` are public.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(front::router())
        .merge(admin::router())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .merge(front::public_router())
        .merge(auth::router())
        .merge(health::router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
