mod auth;
mod error;
mod members;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{AuthState, authenticate};

/// Create the API router. Everything except logout sits behind the
/// authentication middleware; logout must keep working with dead tokens.
pub fn create_api_router(state: AuthState) -> Router {
    let protected = Router::new()
        .nest("/members", members::router())
        .route("/auth/verify", get(auth::verify))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/auth/logout", post(auth::logout))
        .with_state(state)
        .merge(protected)
}
