//! Member-facing endpoints that consume the authenticated identity.

use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::auth::CurrentMember;

pub fn router() -> Router {
    Router::new().route("/me", get(me))
}

#[derive(Serialize)]
struct MeResponse {
    email: String,
    nickname: String,
}

/// The identity established by the interceptor for this request.
async fn me(CurrentMember(member): CurrentMember) -> impl IntoResponse {
    Json(MeResponse {
        email: member.email,
        nickname: member.nickname,
    })
}
