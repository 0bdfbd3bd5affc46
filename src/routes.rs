//! REST endpoints for reading the profile registry.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::profiles::{ProfileRecord, ProfileRegistry};
use crate::types::NationalId;

/// Shared state for profile routes.
#[derive(Clone)]
pub struct ProfileRouteState {
    pub registry: Arc<ProfileRegistry>,
}

#[derive(Debug, Deserialize)]
struct OwnerQuery {
    msisdn: Option<String>,
}

/// GET /api/profiles?msisdn=...
///
/// Profiles owned by the phone number, sorted by display label.
async fn list_profiles(
    State(state): State<ProfileRouteState>,
    Query(query): Query<OwnerQuery>,
) -> impl IntoResponse {
    let Some(msisdn) = query.msisdn.filter(|m| !m.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "msisdn query parameter is required"})),
        )
            .into_response();
    };
    let mut profiles: Vec<ProfileRecord> = state.registry.list_owned_by(&msisdn);
    profiles.sort_by_cached_key(|p| p.display_label());
    Json(profiles).into_response()
}

/// GET /api/profiles/{national_id}
async fn get_profile(
    State(state): State<ProfileRouteState>,
    Path(national_id): Path<String>,
) -> impl IntoResponse {
    let national_id = match NationalId::parse(&national_id) {
        Ok(id) => id,
        Err(failure) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": failure.code, "value": failure.value})),
            )
                .into_response();
        }
    };
    match state.registry.lookup(&national_id) {
        Some(profile) => Json(profile).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No profile with this national id"})),
        )
            .into_response(),
    }
}

/// Build the profile REST routes.
pub fn profile_routes(state: ProfileRouteState) -> Router {
    Router::new()
        .route("/api/profiles", get(list_profiles))
        .route("/api/profiles/{national_id}", get(get_profile))
        .with_state(state)
}
