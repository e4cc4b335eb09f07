//! Approval console feed: the endpoints the institution-side console
//! uses to list and decide on alumni awaiting approval.

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::envelope::{ApiResponse, ApiResult};
use crate::payload::UserPayload;

#[derive(Debug, Deserialize)]
pub struct PendingAlumniQuery {
    pub institution: String,
}

/// `GET /institution/pending-alumni?institution=` — alumni awaiting a
/// decision, scoped to one institution. Password hashes never leave
/// the repository layer; the response carries snapshots.
pub async fn pending_alumni(
    State(state): State<AppState>,
    Query(query): Query<PendingAlumniQuery>,
) -> ApiResult<ApiResponse> {
    let users = state.auth.pending_alumni(&query.institution).await?;
    let payload: Vec<UserPayload> = users.iter().map(UserPayload::of).collect();
    Ok(ApiResponse::message("Pending alumni").with_data(payload))
}

/// `POST /institution/alumni/{id}/approve` — activate a pending
/// alumni account.
pub async fn approve_alumni(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse> {
    let user = state.auth.approve_alumni(id).await?;
    Ok(ApiResponse::message("Alumni approved").with_data(UserPayload::of(&user)))
}

/// `POST /institution/alumni/{id}/reject` — reject a pending alumni
/// account; the account is suspended and can no longer log in.
pub async fn reject_alumni(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse> {
    let user = state.auth.reject_alumni(id).await?;
    Ok(ApiResponse::message("Alumni rejected").with_data(UserPayload::of(&user)))
}
