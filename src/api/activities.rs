// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! Activity tracking endpoints.
//!
//! Pure pass-through to the `app` schema tables: inserts and selects against
//! `activities_assignments` and `pre_defined_activities`, with the caller's
//! token forwarded so row-level security applies.

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::auth::{cookies, TokenMetadata};
use crate::error::ApiError;
use crate::models::{CreateActivityRequest, MessageResponse};
use crate::state::AppState;
use crate::supabase::{SelectQuery, SupabaseError};

/// Postgres schema holding activity tables.
const APP_SCHEMA: &str = "app";

/// Resolve the current user, keeping the raw token for RLS passthrough.
async fn current_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(TokenMetadata, String), ApiError> {
    let token = cookies::token_from_headers(headers, &state.settings.cookie_name)
        .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

    let metadata = state.validator.validate(&token).await.map_err(|e| {
        warn!(error = %e, "token validation failed");
        ApiError::unauthorized("Invalid token")
    })?;

    Ok((metadata, token))
}

fn upstream_error(e: SupabaseError) -> ApiError {
    error!(error = %e, "Supabase table access failed");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Upstream request failed")
}

/// Create an activity for the authenticated user.
///
/// The referenced activity id must exist in `pre_defined_activities`.
#[utoipa::path(
    post,
    path = "/api/activities/create",
    tag = "Activities",
    request_body = CreateActivityRequest,
    responses(
        (status = 200, description = "Activity created", body = MessageResponse),
        (status = 400, description = "Missing or unknown activity id"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn create_activity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateActivityRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (metadata, token) = current_user(&state, &headers).await?;

    let activity_id = req
        .activity
        .as_ref()
        .and_then(|activity| activity.id.clone())
        .ok_or_else(|| ApiError::bad_request("Missing activity id"))?;

    let predefined = state
        .supabase
        .table_select(SelectQuery {
            filters: &[("id", activity_id.as_str())],
            limit: Some(1),
            schema: Some(APP_SCHEMA),
            token: Some(&token),
            ..SelectQuery::new("pre_defined_activities")
        })
        .await
        .map_err(upstream_error)?;

    if predefined.is_empty() {
        return Err(ApiError::bad_request("Invalid activity id"));
    }

    state
        .supabase
        .table_insert(
            "activities_assignments",
            &json!({
                "user_id": metadata.user_id,
                "activity_id": activity_id,
                "notes": req.notes,
                "start_time": req.start_time,
                "end_time": req.end_time,
            }),
            Some(APP_SCHEMA),
            Some(&token),
        )
        .await
        .map_err(upstream_error)?;

    Ok(Json(MessageResponse {
        message: "Activity created successfully".to_string(),
    }))
}

/// All activities recorded for the authenticated user.
#[utoipa::path(
    get,
    path = "/api/activities/history",
    tag = "Activities",
    responses(
        (status = 200, description = "Activity rows"),
        (status = 400, description = "No activities found"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn activity_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, ApiError> {
    let (metadata, token) = current_user(&state, &headers).await?;

    let activities = state
        .supabase
        .table_select(SelectQuery {
            filters: &[("user_id", metadata.user_id.as_str())],
            schema: Some(APP_SCHEMA),
            token: Some(&token),
            ..SelectQuery::new("activities_assignments")
        })
        .await
        .map_err(upstream_error)?;

    if activities.is_empty() {
        return Err(ApiError::bad_request("No activities found"));
    }

    Ok(Json(activities))
}

/// All predefined activities, served as tags.
#[utoipa::path(
    get,
    path = "/api/activities/tags",
    tag = "Activities",
    responses(
        (status = 200, description = "Predefined activity tags"),
        (status = 400, description = "No tags found"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn activity_tags(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let (_metadata, token) = current_user(&state, &headers).await?;

    let tags = state
        .supabase
        .table_select(SelectQuery {
            schema: Some(APP_SCHEMA),
            token: Some(&token),
            ..SelectQuery::new("pre_defined_activities")
        })
        .await
        .map_err(upstream_error)?;

    if tags.is_empty() {
        return Err(ApiError::bad_request("No tags found"));
    }

    Ok(Json(json!({ "data": tags })))
}
