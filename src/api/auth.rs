// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! Authentication endpoints: login, token verification, logout.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::AppendHeaders,
    Json,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::auth::{cookies, DEFAULT_ROLE};
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, MessageResponse, TokenValidationResponse};
use crate::state::AppState;

/// Authenticate against Supabase and set the HTTP-only session cookie.
///
/// Credential rejection and provider outage both collapse to the same 401;
/// the cause is only logged.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<LoginResponse>), ApiError> {
    let session = state
        .supabase
        .sign_in_with_password(&req.email, &req.password)
        .await
        .map_err(|e| {
            warn!(email = %req.email, error = %e, "login failed");
            ApiError::unauthorized("Invalid credentials")
        })?;

    let access_token = session
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            warn!("login session missing access_token");
            ApiError::unauthorized("Invalid credentials")
        })?;

    let user = state.supabase.get_user(access_token).await.map_err(|e| {
        warn!(error = %e, "user lookup after login failed");
        ApiError::unauthorized("Invalid credentials")
    })?;

    let user_id = user
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;
    let email = user.get("email").and_then(Value::as_str).unwrap_or_default();
    let role = user
        .pointer("/app_metadata/role")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ROLE);
    let person_name = user
        .pointer("/user_metadata/person_name")
        .and_then(Value::as_str)
        .map(str::to_string);

    info!(user_id, "login succeeded");

    let cookie = cookies::session_cookie(&state.settings, access_token);
    let body = LoginResponse {
        access_token: access_token.to_string(),
        token_type: "bearer".to_string(),
        user_id: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        person_name,
    };

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(body)))
}

/// Validate the session token from the cookie (or bearer fallback).
///
/// Always 200; validity is expressed in the body so frontends can poll this
/// without error handling.
#[utoipa::path(
    get,
    path = "/api/verify-token",
    tag = "Authentication",
    responses(
        (status = 200, description = "Validation result", body = TokenValidationResponse),
    )
)]
pub async fn verify_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<TokenValidationResponse> {
    let Some(token) = cookies::token_from_headers(&headers, &state.settings.cookie_name) else {
        return Json(TokenValidationResponse::invalid());
    };

    match state.validator.validate(&token).await {
        Ok(metadata) => Json(TokenValidationResponse::valid(metadata)),
        Err(e) => {
            warn!(error = %e, "token validation failed");
            Json(TokenValidationResponse::invalid())
        }
    }
}

/// Clear the session cookie and invalidate the session provider-side.
///
/// Provider sign-out is best-effort: the cookie is cleared either way.
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<MessageResponse>) {
    if let Some(token) = cookies::token_from_headers(&headers, &state.settings.cookie_name) {
        if let Err(e) = state.supabase.sign_out(&token).await {
            warn!(error = %e, "provider sign-out failed (non-critical)");
        }
    }

    let cookie = cookies::clear_session_cookie(&state.settings);
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

/// Legacy bearer-only validation endpoint (backward compatibility).
///
/// Unlike `/verify-token`, a missing header or invalid token is a 401.
#[utoipa::path(
    post,
    path = "/api/auth/validate",
    tag = "Authentication",
    responses(
        (status = 200, description = "Token is valid", body = TokenValidationResponse),
        (status = 401, description = "Missing header or invalid token"),
    )
)]
pub async fn validate_bearer(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenValidationResponse>, ApiError> {
    let token = cookies::bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing or invalid Authorization header"))?;

    let metadata = state.validator.validate(&token).await.map_err(|e| {
        warn!(error = %e, "bearer token validation failed");
        ApiError::unauthorized("Invalid token")
    })?;

    Ok(Json(TokenValidationResponse::valid(metadata)))
}
