// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! Request and response DTOs for the HTTP surface.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::TokenMetadata;

/// Body of `POST /api/login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,
}

/// Body of `GET /api/verify-token`.
///
/// Always returned with status 200; an invalid or absent token is expressed
/// in `valid`, never in the status code.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,
}

impl TokenValidationResponse {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            user_id: None,
            email: None,
            role: None,
            person_id: None,
            person_name: None,
        }
    }

    pub fn valid(metadata: TokenMetadata) -> Self {
        Self {
            valid: true,
            user_id: Some(metadata.user_id),
            email: Some(metadata.email),
            role: Some(metadata.role),
            person_id: metadata.person_id,
            person_name: metadata.person_name,
        }
    }
}

/// Generic confirmation body.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Reference to a predefined activity.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivityRef {
    #[serde(default)]
    pub id: Option<String>,
}

/// Body of `POST /api/activities/create`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateActivityRequest {
    #[serde(default)]
    pub activity: Option<ActivityRef>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Body of `GET /api/admin/schemas`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SchemaDiscoveryResponse {
    pub tables: Vec<String>,
    pub timestamp: String,
}
