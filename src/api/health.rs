// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! Liveness endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Test endpoint response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestResponse {
    pub message: String,
    pub timestamp: String,
}

/// Health check endpoint.
///
/// Static liveness only; does not probe the provider.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Simple test endpoint.
#[utoipa::path(
    get,
    path = "/api/test",
    tag = "Health",
    responses(
        (status = 200, description = "Test response", body = TestResponse),
    )
)]
pub async fn test_endpoint() -> Json<TestResponse> {
    Json(TestResponse {
        message: "Test endpoint working".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_healthy() {
        let Json(body) = health().await;
        assert_eq!(body.status, "healthy");
        assert!(!body.timestamp.is_empty());
    }
}
