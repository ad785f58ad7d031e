// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::health::{HealthResponse, TestResponse},
    models::{
        CreateActivityRequest, LoginRequest, LoginResponse, MessageResponse,
        SchemaDiscoveryResponse, TokenValidationResponse,
    },
    state::AppState,
};

pub mod activities;
pub mod admin;
pub mod auth;
pub mod health;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    let api_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/verify-token", get(auth::verify_token))
        .route("/logout", post(auth::logout))
        .route("/auth/validate", post(auth::validate_bearer))
        .route(
            "/activities/create",
            post(activities::create_activity),
        )
        .route("/activities/history", get(activities::activity_history))
        .route("/activities/tags", get(activities::activity_tags))
        .route("/admin/schemas", get(admin::get_schemas))
        .route("/health", get(health::health))
        .route("/test", get(health::test_endpoint))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured frontend origins, with credentials so the session
/// cookie flows cross-origin.
fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .settings
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::verify_token,
        auth::logout,
        auth::validate_bearer,
        activities::create_activity,
        activities::activity_history,
        activities::activity_tags,
        admin::get_schemas,
        health::health,
        health::test_endpoint
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            TokenValidationResponse,
            MessageResponse,
            CreateActivityRequest,
            SchemaDiscoveryResponse,
            HealthResponse,
            TestResponse
        )
    ),
    tags(
        (name = "Authentication", description = "Login, token verification, logout"),
        (name = "Activities", description = "Activity tracking pass-through"),
        (name = "Admin", description = "Diagnostics"),
        (name = "Health", description = "Liveness")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let state = AppState::from_settings(Settings::for_tests("https://example.supabase.co"))
            .expect("state builds");
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
