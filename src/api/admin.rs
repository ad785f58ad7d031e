// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! Admin diagnostics: database schema discovery pass-through.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::models::SchemaDiscoveryResponse;
use crate::state::AppState;

/// Discover tables exposed by the provider, via the `get_tables` RPC.
///
/// Diagnostic endpoint; a provider failure degrades to an empty table list
/// rather than an error.
#[utoipa::path(
    get,
    path = "/api/admin/schemas",
    tag = "Admin",
    responses(
        (status = 200, description = "Discovered tables", body = SchemaDiscoveryResponse),
    )
)]
pub async fn get_schemas(State(state): State<AppState>) -> Json<SchemaDiscoveryResponse> {
    info!("schema discovery requested");

    let tables = match state.supabase.rpc("get_tables", &json!({})).await {
        Ok(result) => result
            .get("data")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        Err(e) => {
            error!(error = %e, "schema discovery failed");
            Vec::new()
        }
    };

    Json(SchemaDiscoveryResponse {
        tables,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
