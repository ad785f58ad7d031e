// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! Lightweight Supabase HTTP client.
//!
//! Minimal client for the provider's Auth (GoTrue) and REST (PostgREST)
//! endpoints. Every operation is one outbound HTTPS call carrying the shared
//! `apikey` header, optionally forwarding the caller's bearer token so
//! row-level security applies to table reads and writes.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::error;

use crate::config::Settings;

/// Timeout for provider calls (login, user lookup, table access).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// Provider rejected the credentials or token.
    #[error("Supabase auth request failed: {0}")]
    Auth(String),

    /// Transport failure or non-success status on a REST call.
    #[error("Supabase request failed: {0}")]
    Request(String),

    /// Response body did not have the expected shape.
    #[error("Supabase response was invalid: {0}")]
    InvalidResponse(String),
}

/// Parameters for a table select.
pub struct SelectQuery<'a> {
    pub table: &'a str,
    /// PostgREST column list, e.g. `"*"` or `"id, first_name"`.
    pub columns: &'a str,
    /// Equality filters, rendered as `column=eq.value`.
    pub filters: &'a [(&'a str, &'a str)],
    pub limit: Option<u32>,
    /// Postgres schema; `None` targets the default exposed schema.
    pub schema: Option<&'a str>,
    /// Caller's access token for RLS passthrough.
    pub token: Option<&'a str>,
}

impl<'a> SelectQuery<'a> {
    pub fn new(table: &'a str) -> Self {
        Self {
            table,
            columns: "*",
            filters: &[],
            limit: None,
            schema: None,
            token: None,
        }
    }
}

/// HTTP client for Supabase Auth and REST operations.
#[derive(Clone)]
pub struct SupabaseClient {
    auth_url: String,
    rest_url: String,
    api_key: String,
    http: Client,
}

impl SupabaseClient {
    pub fn new(settings: &Settings) -> Result<Self, SupabaseError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SupabaseError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            auth_url: format!("{}/auth/v1", settings.supabase_url),
            rest_url: format!("{}/rest/v1", settings.supabase_url),
            api_key: settings.supabase_key.clone(),
            http,
        })
    }

    // ------------------------------------------------------------------
    // Auth operations
    // ------------------------------------------------------------------

    /// Sign in with email and password (password grant).
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Value, SupabaseError> {
        let url = format!("{}/token?grant_type=password", self.auth_url);
        let response = self
            .send(
                self.http
                    .post(&url)
                    .json(&json!({ "email": email, "password": password })),
                None,
            )
            .await?;

        if !response.status().is_success() {
            return Err(SupabaseError::Auth(format!(
                "login rejected with HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(e.to_string()))
    }

    /// Fetch the user record behind an access token.
    pub async fn get_user(&self, token: &str) -> Result<Value, SupabaseError> {
        let url = format!("{}/user", self.auth_url);
        let response = self.send(self.http.get(&url), Some(token)).await?;

        if !response.status().is_success() {
            return Err(SupabaseError::Auth(format!(
                "user lookup rejected with HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(e.to_string()))
    }

    /// Invalidate a session server-side. Best-effort; failures are surfaced
    /// so the caller can decide to ignore them.
    pub async fn sign_out(&self, token: &str) -> Result<(), SupabaseError> {
        let url = format!("{}/logout", self.auth_url);
        let response = self.send(self.http.post(&url), Some(token)).await?;

        if !response.status().is_success() {
            return Err(SupabaseError::Request(format!(
                "logout returned HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Database operations
    // ------------------------------------------------------------------

    /// Select rows from a table.
    pub async fn table_select(&self, query: SelectQuery<'_>) -> Result<Vec<Value>, SupabaseError> {
        let url = format!("{}/{}", self.rest_url, query.table);

        let mut request = self.http.get(&url).query(&[("select", query.columns)]);
        for (column, value) in query.filters {
            request = request.query(&[(*column, format!("eq.{value}"))]);
        }
        if let Some(limit) = query.limit {
            request = request.query(&[("limit", limit.to_string())]);
        }
        if let Some(schema) = query.schema {
            request = request.header("Accept-Profile", schema);
        }

        let response = self.send(request, query.token).await?;
        if !response.status().is_success() {
            return Err(SupabaseError::Request(format!(
                "select from {} returned HTTP {}",
                query.table,
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(e.to_string()))?;
        body.as_array()
            .cloned()
            .ok_or_else(|| SupabaseError::InvalidResponse("expected a row array".to_string()))
    }

    /// Insert a row into a table.
    pub async fn table_insert(
        &self,
        table: &str,
        row: &Value,
        schema: Option<&str>,
        token: Option<&str>,
    ) -> Result<(), SupabaseError> {
        let url = format!("{}/{table}", self.rest_url);

        let mut request = self.http.post(&url).json(row);
        if let Some(schema) = schema {
            request = request.header("Content-Profile", schema);
        }

        let response = self.send(request, token).await?;
        if !response.status().is_success() {
            return Err(SupabaseError::Request(format!(
                "insert into {table} returned HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Call a Postgres function via PostgREST RPC.
    pub async fn rpc(&self, function: &str, params: &Value) -> Result<Value, SupabaseError> {
        let url = format!("{}/rpc/{function}", self.rest_url);
        let response = self.send(self.http.post(&url).json(params), None).await?;

        if !response.status().is_success() {
            return Err(SupabaseError::Request(format!(
                "rpc {function} returned HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(e.to_string()))
    }

    /// Attach shared headers and send, logging provider-side failures.
    async fn send(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<Response, SupabaseError> {
        let mut request = request.header("apikey", &self.api_key);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SupabaseError::Request(e.to_string()))?;

        if response.status().is_server_error() || response.status().is_client_error() {
            error!(status = %response.status(), "Supabase API error");
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_derived_from_settings() {
        let settings = Settings::for_tests("https://example.supabase.co");
        let client = SupabaseClient::new(&settings).expect("client builds");
        assert_eq!(client.auth_url, "https://example.supabase.co/auth/v1");
        assert_eq!(client.rest_url, "https://example.supabase.co/rest/v1");
    }

    #[test]
    fn select_query_defaults_to_all_columns() {
        let query = SelectQuery::new("profiles");
        assert_eq!(query.table, "profiles");
        assert_eq!(query.columns, "*");
        assert!(query.filters.is_empty());
        assert!(query.limit.is_none());
    }
}
