// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! Time2Log Auth Gateway
//!
//! Thin authentication gateway in front of Supabase (hosted Postgres + Auth +
//! REST). Logs users in, validates Supabase-issued JWTs against the provider
//! JWKS with a TTL key cache, and proxies simple table reads and writes.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - JWT validation: key cache, JWKS fetch, claims, cookies
//! - `supabase` - lightweight provider HTTP client

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod supabase;
