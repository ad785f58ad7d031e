// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! # Authentication Module
//!
//! Supabase JWT validation for the gateway.
//!
//! ## Auth Flow
//!
//! 1. Frontend logs in through `POST /api/login`; the Supabase access token
//!    is set as an HTTP-only session cookie.
//! 2. Subsequent requests carry the cookie (or `Authorization: Bearer`).
//! 3. The gateway:
//!    - Reads `kid` and `alg` from the token header
//!    - Resolves the public key from the TTL cache, fetching the JWKS on miss
//!    - Verifies signature, expiry, not-before, and audience
//!    - Extracts `sub` -> `user_id`, email, role, and passthrough claims
//!
//! ## Security
//!
//! - JWKS is fetched over HTTPS with a bounded timeout and cached for 5 minutes
//! - Every validation failure is reported to callers as the same "invalid
//!   token"; causes are only logged server-side
//! - Clock skew tolerance is 60 seconds

pub mod cache;
pub mod claims;
pub mod cookies;
pub mod error;
pub mod jwks;
pub mod validator;

pub use cache::KeyCache;
pub use claims::{TokenMetadata, DEFAULT_ROLE};
pub use error::AuthError;
pub use validator::TokenValidator;
