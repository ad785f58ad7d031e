// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! JWT claim schema and the validated-token metadata record.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role assigned when a token carries no role claim.
///
/// Supabase issues `role: "authenticated"` for logged-in users; tokens
/// without the claim are treated the same rather than rejected.
pub const DEFAULT_ROLE: &str = "authenticated";

/// Claims recognized in a Supabase access token.
///
/// Decoded defensively: unrecognized fields are ignored, and the optional
/// fields below default as enumerated in [`TokenMetadata::from_claims`].
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseClaims {
    /// Subject (canonical user id).
    pub sub: String,

    /// Expiration timestamp.
    #[serde(default)]
    pub exp: i64,

    /// Not-before timestamp (optional).
    #[serde(default)]
    pub nbf: Option<i64>,

    /// Audience; Supabase uses `"authenticated"`.
    #[serde(default)]
    #[allow(dead_code)] // validated by the jsonwebtoken crate, not read directly
    pub aud: Option<serde_json::Value>,

    /// User email.
    #[serde(default)]
    pub email: Option<String>,

    /// Postgres role for row-level security.
    #[serde(default)]
    pub role: Option<String>,

    /// Application-specific person id passthrough claim.
    #[serde(default)]
    pub person_id: Option<String>,

    /// Application-specific display name passthrough claim.
    #[serde(default)]
    pub person_name: Option<String>,
}

/// Result of a successful token validation.
///
/// Immutable value object, constructed once per validation call and owned by
/// the calling request handler.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenMetadata {
    /// Canonical user id (the token's `sub` claim).
    pub user_id: String,
    /// User email; empty string when the claim is absent.
    pub email: String,
    /// Role; defaults to [`DEFAULT_ROLE`] when the claim is absent.
    pub role: String,
    /// Person id passthrough, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    /// Display name passthrough, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,
}

impl TokenMetadata {
    /// Build the metadata record from verified claims, applying defaults.
    pub fn from_claims(claims: SupabaseClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.unwrap_or_default(),
            role: claims.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            person_id: claims.person_id,
            person_name: claims.person_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(json: serde_json::Value) -> SupabaseClaims {
        serde_json::from_value(json).expect("valid claims")
    }

    #[test]
    fn user_id_comes_from_subject() {
        let metadata = TokenMetadata::from_claims(claims(serde_json::json!({
            "sub": "user-123",
            "email": "a@example.com",
            "role": "authenticated",
        })));
        assert_eq!(metadata.user_id, "user-123");
        assert_eq!(metadata.email, "a@example.com");
    }

    #[test]
    fn role_defaults_to_authenticated() {
        let metadata = TokenMetadata::from_claims(claims(serde_json::json!({
            "sub": "user-123",
        })));
        assert_eq!(metadata.role, DEFAULT_ROLE);
    }

    #[test]
    fn email_defaults_to_empty_string() {
        let metadata = TokenMetadata::from_claims(claims(serde_json::json!({
            "sub": "user-123",
        })));
        assert_eq!(metadata.email, "");
    }

    #[test]
    fn passthrough_claims_are_preserved() {
        let metadata = TokenMetadata::from_claims(claims(serde_json::json!({
            "sub": "user-123",
            "person_id": "p-9",
            "person_name": "Ada Lovelace",
        })));
        assert_eq!(metadata.person_id.as_deref(), Some("p-9"));
        assert_eq!(metadata.person_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn unrecognized_fields_are_ignored() {
        let metadata = TokenMetadata::from_claims(claims(serde_json::json!({
            "sub": "user-123",
            "app_metadata": {"provider": "email"},
            "session_id": "s-1",
        })));
        assert_eq!(metadata.user_id, "user-123");
    }
}
