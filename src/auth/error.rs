// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! Token validation errors.
//!
//! `AuthError` is a closed set of validation failure kinds. All of them
//! collapse to a uniform "invalid token" at the HTTP boundary so that callers
//! cannot distinguish a never-valid token from an expired one; the underlying
//! cause is logged server-side only.

use thiserror::Error;

/// Reasons a token can fail validation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token structure could not be parsed.
    #[error("token is malformed")]
    Malformed,

    /// Token key id is not present in the provider's key set.
    #[error("no matching key in key set for kid {0:?}")]
    UnknownKey(Option<String>),

    /// Signature did not verify against the resolved key.
    #[error("token signature is invalid")]
    BadSignature,

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token `nbf` claim is in the future.
    #[error("token is not yet valid")]
    NotYetValid,

    /// Key set could not be fetched from the provider.
    #[error("key set fetch failed: {0}")]
    FetchFailed(String),

    /// Anything else (key material conversion, unexpected claim shapes).
    #[error("internal validation error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_without_token_contents() {
        let err = AuthError::UnknownKey(Some("key-1".to_string()));
        assert_eq!(err.to_string(), r#"no matching key in key set for kid Some("key-1")"#);

        let err = AuthError::FetchFailed("HTTP 503".to_string());
        assert!(err.to_string().contains("HTTP 503"));
    }
}
