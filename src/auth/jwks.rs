// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! Remote JWKS fetching.
//!
//! The key set is fetched fresh on every cache miss from the provider's
//! well-known discovery URL. Supabase signs with EC P-256 (ES256) keys, but
//! the conversion below also handles the RSA family so a provider-side
//! algorithm change does not require code changes here.

use std::time::Duration;

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};

use super::error::AuthError;

/// Timeout for the key set fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the published key set from the identity provider.
#[derive(Clone)]
pub struct JwksFetcher {
    jwks_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl JwksFetcher {
    /// Create a fetcher for the given discovery URL.
    ///
    /// `api_key` is sent as the `apikey` header; Supabase rejects anonymous
    /// requests to the discovery endpoint without it.
    pub fn new(jwks_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            jwks_url: jwks_url.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Fetch the full key set.
    ///
    /// Not retried here; surfacing a provider outage promptly is preferred
    /// over masking it. Retry policy, if any, belongs to the caller.
    pub async fn fetch_key_set(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| AuthError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::FetchFailed(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::FetchFailed(e.to_string()))
    }
}

/// Convert a JWK into a decoding key plus its verification algorithm.
pub fn decoding_key_for(jwk: &Jwk) -> Result<(DecodingKey, Algorithm), AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::EllipticCurve(ec) => {
            let key = DecodingKey::from_ec_components(&ec.x, &ec.y)
                .map_err(|e| AuthError::Internal(format!("failed to build EC key: {e}")))?;
            let alg = match jwk.common.key_algorithm {
                Some(KeyAlgorithm::ES384) => Algorithm::ES384,
                // Supabase publishes ES256; default to it for EC keys.
                _ => Algorithm::ES256,
            };
            Ok((key, alg))
        }
        AlgorithmParameters::RSA(rsa) => {
            let key = DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                .map_err(|e| AuthError::Internal(format!("failed to build RSA key: {e}")))?;
            let alg = match jwk.common.key_algorithm {
                Some(KeyAlgorithm::RS384) => Algorithm::RS384,
                Some(KeyAlgorithm::RS512) => Algorithm::RS512,
                _ => Algorithm::RS256,
            };
            Ok((key, alg))
        }
        _ => Err(AuthError::Internal(
            "unsupported key type in key set".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ec_jwk_converts_to_es256_key() {
        // P-256 key from RFC 7515 appendix A.3.
        let jwk: Jwk = serde_json::from_value(serde_json::json!({
            "kty": "EC",
            "kid": "key-1",
            "crv": "P-256",
            "alg": "ES256",
            "x": "f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU",
            "y": "x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0",
        }))
        .unwrap();

        let (_key, alg) = decoding_key_for(&jwk).expect("EC key converts");
        assert_eq!(alg, Algorithm::ES256);
    }

    #[test]
    fn rsa_jwk_converts_to_rs256_key() {
        // RSA key from RFC 7515 appendix A.2.
        let jwk: Jwk = serde_json::from_value(serde_json::json!({
            "kty": "RSA",
            "kid": "key-2",
            "alg": "RS256",
            "n": "ofgWCuLjybRlzo0tZWJjNiuSfb4p4fAkd_wWJcyQoTbji9k0l8W26mPddxHmfHQp-Vaw-4qPCJrcS2mJPMEzP1Pt0Bm4d4QlL-yRT-SFd2lZS-pCgNMsD1W_YpRPEwOWvG6b32690r2jZ47soMZo9wGzjb_7OMg0LOL-bSf63kpaSHSXndS5z5rexMdbBYUsLA9e-KXBdQOS-UTo7WTBEMa2R2CapHg665xsmtdVMTBQY4uDZlxvb3qCo5ZwKh9kG4LT6_I5IhlJH7aGhyxXFvUK-DWNmoudF8NAco9_h9iaGNj8q2ethFkMLs91kzk2PAcDTW9gb54h4FRWyuXpoQ",
            "e": "AQAB",
        }))
        .unwrap();

        let (_key, alg) = decoding_key_for(&jwk).expect("RSA key converts");
        assert_eq!(alg, Algorithm::RS256);
    }

    #[test]
    fn symmetric_jwk_is_rejected() {
        let jwk: Jwk = serde_json::from_value(serde_json::json!({
            "kty": "oct",
            "kid": "key-3",
            "k": "c2VjcmV0",
        }))
        .unwrap();

        assert!(matches!(
            decoding_key_for(&jwk),
            Err(AuthError::Internal(_))
        ));
    }
}
