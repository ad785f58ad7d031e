// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! Token validation pipeline.
//!
//! Each call runs a short linear pipeline: parse the token header, resolve
//! the signing key (cache first, one key-set fetch on a miss), verify the
//! signature and time claims, then extract a [`TokenMetadata`] record.
//!
//! Failures stay typed as [`AuthError`] inside this module; the HTTP layer
//! collapses every kind to a uniform "invalid token" so the cause is never
//! observable to a caller probing the endpoint.

use jsonwebtoken::jwk::Jwk;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use super::cache::KeyCache;
use super::claims::{SupabaseClaims, TokenMetadata};
use super::error::AuthError;
use super::jwks::{decoding_key_for, JwksFetcher};
use crate::config::Settings;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Audience Supabase stamps into access tokens.
const EXPECTED_AUDIENCE: &str = "authenticated";

/// Validates bearer tokens against the provider's published keys.
///
/// Constructed once at startup and shared by handle; the key cache behind it
/// is process-wide state guarded by a mutex.
#[derive(Clone)]
pub struct TokenValidator {
    cache: KeyCache,
    fetcher: JwksFetcher,
    local_secret: Option<String>,
    skip_verification: bool,
}

impl TokenValidator {
    pub fn new(settings: &Settings) -> Result<Self, AuthError> {
        Ok(Self {
            cache: KeyCache::new(),
            fetcher: JwksFetcher::new(settings.jwks_url(), settings.supabase_key.clone())?,
            local_secret: settings.jwt_secret.clone(),
            skip_verification: settings.disable_auth,
        })
    }

    /// Validate a token and extract its metadata.
    pub async fn validate(&self, token: &str) -> Result<TokenMetadata, AuthError> {
        // Parse the header without verifying the signature; a malformed
        // structure is terminal.
        let header = decode_header(token).map_err(|_| AuthError::Malformed)?;

        if self.skip_verification {
            return decode_unverified(token);
        }

        // HMAC-family tokens are verified against the local signing secret
        // (Supabase legacy JWT secret), not the JWKS.
        if matches!(
            header.alg,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            let secret = self.local_secret.as_ref().ok_or(AuthError::BadSignature)?;
            let key = DecodingKey::from_secret(secret.as_bytes());
            return verify_and_extract(token, &key, header.alg);
        }

        let alg_name = algorithm_name(header.alg);
        let kid = header.kid.as_deref();

        // Resolve the key: cache hit, or one fetch of the full key set.
        let jwk = match kid.and_then(|kid| self.cache.get(kid, alg_name)) {
            Some(jwk) => jwk,
            None => self.refresh_and_find(kid, alg_name).await?,
        };

        let (decoding_key, algorithm) = decoding_key_for(&jwk)?;
        verify_and_extract(token, &decoding_key, algorithm)
    }

    /// Fetch the key set and scan it for the token's key id.
    ///
    /// An unknown kid could mean a forged token, a stale cache, or a rotation
    /// in progress; no distinction is made.
    async fn refresh_and_find(&self, kid: Option<&str>, alg_name: &str) -> Result<Jwk, AuthError> {
        let key_set = self.fetcher.fetch_key_set().await?;

        let jwk = key_set
            .keys
            .iter()
            .find(|key| key.common.key_id.as_deref() == kid)
            .cloned()
            .ok_or_else(|| AuthError::UnknownKey(kid.map(String::from)))?;

        if let Some(kid) = kid {
            self.cache.set(kid, alg_name, jwk.clone());
        }

        Ok(jwk)
    }
}

/// Verify signature plus time claims and extract metadata.
fn verify_and_extract(
    token: &str,
    key: &DecodingKey,
    algorithm: Algorithm,
) -> Result<TokenMetadata, AuthError> {
    let mut validation = Validation::new(algorithm);
    validation.leeway = CLOCK_SKEW_LEEWAY;
    validation.set_audience(&[EXPECTED_AUDIENCE]);

    let token_data =
        decode::<SupabaseClaims>(token, key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::NotYetValid,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::BadSignature,
            _ => AuthError::Malformed,
        })?;

    check_not_before(&token_data.claims)?;
    Ok(TokenMetadata::from_claims(token_data.claims))
}

/// Decode without signature verification. Development mode only; expiry and
/// not-before are still enforced.
fn decode_unverified(token: &str) -> Result<TokenMetadata, AuthError> {
    let token_data = jsonwebtoken::dangerous::insecure_decode::<SupabaseClaims>(token)
        .map_err(|_| AuthError::Malformed)?;

    let claims = token_data.claims;
    if claims.exp > 0 && claims.exp < now_unix() - CLOCK_SKEW_LEEWAY as i64 {
        return Err(AuthError::Expired);
    }
    check_not_before(&claims)?;

    Ok(TokenMetadata::from_claims(claims))
}

/// Enforce `nbf` when present (the jsonwebtoken crate only checks it when the
/// claim is required, and Supabase tokens usually omit it).
fn check_not_before(claims: &SupabaseClaims) -> Result<(), AuthError> {
    if let Some(nbf) = claims.nbf {
        if nbf > now_unix() + CLOCK_SKEW_LEEWAY as i64 {
            return Err(AuthError::NotYetValid);
        }
    }
    Ok(())
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Cache key name for an algorithm.
fn algorithm_name(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::HS256 => "HS256",
        Algorithm::HS384 => "HS384",
        Algorithm::HS512 => "HS512",
        Algorithm::ES256 => "ES256",
        Algorithm::ES384 => "ES384",
        Algorithm::RS256 => "RS256",
        Algorithm::RS384 => "RS384",
        Algorithm::RS512 => "RS512",
        Algorithm::PS256 => "PS256",
        Algorithm::PS384 => "PS384",
        Algorithm::PS512 => "PS512",
        Algorithm::EdDSA => "EdDSA",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const TEST_SECRET: &str = "local-test-secret";

    fn validator_with_secret() -> TokenValidator {
        let mut settings = Settings::for_tests("https://unreachable.invalid");
        settings.jwt_secret = Some(TEST_SECRET.to_string());
        TokenValidator::new(&settings).expect("validator builds")
    }

    fn sign_hs256(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("token signs")
    }

    fn future_exp() -> i64 {
        now_unix() + 3600
    }

    #[tokio::test]
    async fn valid_token_yields_metadata_with_subject() {
        let validator = validator_with_secret();
        let token = sign_hs256(
            &json!({
                "sub": "user-1",
                "aud": "authenticated",
                "email": "u@example.com",
                "role": "authenticated",
                "exp": future_exp(),
            }),
            TEST_SECRET,
        );

        let metadata = validator.validate(&token).await.expect("valid token");
        assert_eq!(metadata.user_id, "user-1");
        assert_eq!(metadata.email, "u@example.com");
    }

    #[tokio::test]
    async fn missing_role_defaults_to_authenticated() {
        let validator = validator_with_secret();
        let token = sign_hs256(
            &json!({"sub": "user-1", "aud": "authenticated", "exp": future_exp()}),
            TEST_SECRET,
        );

        let metadata = validator.validate(&token).await.expect("valid token");
        assert_eq!(metadata.role, "authenticated");
    }

    #[tokio::test]
    async fn wrong_secret_is_a_bad_signature() {
        let validator = validator_with_secret();
        let token = sign_hs256(
            &json!({"sub": "user-1", "aud": "authenticated", "exp": future_exp()}),
            "some-other-secret",
        );

        assert!(matches!(
            validator.validate(&token).await,
            Err(AuthError::BadSignature)
        ));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let validator = validator_with_secret();
        let token = sign_hs256(
            &json!({"sub": "user-1", "aud": "authenticated", "exp": now_unix() - 7200}),
            TEST_SECRET,
        );

        assert!(matches!(
            validator.validate(&token).await,
            Err(AuthError::Expired)
        ));
    }

    #[tokio::test]
    async fn token_before_nbf_is_rejected() {
        let validator = validator_with_secret();
        let token = sign_hs256(
            &json!({
                "sub": "user-1",
                "aud": "authenticated",
                "exp": future_exp(),
                "nbf": now_unix() + 3600,
            }),
            TEST_SECRET,
        );

        assert!(matches!(
            validator.validate(&token).await,
            Err(AuthError::NotYetValid)
        ));
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let validator = validator_with_secret();
        assert!(matches!(
            validator.validate("not-a-jwt").await,
            Err(AuthError::Malformed)
        ));
    }

    #[tokio::test]
    async fn hmac_token_without_local_secret_is_rejected() {
        let settings = Settings::for_tests("https://unreachable.invalid");
        let validator = TokenValidator::new(&settings).expect("validator builds");
        let token = sign_hs256(
            &json!({"sub": "user-1", "aud": "authenticated", "exp": future_exp()}),
            TEST_SECRET,
        );

        assert!(matches!(
            validator.validate(&token).await,
            Err(AuthError::BadSignature)
        ));
    }

    #[tokio::test]
    async fn disabled_verification_accepts_unsigned_token() {
        let mut settings = Settings::for_tests("https://unreachable.invalid");
        settings.disable_auth = true;
        let validator = TokenValidator::new(&settings).expect("validator builds");

        // Signed with a secret the validator does not know; accepted because
        // verification is disabled, claims are still extracted.
        let token = sign_hs256(
            &json!({"sub": "dev-user", "aud": "authenticated", "exp": future_exp()}),
            "whatever",
        );

        let metadata = validator.validate(&token).await.expect("accepted in dev mode");
        assert_eq!(metadata.user_id, "dev-user");
    }

    #[tokio::test]
    async fn disabled_verification_still_enforces_expiry() {
        let mut settings = Settings::for_tests("https://unreachable.invalid");
        settings.disable_auth = true;
        let validator = TokenValidator::new(&settings).expect("validator builds");

        let token = sign_hs256(
            &json!({"sub": "dev-user", "aud": "authenticated", "exp": now_unix() - 7200}),
            "whatever",
        );

        assert!(matches!(
            validator.validate(&token).await,
            Err(AuthError::Expired)
        ));
    }
}
