// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! Session cookie plumbing.
//!
//! A validated access token is carried in an HTTP-only cookie; on subsequent
//! requests the token is read back from the cookie, falling back to an
//! `Authorization: Bearer` header. Clearing reuses the exact same name and
//! path as setting, which browsers require before honoring removal.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;

use crate::config::Settings;

/// Session lifetime (7 days).
const SESSION_MAX_AGE_SECS: u64 = 7 * 24 * 3600;

/// Build the `Set-Cookie` value carrying the session token.
///
/// `HttpOnly` always; `Secure` and `SameSite=None` only in production so the
/// cookie works cross-site behind TLS, `SameSite=Lax` otherwise.
pub fn session_cookie(settings: &Settings, token: &str) -> String {
    build_cookie(settings, token, SESSION_MAX_AGE_SECS)
}

/// Build the `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie(settings: &Settings) -> String {
    build_cookie(settings, "", 0)
}

fn build_cookie(settings: &Settings, value: &str, max_age: u64) -> String {
    let mut cookie = format!(
        "{}={value}; HttpOnly; Path=/; Max-Age={max_age}",
        settings.cookie_name
    );
    if settings.is_production() {
        cookie.push_str("; Secure; SameSite=None");
    } else {
        cookie.push_str("; SameSite=Lax");
    }
    cookie
}

/// Extract the session token from a request.
///
/// Cookie first, `Authorization: Bearer` header as fallback. Returns `None`
/// when neither is present; absence is not an error here.
pub fn token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = token_from_cookie(headers, cookie_name) {
        return Some(token);
    }
    bearer_token(headers)
}

/// Extract a bearer token from the `Authorization` header only.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn token_from_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            let pair = pair.trim();
            if let Some(value) = pair.strip_prefix(cookie_name) {
                if let Some(value) = value.strip_prefix('=') {
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn dev_settings() -> Settings {
        Settings::for_tests("https://example.supabase.co")
    }

    fn prod_settings() -> Settings {
        let mut settings = dev_settings();
        settings.environment = "production".to_string();
        settings
    }

    #[test]
    fn session_cookie_is_http_only_with_week_long_max_age() {
        let cookie = session_cookie(&dev_settings(), "tok123");
        assert!(cookie.starts_with("supabase-auth-token=tok123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn production_cookie_is_secure_and_cross_site() {
        let cookie = session_cookie(&prod_settings(), "tok123");
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
    }

    #[test]
    fn clear_cookie_matches_name_and_path_with_zero_max_age() {
        let cookie = clear_session_cookie(&dev_settings());
        assert!(cookie.starts_with("supabase-auth-token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn token_is_read_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("other=1; supabase-auth-token=tok123; theme=dark"),
        );
        assert_eq!(
            token_from_headers(&headers, "supabase-auth-token").as_deref(),
            Some("tok123")
        );
    }

    #[test]
    fn bearer_header_is_a_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok456"));
        assert_eq!(
            token_from_headers(&headers, "supabase-auth-token").as_deref(),
            Some("tok456")
        );
    }

    #[test]
    fn cookie_wins_over_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("supabase-auth-token=from-cookie"),
        );
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(
            token_from_headers(&headers, "supabase-auth-token").as_deref(),
            Some("from-cookie")
        );
    }

    #[test]
    fn missing_credentials_yield_none() {
        let headers = HeaderMap::new();
        assert!(token_from_headers(&headers, "supabase-auth-token").is_none());
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert!(token_from_headers(&headers, "supabase-auth-token").is_none());
    }
}
