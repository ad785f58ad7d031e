// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! # Runtime Configuration
//!
//! This module defines the environment-driven settings used throughout the
//! application. Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SUPABASE_URL` | Supabase project base URL | Required |
//! | `SUPABASE_KEY` | API key sent on every outbound Supabase call | Required |
//! | `JWT_SECRET` | Local HS256 signing-secret override | Unset (JWKS verification) |
//! | `COOKIE_NAME` | Session cookie name | `supabase-auth-token` |
//! | `ENVIRONMENT` | `production` or `development` (cookie flags) | `development` |
//! | `CORS_ORIGINS` | Comma-separated allowed origins | localhost dev origins |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DISABLE_AUTH` | Skip JWT signature verification (dev only) | `false` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

const DEFAULT_COOKIE_NAME: &str = "supabase-auth-token";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Application settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Supabase project base URL (e.g. `https://xyz.supabase.co`).
    pub supabase_url: String,
    /// Supabase API key, sent as the `apikey` header on every provider call.
    pub supabase_key: String,
    /// Optional local HS256 secret. When set, HMAC-signed tokens are verified
    /// against it instead of the remote JWKS.
    pub jwt_secret: Option<String>,
    /// Name of the HTTP-only session cookie.
    pub cookie_name: String,
    /// Deployment environment (`production` hardens cookie flags).
    pub environment: String,
    /// Allowed cross-origin hosts.
    pub cors_origins: Vec<String>,
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Skip JWT signature verification. Development convenience only.
    pub disable_auth: bool,
}

impl Settings {
    /// Load settings from the environment.
    ///
    /// Returns an error naming the missing variable if a required setting is
    /// absent.
    pub fn from_env() -> Result<Self, String> {
        let supabase_url = env_required("SUPABASE_URL")?
            .trim_end_matches('/')
            .to_string();
        let supabase_key = env_required("SUPABASE_KEY")?;
        let jwt_secret = env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());
        let cookie_name = env_or_default("COOKIE_NAME", DEFAULT_COOKIE_NAME);
        let environment = env_or_default("ENVIRONMENT", "development");
        let cors_origins = env_or_default("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        let host = env_or_default("HOST", DEFAULT_HOST);
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let disable_auth = env::var("DISABLE_AUTH")
            .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            supabase_url,
            supabase_key,
            jwt_secret,
            cookie_name,
            environment,
            cors_origins,
            host,
            port,
            disable_auth,
        })
    }

    /// JWKS discovery URL for the configured Supabase project.
    pub fn jwks_url(&self) -> String {
        format!("{}/auth/v1/.well-known/jwks.json", self.supabase_url)
    }

    /// Whether the server is running in production.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Settings for tests; no environment access.
    #[cfg(test)]
    pub fn for_tests(supabase_url: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into(),
            supabase_key: "test-api-key".to_string(),
            jwt_secret: None,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            environment: "development".to_string(),
            cors_origins: vec!["http://localhost:5173".to_string()],
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            disable_auth: false,
        }
    }
}

fn env_required(name: &str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("missing required environment variable {name}"))
}

fn env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwks_url_is_derived_from_base_url() {
        let settings = Settings::for_tests("https://example.supabase.co");
        assert_eq!(
            settings.jwks_url(),
            "https://example.supabase.co/auth/v1/.well-known/jwks.json"
        );
    }

    #[test]
    fn development_is_not_production() {
        let settings = Settings::for_tests("https://example.supabase.co");
        assert!(!settings.is_production());
    }
}
