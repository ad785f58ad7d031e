// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

use std::sync::Arc;

use crate::auth::TokenValidator;
use crate::config::Settings;
use crate::supabase::SupabaseClient;

/// Shared application state, cloned into every handler.
///
/// Constructed once at process start; the validator's key cache behind it is
/// the only mutable piece and is internally synchronized.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub supabase: SupabaseClient,
    pub validator: TokenValidator,
}

impl AppState {
    /// Build state from settings, wiring the Supabase client and validator.
    pub fn from_settings(settings: Settings) -> Result<Self, String> {
        let supabase = SupabaseClient::new(&settings).map_err(|e| e.to_string())?;
        let validator = TokenValidator::new(&settings).map_err(|e| e.to_string())?;

        Ok(Self {
            settings: Arc::new(settings),
            supabase,
            validator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_builds_from_settings() {
        let state = AppState::from_settings(Settings::for_tests("https://example.supabase.co"))
            .expect("state builds");
        assert_eq!(state.settings.cookie_name, "supabase-auth-token");
    }
}
