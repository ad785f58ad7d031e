// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

//! In-memory JWKS key cache with TTL.
//!
//! Keys are cached per `(kid, alg)` pair so a key id published under one
//! algorithm never satisfies a lookup for another. Expired entries are purged
//! lazily on the next lookup; there is no size bound because provider key
//! sets are single-digit small and rotation is rare.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::Jwk;

/// Default cache TTL (5 minutes).
const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct CachedKey {
    jwk: Jwk,
    inserted_at: Instant,
}

/// Concurrency-safe cache of provider public keys.
///
/// Backed by a single mutex-protected map. The lock is never held across an
/// await point; the remote fetch on a miss happens outside the lock and the
/// result is written in one insert (last write wins, which is fine because
/// all fetches for a stable kid return identical material).
#[derive(Clone)]
pub struct KeyCache {
    entries: Arc<Mutex<HashMap<(String, String), CachedKey>>>,
    ttl: Duration,
}

impl KeyCache {
    /// Create a cache with the default 300 second TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Return the cached key for `(kid, alg)` if present and not expired.
    ///
    /// A stale entry is removed and treated as absent.
    pub fn get(&self, kid: &str, alg: &str) -> Option<Jwk> {
        let mut entries = self.entries.lock().expect("key cache poisoned");
        let key = (kid.to_string(), alg.to_string());
        match entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.jwk.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store or overwrite the key for `(kid, alg)` with the current timestamp.
    pub fn set(&self, kid: &str, alg: &str, jwk: Jwk) {
        let mut entries = self.entries.lock().expect("key cache poisoned");
        entries.insert(
            (kid.to_string(), alg.to_string()),
            CachedKey {
                jwk,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop all entries. Used for test isolation and forced rotation.
    pub fn clear(&self) {
        self.entries.lock().expect("key cache poisoned").clear();
    }
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new()
    }
}
