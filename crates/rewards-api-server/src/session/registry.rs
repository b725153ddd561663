use dashmap::DashMap;
use rand::{distr::Alphanumeric, Rng};
use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Length of generated session identifiers (nanoid-equivalent entropy,
/// 62^21 keyspace makes collisions negligible).
const SESSION_ID_LEN: usize = 21;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
}

/// One ephemeral viewing session. Owned exclusively by the registry.
#[derive(Debug, Clone)]
pub struct Session {
    pub owner_id: Option<String>,
    pub started_at: Instant,
    pub last_ping_at: Instant,
    pub proofs: u64,
    pub video_count: u64,
}

/// Counter snapshot returned to ping callers.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounters {
    pub proofs: u64,
    pub video_count: u64,
}

/// Thread-safe in-memory session registry.
///
/// DashMap keeps start/ping/sweep safe under the multi-threaded runtime
/// without a registry-wide lock; each entry mutation holds only its shard.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session and return its identifier. Infallible.
    pub fn start(&self, owner_id: Option<String>) -> String {
        let session_id = new_session_id();
        let now = Instant::now();

        self.sessions.insert(
            session_id.clone(),
            Session {
                owner_id,
                started_at: now,
                last_ping_at: now,
                proofs: 0,
                video_count: 0,
            },
        );

        debug!("Started session {}", session_id);
        session_id
    }

    /// Record a ping against an existing session.
    ///
    /// Refreshes the idle timer and applies positive deltas; non-positive
    /// deltas are ignored rather than rejected. `event` is an opaque audit
    /// hint with no behavior attached.
    pub fn ping(
        &self,
        session_id: &str,
        event: Option<&str>,
        proofs_delta: Option<i64>,
        video_delta: Option<i64>,
    ) -> Result<SessionCounters, SessionError> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or(SessionError::NotFound)?;

        entry.last_ping_at = Instant::now();

        if let Some(delta) = proofs_delta {
            if delta > 0 {
                entry.proofs = entry.proofs.saturating_add(delta as u64);
            }
        }
        if let Some(delta) = video_delta {
            if delta > 0 {
                entry.video_count = entry.video_count.saturating_add(delta as u64);
            }
        }

        if let Some(event) = event {
            debug!("Session {} event: {}", session_id, event);
        }

        Ok(SessionCounters {
            proofs: entry.proofs,
            video_count: entry.video_count,
        })
    }

    /// Remove every session idle longer than `ttl` as of `now`.
    /// Returns the number of sessions removed.
    pub fn sweep_expired(&self, now: Instant, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_ping_at) <= ttl);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn new_session_id() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}
