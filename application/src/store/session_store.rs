//! Session store: the table mapping session ids to conversation state.
//!
//! Locking is two-level. The table itself sits behind a
//! `std::sync::RwLock` that is held only for insert, lookup, and
//! remove, never across an await. Each session sits behind its own
//! `tokio::sync::Mutex`, held for the whole inference call, so
//! concurrent questions against the same session serialize into one
//! total order while questions against different sessions proceed in
//! parallel. Eviction takes the per-session lock non-blockingly: a
//! held lock means an active turn, and that session survives the pass.

use crate::ports::clock::Clock;
use crate::ports::vision_gateway::{InferenceError, VisionGateway};
use chrono::{DateTime, Utc};
use glance_domain::{ImagePayload, Question, Session, SessionId, Turn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Errors surfaced by store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unknown or expired session: {0}")]
    SessionNotFound(String),

    #[error("Question cannot be empty")]
    InvalidQuestion,

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Tuning for the session table
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Idle time after which a session becomes eligible for eviction
    pub idle_timeout: Duration,
    /// Optional cap on live sessions; when a create would exceed it,
    /// the idlest session is evicted first
    pub max_sessions: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(3600),
            max_sessions: None,
        }
    }
}

type SessionSlot = Arc<Mutex<Session>>;

/// In-process mapping from session id to conversation state
///
/// Constructed once at startup with its collaborators injected, then
/// shared across request handlers and the reaper.
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionSlot>>,
    gateway: Arc<dyn VisionGateway>,
    clock: Arc<dyn Clock>,
    config: StoreConfig,
}

impl SessionStore {
    pub fn new(gateway: Arc<dyn VisionGateway>, clock: Arc<dyn Clock>, config: StoreConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            gateway,
            clock,
            config,
        }
    }

    /// Current time as seen by the store's injected clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.read().map(|table| table.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a session for a decoded image.
    ///
    /// Generates the caption first, with no locks held, so a slow
    /// inference call cannot stall the table; a failed call creates
    /// nothing. One inference call per create.
    pub async fn create(&self, image: ImagePayload) -> Result<(SessionId, String), StoreError> {
        let caption = self.gateway.caption(&image).await?;

        let id = SessionId::generate();
        let now = self.clock.now();
        let session = Session::new(id.clone(), image, caption.clone(), now);

        let mut table = self.write_table()?;
        if let Some(cap) = self.config.max_sessions {
            while table.len() >= cap {
                let Some(victim) = Self::idlest(&table) else {
                    break;
                };
                table.remove(&victim);
                warn!(
                    "Session table at capacity ({}), evicted idlest session {}",
                    cap,
                    victim.short()
                );
            }
        }
        table.insert(id.clone(), Arc::new(Mutex::new(session)));
        drop(table);

        info!("Created session {}", id.short());
        Ok((id, caption))
    }

    /// Answer a question within an existing session.
    ///
    /// Holds the per-session lock across the inference call so turns
    /// on one session form a single total order. On inference failure
    /// the history is left exactly as it was; the turn is appended only
    /// after a successful answer.
    pub async fn ask(&self, id: &SessionId, question: &str) -> Result<String, StoreError> {
        let question = Question::new(question).map_err(|_| StoreError::InvalidQuestion)?;

        let slot = self
            .read_table()?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::SessionNotFound(id.to_string()))?;

        let mut session = slot.lock().await;

        // The session may have been evicted between the table lookup
        // and acquiring its lock; a detached session must not answer.
        if !self.read_table()?.contains_key(id) {
            return Err(StoreError::SessionNotFound(id.to_string()));
        }

        session.touch(self.clock.now());

        debug!(
            "Session {}: asking turn {} ({} bytes of image context)",
            id.short(),
            session.history().len() + 1,
            session.image().len()
        );

        let answer = self
            .gateway
            .answer(session.image(), session.history(), &question)
            .await?;

        session.record_turn(
            Turn::new(question.into_content(), answer.clone()),
            self.clock.now(),
        );
        info!(
            "Session {}: history now {} turns",
            id.short(),
            session.history().len()
        );

        Ok(answer)
    }

    /// Explicitly delete a session
    pub fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        let removed = self.write_table()?.remove(id);
        match removed {
            Some(_) => {
                info!("Removed session {}", id.short());
                Ok(())
            }
            None => Err(StoreError::SessionNotFound(id.to_string())),
        }
    }

    /// Evict every session idle past the configured threshold.
    ///
    /// Sessions whose lock is currently held are mid-turn and are
    /// skipped; the next pass will see them with a fresh
    /// `last_accessed`. Returns the number of sessions evicted.
    pub fn evict_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let threshold = chrono::Duration::seconds(self.config.idle_timeout.as_secs() as i64);
        let mut evicted = 0;

        let mut table = self.write_table()?;
        table.retain(|id, slot| match slot.try_lock() {
            Ok(session) => {
                if session.expired(now, threshold) {
                    info!(
                        "Evicting session {} (idle {}s)",
                        id.short(),
                        session.idle_for(now).num_seconds()
                    );
                    evicted += 1;
                    false
                } else {
                    true
                }
            }
            Err(_) => {
                debug!("Session {} busy, skipping eviction", id.short());
                true
            }
        });

        Ok(evicted)
    }

    fn idlest(table: &HashMap<SessionId, SessionSlot>) -> Option<SessionId> {
        table
            .iter()
            .filter_map(|(id, slot)| {
                // A busy session is mid-turn and not an eviction candidate
                slot.try_lock()
                    .ok()
                    .map(|session| (id.clone(), session.last_accessed()))
            })
            .min_by_key(|(_, accessed)| *accessed)
            .map(|(id, _)| id)
    }

    fn read_table(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<SessionId, SessionSlot>>, StoreError> {
        self.sessions
            .read()
            .map_err(|_| StoreError::Internal("session table lock poisoned".to_string()))
    }

    fn write_table(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<SessionId, SessionSlot>>, StoreError> {
        self.sessions
            .write()
            .map_err(|_| StoreError::Internal("session table lock poisoned".to_string()))
    }

    #[cfg(test)]
    pub(crate) async fn history_len(&self, id: &SessionId) -> Option<usize> {
        let slot = self.sessions.read().ok()?.get(id).cloned()?;
        let session = slot.lock().await;
        Some(session.history().len())
    }
}
