//! In-memory respondent sessions.
//!
//! Each session owns one [`SurveyFlow`]. Nothing here is persisted: a
//! session ends when the respondent abandons it, when its submission is
//! written, or when it sits idle past the TTL and the sweeper evicts it.

use std::collections::HashMap;
use std::time::Duration;

use flash_core::error::CoreError;
use flash_core::flow::SurveyFlow;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

struct SessionEntry {
    flow: SurveyFlow,
    last_seen: Instant,
}

/// All live respondent sessions, keyed by id.
///
/// Designed to be wrapped in `Arc` and shared across the application.
/// Closures passed to [`SessionStore::update`] run under the write lock and
/// must not await.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Open a new session on the intro screen.
    pub async fn create(&self) -> (Uuid, SurveyFlow) {
        let id = Uuid::new_v4();
        let flow = SurveyFlow::new();
        let entry = SessionEntry {
            flow: flow.clone(),
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        (id, flow)
    }

    /// A copy of the session's current state.
    pub async fn get(&self, id: Uuid) -> Result<SurveyFlow, CoreError> {
        self.update(id, |flow| flow.clone()).await
    }

    /// Run `f` against the session and refresh its idle timer.
    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SurveyFlow) -> R,
    ) -> Result<R, CoreError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        entry.last_seen = Instant::now();
        Ok(f(&mut entry.flow))
    }

    /// Discard a session. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Evict sessions idle for longer than the TTL. Returns how many went.
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.ttl);
        before - sessions.len()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn not_found(id: Uuid) -> CoreError {
    CoreError::NotFound {
        entity: "Session",
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use flash_core::flow::Screen;

    use super::*;

    #[tokio::test]
    async fn create_update_and_remove() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (id, flow) = store.create().await;
        assert_eq!(flow.screen(), Screen::Intro);

        store.update(id, |flow| flow.start()).await.unwrap().unwrap();
        assert_eq!(store.get(id).await.unwrap().screen(), Screen::Survey);

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert_matches!(store.get(id).await, Err(CoreError::NotFound { entity: "Session", .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_evicts_only_idle_sessions() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (idle, _) = store.create().await;
        let (active, _) = store.create().await;

        tokio::time::advance(Duration::from_secs(45)).await;
        store.get(active).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(store.sweep_expired().await, 1);
        assert_eq!(store.count().await, 1);
        assert!(store.get(idle).await.is_err());
        assert!(store.get(active).await.is_ok());
    }
}
