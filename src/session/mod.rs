//! Sessions - one isolated interaction context per browser.
//!
//! Each session owns an [`InteractionController`] with its own input buffer
//! and task store. The predictor and developer table are the only shared
//! state, and both are read-only.

mod controller;

pub use controller::{
    AnalyzeOutcome, InteractionController, TaskLogEntry, View, EMPTY_INPUT_WARNING,
};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::assignment::SharedDeveloperDirectory;
use crate::model::PredictorRef;

/// Controller handle. The mutex serializes interactions within a session.
pub type SharedController = Arc<Mutex<InteractionController>>;

struct SessionEntry {
    controller: SharedController,
    last_seen: Instant,
}

/// Session handle returned by [`SessionRegistry::open`].
#[derive(Clone)]
pub struct Session {
    pub id: Uuid,
    pub controller: SharedController,
    /// True when this call created the session
    pub created: bool,
}

/// Owns every live session.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    predictor: PredictorRef,
    developers: SharedDeveloperDirectory,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(
        predictor: PredictorRef,
        developers: SharedDeveloperDirectory,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            predictor,
            developers,
            idle_timeout,
        }
    }

    /// Resume session `id`, or start a new one when `id` is absent or unknown.
    pub async fn open(&self, id: Option<Uuid>) -> Session {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                if now.duration_since(entry.last_seen) <= self.idle_timeout {
                    entry.last_seen = now;
                    return Session {
                        id,
                        controller: Arc::clone(&entry.controller),
                        created: false,
                    };
                }
            }
        }

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.idle_timeout);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::info!("Pruned {} idle sessions", pruned);
        }

        let id = Uuid::new_v4();
        let controller = Arc::new(Mutex::new(InteractionController::new(
            Arc::clone(&self.predictor),
            Arc::clone(&self.developers),
        )));
        sessions.insert(
            id,
            SessionEntry {
                controller: Arc::clone(&controller),
                last_seen: now,
            },
        );
        tracing::debug!(session = %id, active = sessions.len(), "Session started");

        Session {
            id,
            controller,
            created: true,
        }
    }

    /// Destroy a session and everything it recorded.
    pub async fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(session = %id, "Session ended");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::DeveloperDirectory;
    use crate::testing::StubPredictor;

    fn registry(idle_timeout: Duration) -> SessionRegistry {
        SessionRegistry::new(
            StubPredictor::new("Platform", "High"),
            Arc::new(DeveloperDirectory::default()),
            idle_timeout,
        )
    }

    #[tokio::test]
    async fn test_open_creates_then_resumes() {
        let registry = registry(Duration::from_secs(60));

        let first = registry.open(None).await;
        assert!(first.created);

        let again = registry.open(Some(first.id)).await;
        assert!(!again.created);
        assert_eq!(again.id, first.id);
        assert!(Arc::ptr_eq(&again.controller, &first.controller));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_gets_fresh_session() {
        let registry = registry(Duration::from_secs(60));
        let stale = Uuid::new_v4();

        let session = registry.open(Some(stale)).await;

        assert!(session.created);
        assert_ne!(session.id, stale);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = registry(Duration::from_secs(60));
        let alice = registry.open(None).await;
        let bob = registry.open(None).await;

        {
            let mut controller = alice.controller.lock().await;
            controller.set_input("Alice's task");
            controller.analyze().unwrap();
        }

        let bob_controller = bob.controller.lock().await;
        assert!(bob_controller.store().is_empty());
        assert_eq!(bob_controller.input(), "");
        drop(bob_controller);

        assert_eq!(alice.controller.lock().await.store().len(), 1);
    }

    #[tokio::test]
    async fn test_end_discards_tasks() {
        let registry = registry(Duration::from_secs(60));
        let session = registry.open(None).await;
        {
            let mut controller = session.controller.lock().await;
            controller.set_input("something");
            controller.analyze().unwrap();
        }

        assert!(registry.end(session.id).await);
        assert!(!registry.end(session.id).await);

        let reopened = registry.open(Some(session.id)).await;
        assert!(reopened.created);
        assert!(reopened.controller.lock().await.store().is_empty());
    }

    #[tokio::test]
    async fn test_idle_sessions_pruned() {
        let registry = registry(Duration::ZERO);
        let old = registry.open(None).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let resumed = registry.open(Some(old.id)).await;

        assert!(resumed.created);
        assert_eq!(registry.len().await, 1);
    }
}
