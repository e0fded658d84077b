//! In-process session store.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use jobfinder_models::{Persistence, SessionId};

use crate::error::GatewayResult;
use crate::ports::{Account, ActiveSession, SessionStore};

/// A recorded persistence mode is dropped if no sign-in follows within this window.
const PENDING_TTL: Duration = Duration::from_secs(10 * 60);

/// Server-side lifetime of each persistence mode.
#[derive(Debug, Clone, Copy)]
pub struct SessionTtl {
    pub durable: Duration,
    pub session_scoped: Duration,
}

impl Default for SessionTtl {
    fn default() -> Self {
        Self {
            durable: Duration::from_secs(30 * 24 * 60 * 60),
            session_scoped: Duration::from_secs(12 * 60 * 60),
        }
    }
}

impl SessionTtl {
    pub fn for_persistence(&self, persistence: Persistence) -> Duration {
        match persistence {
            Persistence::Durable => self.durable,
            Persistence::SessionScoped => self.session_scoped,
        }
    }
}

#[derive(Default)]
struct Inner {
    pending: HashMap<SessionId, (Persistence, DateTime<Utc>)>,
    active: HashMap<SessionId, ActiveSession>,
}

/// Sessions held in memory behind a `RwLock`.
///
/// Sessions do not survive a restart; users sign in again.
#[derive(Default)]
pub struct InMemorySessionStore {
    ttl: SessionTtl,
    inner: RwLock<Inner>,
}

impl InMemorySessionStore {
    pub fn new(ttl: SessionTtl) -> Self {
        Self {
            ttl,
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn ttl(&self) -> SessionTtl {
        self.ttl
    }

    /// Drop expired sessions and stale pending entries. Returns how many
    /// sessions were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let pending_cutoff = now - to_chrono(PENDING_TTL);

        let mut inner = self.inner.write().await;
        inner.pending.retain(|_, (_, recorded_at)| *recorded_at > pending_cutoff);

        let before = inner.active.len();
        inner.active.retain(|_, session| session.expires_at > now);
        before - inner.active.len()
    }

    /// Number of live sessions.
    pub async fn active_count(&self) -> usize {
        let now = Utc::now();
        self.inner
            .read()
            .await
            .active
            .values()
            .filter(|s| s.expires_at > now)
            .count()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn set_persistence(&self, session: &SessionId, persistence: Persistence) -> GatewayResult<()> {
        self.inner
            .write()
            .await
            .pending
            .insert(session.clone(), (persistence, Utc::now()));
        Ok(())
    }

    async fn establish(&self, session: &SessionId, account: &Account) -> GatewayResult<ActiveSession> {
        let mut inner = self.inner.write().await;
        let persistence = inner
            .pending
            .remove(session)
            .map(|(p, _)| p)
            .unwrap_or_default();

        let now = Utc::now();
        let active = ActiveSession {
            session_id: session.clone(),
            uid: account.uid.clone(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            persistence,
            established_at: now,
            expires_at: now + to_chrono(self.ttl.for_persistence(persistence)),
        };

        inner.active.insert(session.clone(), active.clone());
        debug!(uid = %account.uid, persistence = %persistence, "Session established");
        Ok(active)
    }

    async fn current(&self, session: &SessionId) -> GatewayResult<Option<ActiveSession>> {
        let inner = self.inner.read().await;
        Ok(inner
            .active
            .get(session)
            .filter(|s| s.expires_at > Utc::now())
            .cloned())
    }

    async fn end(&self, session: &SessionId) -> GatewayResult<()> {
        let mut inner = self.inner.write().await;
        inner.pending.remove(session);
        if let Some(ended) = inner.active.remove(session) {
            debug!(uid = %ended.uid, "Session ended");
        }
        Ok(())
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::days(30))
}
