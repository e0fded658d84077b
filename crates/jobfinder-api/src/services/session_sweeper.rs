//! Background service that drops expired sessions from the session store.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, info};

use jobfinder_auth::InMemorySessionStore;

/// Interval between sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Expired-session sweeper.
pub struct SessionSweeper {
    sessions: Arc<InMemorySessionStore>,
    enabled: bool,
}

impl SessionSweeper {
    pub fn new(sessions: Arc<InMemorySessionStore>) -> Self {
        let enabled = std::env::var("ENABLE_SESSION_SWEEP")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        Self { sessions, enabled }
    }

    /// Run forever; spawn this as a background task.
    pub async fn run(&self) {
        if !self.enabled {
            info!("Session sweeping is disabled");
            return;
        }

        info!("Starting session sweeper (interval: {:?})", SWEEP_INTERVAL);

        let mut ticker = interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            self.sweep().await;
        }
    }

    /// One pass. Returns how many sessions were removed.
    pub async fn sweep(&self) -> usize {
        let removed = self.sessions.purge_expired().await;
        if removed > 0 {
            info!(removed, "Purged expired sessions");
        } else {
            debug!("No expired sessions");
        }
        crate::metrics::set_active_sessions(self.sessions.active_count().await);
        removed
    }
}
