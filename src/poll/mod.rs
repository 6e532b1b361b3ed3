//! Background poller.
//!
//! Keeps the live server snapshot warm on a fixed interval. Everything else
//! (leaderboards, challenges, digests) refreshes lazily when a request finds
//! its snapshot stale. Poll failures are logged and the loop keeps going.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::{error, info};

use crate::store::{HubStore, Snapshot};
use crate::upstream::StatsApi;

/// Periodic live-state poller.
pub struct Poller {
    api: Arc<dyn StatsApi>,
    store: Arc<RwLock<HubStore>>,
    live_interval: Duration,
}

impl Poller {
    pub fn new(
        api: Arc<dyn StatsApi>,
        store: Arc<RwLock<HubStore>>,
        live_interval: Duration,
    ) -> Self {
        Self {
            api,
            store,
            live_interval,
        }
    }

    /// Run one refresh of the live server snapshot.
    pub async fn poll_once(&self) {
        match self.api.servers().await {
            Ok(servers) => {
                let snapshot = Snapshot::new(servers);
                let mut store = self.store.write().await;
                store.set_servers(snapshot);
                store.record_poll_ok();
            }
            Err(e) => {
                error!("Live server poll failed: {}", e);
                self.store.write().await.record_poll_error(e.to_string());
            }
        }
    }

    /// Poll forever at the configured interval.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = interval(self.live_interval);

        info!("Starting live server poll every {:?}", self.live_interval);

        loop {
            ticker.tick().await;
            self.poll_once().await;
        }
    }
}
