//! # Sweeper
//!
//! Optional background task that purges expired baskets on a fixed interval.
//!
//! Lazy eviction alone is enough for correctness: an expired basket is
//! unreachable whether or not it has been swept. The sweeper only bounds
//! memory held by baskets nobody comes back to.
//!
//! ```text
//! spawn(store, every)
//!      │
//!      ▼
//! ┌──────────── loop ────────────┐
//! │ select!                      │
//! │   ticker.tick()  ─► purge    │
//! │   shutdown_rx    ─► break    │
//! └──────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::store::BasketStore;

/// Spawns sweep tasks.
pub struct BasketSweeper;

/// Handle for stopping a running sweeper.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl BasketSweeper {
    /// Starts sweeping `store` every `every`.
    ///
    /// Must be called from within a tokio runtime. The first sweep happens
    /// one full interval after spawning.
    pub fn spawn(store: Arc<BasketStore>, every: Duration) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            info!(interval_ms = every.as_millis() as u64, "Basket sweeper started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let purged = store.purge_expired();
                        if purged > 0 {
                            debug!(purged, remaining = store.len(), "Swept expired baskets");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Basket sweeper shutting down");
                        break;
                    }
                }
            }
        });

        SweeperHandle { shutdown_tx, task }
    }
}

impl SweeperHandle {
    /// Stops the sweeper and waits for the task to finish.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        // A send error means the task already exited; joining still reports how.
        let _ = self.shutdown_tx.send(()).await;
        self.task.await
    }
}
