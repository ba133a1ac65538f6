//! Periodic expiry sweeper on a tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::core::AllocationManager;

/// Handle to a running sweeper.
pub struct SweeperHandle {
    shutdown: oneshot::Sender<()>,
    join: JoinHandle<usize>,
}

impl SweeperHandle {
    /// Stop the sweeper and return how many resources it released.
    pub async fn shutdown(self) -> usize {
        let _ = self.shutdown.send(());
        match self.join.await {
            Ok(total) => total,
            Err(e) => {
                tracing::error!("expiry sweeper task failed: {}", e);
                0
            }
        }
    }
}

/// Shortest sweep period; shorter intervals are raised to this.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Call [`AllocationManager::expire_allocations`] every `interval` until the
/// returned handle is shut down. Must be called within a tokio runtime.
pub fn spawn_expiry_sweeper(manager: Arc<AllocationManager>, interval: Duration) -> SweeperHandle {
    let interval = if interval < MIN_SWEEP_INTERVAL {
        tracing::warn!(?interval, "sweep interval too short, using {:?}", MIN_SWEEP_INTERVAL);
        MIN_SWEEP_INTERVAL
    } else {
        interval
    };
    let (tx, mut rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut total = 0usize;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    total += manager.expire_allocations().len();
                }
                _ = &mut rx => {
                    tracing::info!(released = total, "expiry sweeper shutting down");
                    break;
                }
            }
        }
        total
    });
    SweeperHandle { shutdown: tx, join }
}
