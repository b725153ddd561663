use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::SessionRegistry;

/// Spawn the periodic expiry sweep.
///
/// The sweep runs on a fixed cadence regardless of request traffic. The
/// returned handle is owned by the process lifecycle; aborting it at
/// shutdown stops the sweep.
pub fn spawn_sweeper(
    registry: Arc<SessionRegistry>,
    interval: Duration,
    ttl: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; an empty registry makes it a no-op.
        loop {
            ticker.tick().await;
            let swept = registry.sweep_expired(Instant::now(), ttl);
            if swept > 0 {
                info!("Swept {} expired sessions ({} remain)", swept, registry.len());
            }
        }
    })
}
