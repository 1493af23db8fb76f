use crate::Desk;
use crate::Store;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawns the periodic task that opens caster windows and starts drafts
/// once their time has come.
pub fn sweep(desk: Arc<Desk<Store>>, window: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        log::info!("[sweeper] every {:?}, caster window {:?}", duel_core::SWEEP_INTERVAL, window);
        let mut ticker = tokio::time::interval(duel_core::SWEEP_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match desk.sweep(Utc::now(), window).await {
                Ok(0) => {}
                Ok(n) => log::info!("[sweeper] advanced {} matches", n),
                Err(e) => log::error!("[sweeper] {}", e),
            }
        }
    })
}
