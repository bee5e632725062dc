use std::time::Duration;

use tracing::{info, warn};

use banter_api::auth::AppState;

/// Background task that purges expired sessions.
///
/// Expired sessions are already rejected on lookup; this only keeps the
/// `sessions` table from growing without bound.
pub async fn run_session_sweep(state: AppState, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        let db_state = state.clone();
        let result = tokio::task::spawn_blocking(move || db_state.db.purge_expired_sessions()).await;

        match result {
            Ok(Ok(count)) => {
                if count > 0 {
                    info!("Cleanup: purged {} expired sessions", count);
                }
            }
            Ok(Err(e)) => warn!("Cleanup error: {}", e),
            Err(e) => warn!("Cleanup task join error: {}", e),
        }
    }
}
