use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Spawn the background task that keeps WebSocket connections warm.
///
/// Every `interval` the task pings all registered connections so idle
/// sockets are not reaped by proxies and dead peers surface as closed
/// channels. The interval comes from `ServerConfig::ws_heartbeat_secs`;
/// tests pass a short one directly.
///
/// The returned handle is aborted during shutdown.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;
            let count = ws_manager.connection_count().await;
            if count == 0 {
                continue;
            }
            tracing::debug!(count, "Pinging WebSocket connections");
            ws_manager.ping_all().await;
        }
    })
}
