use std::time::Duration;

use anyhow::Result;
use inbox_center::{NotificationCenter, Toggle};
use inbox_common::CenterConfig;
use rand::seq::IndexedRandom;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("inbox=info".parse()?))
        .init();

    info!("Notification center demo starting...");

    let config = CenterConfig::from_env()?;
    config.log_summary();

    let mut center = NotificationCenter::start(&config);
    let deadline = tokio::time::Instant::now() + config.run_for;
    let mut ticker = tokio::time::interval(Duration::from_secs(2));
    let mut pending = Vec::new();

    while tokio::time::Instant::now() < deadline {
        ticker.tick().await;

        // Simulated user click on a random notification.
        let picked = center
            .state()
            .notifications
            .choose(&mut rand::rng())
            .map(|n| n.id.clone());
        if let Some(id) = picked {
            if let Toggle::Pending(task) = center.toggle_read(&id).await? {
                pending.push(task);
            }
        }

        let state = center.state();
        let view = center.page_view();
        info!(
            page = view.page + 1,
            pages = view.page_count,
            groups = view.groups.len(),
            total = state.notifications.len(),
            unread = state.unread_count(),
            "Inbox snapshot"
        );
        debug!(view = %serde_json::to_string(&view)?, "Page view");
    }

    for task in pending {
        task.await??;
    }

    let delivered = center.shutdown().await;
    info!(delivered, "Demo complete");
    Ok(())
}
