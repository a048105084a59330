use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::repositories::LinkRepository;
use crate::domain::scan_event::ScanEvent;

/// Drains the scan channel and persists each visit through the repository.
///
/// Runs until every sender is dropped. A failed write is logged and dropped;
/// nothing here may surface to the request that produced the event.
pub async fn run_scan_worker(mut rx: mpsc::Receiver<ScanEvent>, links: Arc<dyn LinkRepository>) {
    while let Some(event) = rx.recv().await {
        let (link_id, scan) = event.into_new_scan();

        if let Err(e) = links.record_scan(link_id, scan).await {
            tracing::warn!(link_id, error = %e, "failed to record scan");
        }
    }

    tracing::debug!("scan worker channel closed, exiting");
}
