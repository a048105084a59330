use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{LinkService, RedirectService};
use crate::domain::repositories::LinkRepository;
use crate::domain::scan_event::ScanEvent;

/// Shared application state injected into every handler.
///
/// The repository is an explicitly passed dependency, never a module-level
/// singleton, so tests can substitute an in-memory fake.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub links: Arc<dyn LinkRepository>,
}

impl AppState {
    pub fn new(links: Arc<dyn LinkRepository>, scan_tx: mpsc::Sender<ScanEvent>) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(links.clone())),
            redirect_service: Arc::new(RedirectService::new(links.clone(), scan_tx)),
            links,
        }
    }
}
