#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::ConnectInfo;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::mpsc;
use tower_http::set_header::SetResponseHeaderLayer;

use qrlink::api;
use qrlink::api::handlers::{health_handler, resolve_handler};
use qrlink::domain::entities::{ContentKind, NewScan, NewShortLink, ShortLink};
use qrlink::domain::repositories::LinkRepository;
use qrlink::domain::scan_event::ScanEvent;
use qrlink::error::AppError;
use qrlink::state::AppState;

/// In-memory registry fake backing the integration tests.
///
/// Mirrors the PostgreSQL implementation's contract: live-code uniqueness is
/// enforced at insert, deactivation is monotonic, and scan recording applies
/// the event append and the counter bump together or not at all (the
/// `fail_scan_writes` switch rejects both).
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<ShortLink>>,
    scans: Mutex<Vec<(i64, NewScan)>>,
    next_id: AtomicI64,
    pub fail_scan_writes: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            links: Mutex::new(Vec::new()),
            scans: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_scan_writes: AtomicBool::new(false),
        }
    }

    /// Inserts a row directly, bypassing the uniqueness check. For seeding
    /// expired/inactive/text states the creation path never produces.
    pub fn seed(
        &self,
        code: &str,
        content_kind: ContentKind,
        payload: &str,
        expires_at: DateTime<Utc>,
        is_active: bool,
    ) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.links.lock().unwrap().push(ShortLink {
            id,
            code: code.to_string(),
            display_name: format!("QR-{id:03}"),
            content_kind,
            payload: payload.to_string(),
            created_at: Utc::now(),
            expires_at,
            is_active,
            scan_count: 0,
            last_scanned_at: None,
            route_hint: None,
            compact_mode: false,
        });
        id
    }

    /// Newest stored row for a code, active or not.
    pub fn get(&self, code: &str) -> Option<ShortLink> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|l| l.code == code)
            .cloned()
    }

    pub fn link_count(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    pub fn scan_count_of(&self, code: &str) -> i64 {
        self.get(code).map(|l| l.scan_count).unwrap_or(0)
    }

    pub fn recorded_scans(&self) -> usize {
        self.scans.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut links = self.links.lock().unwrap();

        if links.iter().any(|l| l.code == new_link.code && l.is_active) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "code": new_link.code }),
            ));
        }

        let link = ShortLink {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            code: new_link.code,
            display_name: new_link.display_name,
            content_kind: new_link.content_kind,
            payload: new_link.payload,
            created_at: Utc::now(),
            expires_at: new_link.expires_at,
            is_active: true,
            scan_count: 0,
            last_scanned_at: None,
            route_hint: new_link.route_hint,
            compact_mode: new_link.compact_mode,
        };
        links.push(link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.get(code))
    }

    async fn latest_display_name(&self) -> Result<Option<String>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .last()
            .map(|l| l.display_name.clone()))
    }

    async fn list_active(&self) -> Result<Vec<ShortLink>, AppError> {
        let now = Utc::now();
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|l| l.is_active && l.expires_at >= now)
            .cloned()
            .collect())
    }

    async fn deactivate(&self, code: &str) -> Result<bool, AppError> {
        let mut flipped = false;
        for link in self.links.lock().unwrap().iter_mut() {
            if link.code == code && link.is_active {
                link.is_active = false;
                flipped = true;
            }
        }
        Ok(flipped)
    }

    async fn deactivate_expired(&self) -> Result<u64, AppError> {
        let now = Utc::now();
        let mut flipped = 0;
        for link in self.links.lock().unwrap().iter_mut() {
            if link.is_active && link.expires_at < now {
                link.is_active = false;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn record_scan(&self, link_id: i64, scan: NewScan) -> Result<(), AppError> {
        if self.fail_scan_writes.load(Ordering::SeqCst) {
            return Err(AppError::internal("scan store unavailable", json!({})));
        }

        let mut links = self.links.lock().unwrap();
        let link = links
            .iter_mut()
            .find(|l| l.id == link_id)
            .ok_or_else(|| AppError::internal("unknown link id", json!({ "link_id": link_id })))?;

        link.scan_count += 1;
        link.last_scanned_at = Some(scan.scanned_at);
        self.scans.lock().unwrap().push((link_id, scan));

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Injects a fixed peer address, standing in for the real connect info the
/// server attaches at accept time.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> tower::Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Builds application state over the in-memory repository. The returned
/// receiver sees every scan event; pass it to the worker or inspect it
/// directly.
pub fn create_test_state(
    repo: Arc<InMemoryLinkRepository>,
) -> (AppState, mpsc::Receiver<ScanEvent>) {
    let (tx, rx) = mpsc::channel(100);
    (AppState::new(repo, tx), rx)
}

/// Full application router as served in production, minus the listener:
/// API nest, health, resolve fallback, no-store headers, mock connect info.
pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .fallback(resolve_handler)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        ))
        .layer(MockConnectInfoLayer)
}

/// Polls a condition until it holds or a short deadline passes. Used for
/// asserting on the asynchronous scan worker without racing it.
pub async fn wait_until<F: Fn() -> bool>(cond: F) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}
