//! Repository trait for short link data access.

use crate::domain::entities::{NewScan, NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage interface for the short-link registry.
///
/// Uniqueness of live codes is a storage concern: [`Self::insert`] reports a
/// collision as [`AppError::Conflict`] (backed by a partial unique index on
/// active rows), and callers retry allocation on conflict rather than
/// pre-checking.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`; integration tests use an
///   in-memory fake (`tests/common`)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a fully-populated new entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the code collides with a live row,
    /// [`AppError::Internal`] on other storage errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Exact-match lookup; the newest row wins when a code has been reused.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Display name of the most recently created entry, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn latest_display_name(&self) -> Result<Option<String>, AppError>;

    /// Active, unexpired entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_active(&self) -> Result<Vec<ShortLink>, AppError>;

    /// Idempotently sets `is_active = false` for the code.
    ///
    /// Returns `true` if a live row was flipped, `false` if there was nothing
    /// to do. Rows are never hard-deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn deactivate(&self, code: &str) -> Result<bool, AppError>;

    /// Inline maintenance sweep: flips `is_active` to false on every entry
    /// whose expiry has elapsed. Returns the number of rows flipped.
    ///
    /// Safe to run concurrently; it only ever moves rows active -> inactive.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn deactivate_expired(&self) -> Result<u64, AppError>;

    /// Appends a scan event and bumps `scan_count` / `last_scanned_at` on the
    /// owning entry, atomically: both happen or neither does.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors. Callers on the
    /// resolution path must contain this error (see the scan worker).
    async fn record_scan(&self, link_id: i64, scan: NewScan) -> Result<(), AppError>;

    /// Storage connectivity probe for the health endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the store is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
