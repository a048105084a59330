//! Scan event model for asynchronous visit tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewScan;

/// An in-memory scan event passed from the resolution path to the background
/// worker via a channel, so the redirect response never waits on the write.
///
/// Carries the owning link id plus the client metadata captured at resolution
/// time. Converted to [`NewScan`] (which applies the column bounds) when the
/// worker persists it.
#[derive(Debug, Clone)]
pub struct ScanEvent {
    pub link_id: i64,
    pub user_agent: Option<String>,
    pub source_address: Option<String>,
    pub is_restrictive: bool,
    pub scanned_at: DateTime<Utc>,
}

impl ScanEvent {
    pub fn new(
        link_id: i64,
        user_agent: Option<&str>,
        source_address: Option<String>,
        is_restrictive: bool,
    ) -> Self {
        Self {
            link_id,
            user_agent: user_agent.map(|s| s.to_string()),
            source_address,
            is_restrictive,
            scanned_at: Utc::now(),
        }
    }

    pub fn into_new_scan(self) -> (i64, NewScan) {
        (
            self.link_id,
            NewScan::new(
                self.user_agent,
                self.source_address,
                self.is_restrictive,
                self.scanned_at,
            ),
        )
    }
}
