//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ContentKind, NewScan, NewShortLink, RouteStyle, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const SHORT_LINK_COLUMNS: &str = "id, code, display_name, content_kind, payload, created_at, \
     expires_at, is_active, scan_count, last_scanned_at, route_hint, compact_mode";

/// PostgreSQL repository for short links and scan events.
///
/// Live-code uniqueness is enforced by a partial unique index on
/// `short_links(code) WHERE is_active`; an insert conflict surfaces as
/// [`AppError::Conflict`] and is the allocator's retry signal.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    id: i64,
    code: String,
    display_name: String,
    content_kind: String,
    payload: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    is_active: bool,
    scan_count: i64,
    last_scanned_at: Option<DateTime<Utc>>,
    route_hint: Option<String>,
    compact_mode: bool,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        ShortLink {
            id: row.id,
            code: row.code,
            display_name: row.display_name,
            content_kind: ContentKind::from_tag(&row.content_kind),
            payload: row.payload,
            created_at: row.created_at,
            expires_at: row.expires_at,
            is_active: row.is_active,
            scan_count: row.scan_count,
            last_scanned_at: row.last_scanned_at,
            route_hint: row.route_hint.as_deref().and_then(RouteStyle::from_tag),
            compact_mode: row.compact_mode,
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let sql = format!(
            "INSERT INTO short_links \
                 (code, display_name, content_kind, payload, expires_at, route_hint, compact_mode) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {SHORT_LINK_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ShortLinkRow>(&sql)
            .bind(&new_link.code)
            .bind(&new_link.display_name)
            .bind(new_link.content_kind.as_str())
            .bind(&new_link.payload)
            .bind(new_link.expires_at)
            .bind(new_link.route_hint.map(|r| r.as_str()))
            .bind(new_link.compact_mode)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let sql = format!(
            "SELECT {SHORT_LINK_COLUMNS} FROM short_links \
             WHERE code = $1 \
             ORDER BY created_at DESC \
             LIMIT 1"
        );

        let row = sqlx::query_as::<_, ShortLinkRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn latest_display_name(&self) -> Result<Option<String>, AppError> {
        let name = sqlx::query_scalar::<_, String>(
            "SELECT display_name FROM short_links ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(name)
    }

    async fn list_active(&self) -> Result<Vec<ShortLink>, AppError> {
        let sql = format!(
            "SELECT {SHORT_LINK_COLUMNS} FROM short_links \
             WHERE is_active AND expires_at >= NOW() \
             ORDER BY created_at DESC"
        );

        let rows = sqlx::query_as::<_, ShortLinkRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn deactivate(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE short_links SET is_active = FALSE WHERE code = $1 AND is_active",
        )
        .bind(code)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn deactivate_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE short_links SET is_active = FALSE WHERE is_active AND expires_at < NOW()",
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn record_scan(&self, link_id: i64, scan: NewScan) -> Result<(), AppError> {
        // Event append and counter bump commit together or not at all.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO scan_events \
                 (short_link_id, user_agent, source_address, is_restrictive, scanned_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(link_id)
        .bind(&scan.user_agent)
        .bind(&scan.source_address)
        .bind(scan.is_restrictive)
        .bind(scan.scanned_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE short_links SET scan_count = scan_count + 1, last_scanned_at = $2 \
             WHERE id = $1",
        )
        .bind(link_id)
        .bind(scan.scanned_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
