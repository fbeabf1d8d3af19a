use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::info;

use sentra_model::{BusinessFinding, FindingId, Scan, ScanId};

use crate::error::{Result, ScanError};

use super::ScanStore;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS scans (
    id UUID PRIMARY KEY,
    target_domain VARCHAR(255) NOT NULL,
    status VARCHAR(50) NOT NULL,
    started_at TIMESTAMPTZ,
    completed_at TIMESTAMPTZ,
    error TEXT,
    findings_count BIGINT,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS findings (
    id UUID PRIMARY KEY,
    scan_id UUID NOT NULL REFERENCES scans(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    risk_type VARCHAR(50) NOT NULL,
    priority VARCHAR(50) NOT NULL,
    business_description TEXT NOT NULL,
    business_impact JSONB NOT NULL,
    actions JSONB NOT NULL,
    technical JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scans_status ON scans(status);
CREATE INDEX IF NOT EXISTS idx_scans_created_at ON scans(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_findings_scan_id ON findings(scan_id);
CREATE INDEX IF NOT EXISTS idx_findings_priority ON findings(priority);
"#;

/// Postgres-backed scan store.
#[derive(Clone)]
pub struct PostgresScanStore {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresScanStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresScanStore")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

impl PostgresScanStore {
    /// Create a store and verify database health.
    pub async fn new(pool: PgPool) -> Result<Self> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| ScanError::Persistence(format!("Postgres health check failed: {e}")))?;
        info!("scan store connected to Postgres");
        Ok(Self { pool })
    }

    /// Idempotent schema bootstrap, run once at startup.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    fn scan_from_row(row: &sqlx::postgres::PgRow) -> Result<Scan> {
        let status: String = row.try_get("status")?;
        Ok(Scan {
            id: ScanId(row.try_get("id")?),
            target_domain: row.try_get("target_domain")?,
            status: status.parse()?,
            started_at: row.try_get("started_at")?,
            completed_at: row.try_get("completed_at")?,
            error: row.try_get("error")?,
            findings_count: row.try_get("findings_count")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn finding_from_row(row: &sqlx::postgres::PgRow) -> Result<BusinessFinding> {
        let risk_type: String = row.try_get("risk_type")?;
        let priority: String = row.try_get("priority")?;
        let business_impact: serde_json::Value = row.try_get("business_impact")?;
        let actions: serde_json::Value = row.try_get("actions")?;
        let technical: serde_json::Value = row.try_get("technical")?;
        Ok(BusinessFinding {
            id: FindingId(row.try_get("id")?),
            scan_id: ScanId(row.try_get("scan_id")?),
            risk_type: risk_type.parse()?,
            priority: priority.parse()?,
            business_description: row.try_get("business_description")?,
            business_impact: serde_json::from_value(business_impact)?,
            actions: serde_json::from_value(actions)?,
            technical: serde_json::from_value(technical)?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ScanStore for PostgresScanStore {
    async fn insert_scan(&self, scan: &Scan) -> Result<()> {
        sqlx::query(
            "INSERT INTO scans (id, target_domain, status, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(scan.id.to_uuid())
        .bind(&scan.target_domain)
        .bind(scan.status.as_str())
        .bind(scan.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn scan(&self, id: ScanId) -> Result<Option<Scan>> {
        let row = sqlx::query("SELECT * FROM scans WHERE id = $1")
            .bind(id.to_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::scan_from_row).transpose()
    }

    async fn list_scans(&self, limit: i64, offset: i64) -> Result<Vec<Scan>> {
        let rows =
            sqlx::query("SELECT * FROM scans ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(Self::scan_from_row).collect()
    }

    async fn mark_running(&self, id: ScanId, started_at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE scans SET status = 'RUNNING', started_at = $2 \
             WHERE id = $1 AND status = 'PENDING'",
        )
        .bind(id.to_uuid())
        .bind(started_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn mark_completed(
        &self,
        id: ScanId,
        completed_at: DateTime<Utc>,
        findings_count: i64,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE scans SET status = 'COMPLETED', completed_at = $2, findings_count = $3 \
             WHERE id = $1",
        )
        .bind(id.to_uuid())
        .bind(completed_at)
        .bind(findings_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: ScanId,
        completed_at: DateTime<Utc>,
        error: &str,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE scans SET status = 'FAILED', completed_at = $2, error = $3 WHERE id = $1",
        )
        .bind(id.to_uuid())
        .bind(completed_at)
        .bind(error)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_findings(&self, findings: &[BusinessFinding]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (position, finding) in findings.iter().enumerate() {
            sqlx::query(
                "INSERT INTO findings (id, scan_id, position, risk_type, priority, \
                 business_description, business_impact, actions, technical, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(finding.id.to_uuid())
            .bind(finding.scan_id.to_uuid())
            .bind(position as i32)
            .bind(finding.risk_type.as_str())
            .bind(finding.priority.as_str())
            .bind(&finding.business_description)
            .bind(serde_json::to_value(&finding.business_impact)?)
            .bind(serde_json::to_value(&finding.actions)?)
            .bind(serde_json::to_value(&finding.technical)?)
            .bind(finding.created_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn findings_for_scan(&self, id: ScanId) -> Result<Vec<BusinessFinding>> {
        let rows = sqlx::query("SELECT * FROM findings WHERE scan_id = $1 ORDER BY position")
            .bind(id.to_uuid())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::finding_from_row).collect()
    }
}
