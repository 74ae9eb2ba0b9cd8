//! PostgreSQL-backed candidate source and cache store
//!
//! Used when a database URL is configured. The cache store writes through,
//! so `persist` has nothing left to flush.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;

use hrdash_core::{
    CacheStore, CandidateId, CandidateMetadata, CandidateRecord, CandidateSource, DatabaseConfig,
    HrError, Result, RoleLabel,
};

/// Open a connection pool from configuration
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let url = config
        .postgres_url
        .as_deref()
        .ok_or_else(|| HrError::ConfigError("No database URL configured".to_string()))?;

    PgPoolOptions::new()
        .max_connections(config.pool_size)
        .connect(url)
        .await
        .map_err(|e| HrError::DatabaseError(format!("PostgreSQL connection failed: {e}")))
}

// ============================================================================
// Candidate Source
// ============================================================================

/// Candidate row from database
#[derive(Debug, FromRow)]
struct CandidateRow {
    id: i64,
    submission_time: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    working_status: Option<String>,
    resume_url: Option<String>,
    local_filename: Option<String>,
}

impl From<CandidateRow> for CandidateRecord {
    fn from(row: CandidateRow) -> Self {
        Self {
            id: CandidateId(row.id),
            submission_time: row.submission_time.unwrap_or_default(),
            first_name: row.first_name.unwrap_or_default(),
            last_name: row.last_name.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
            phone: row.phone.unwrap_or_default(),
            working_status: row.working_status.unwrap_or_default(),
            resume_url: row.resume_url.unwrap_or_default(),
            local_filename: row.local_filename.unwrap_or_default(),
        }
    }
}

/// Candidates from the hosted `candidates` table
pub struct PgCandidateSource {
    pool: PgPool,
}

impl PgCandidateSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateSource for PgCandidateSource {
    async fn load(&self) -> Result<Vec<CandidateRecord>> {
        let rows: Vec<CandidateRow> = sqlx::query_as(
            r#"
            SELECT id::BIGINT AS id,
                   submission_time::TEXT AS submission_time,
                   first_name, last_name, email, phone,
                   working_status, resume_url, local_filename
            FROM candidates
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HrError::DatabaseError(format!("Failed to load candidates: {e}")))?;

        Ok(rows.into_iter().map(CandidateRecord::from).collect())
    }

    fn name(&self) -> &str {
        "postgres"
    }
}

// ============================================================================
// Cache Store
// ============================================================================

/// Metadata row from database
#[derive(Debug, FromRow)]
struct MetadataRow {
    role: String,
    skills: Vec<String>,
    locations: Vec<String>,
    languages: Vec<String>,
    resume_text: Option<String>,
}

impl From<MetadataRow> for CandidateMetadata {
    fn from(row: MetadataRow) -> Self {
        Self {
            role: RoleLabel::new(row.role),
            skills: row.skills,
            locations: row.locations,
            languages: row.languages,
            text: row.resume_text,
        }
    }
}

/// Cache entries in the `candidate_metadata` table
pub struct PgCacheStore {
    pool: PgPool,
}

impl PgCacheStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the metadata table if it does not exist
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS candidate_metadata (
                candidate_id TEXT PRIMARY KEY,
                role TEXT NOT NULL,
                skills TEXT[] NOT NULL DEFAULT '{}',
                locations TEXT[] NOT NULL DEFAULT '{}',
                languages TEXT[] NOT NULL DEFAULT '{}',
                resume_text TEXT,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HrError::DatabaseError(format!("Failed to create metadata table: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl CacheStore for PgCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CandidateMetadata>> {
        let row: Option<MetadataRow> = sqlx::query_as(
            r#"
            SELECT role, skills, locations, languages, resume_text
            FROM candidate_metadata
            WHERE candidate_id = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HrError::DatabaseError(format!("Failed to get metadata: {e}")))?;

        Ok(row.map(CandidateMetadata::from))
    }

    async fn put(&self, key: &str, entry: CandidateMetadata) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO candidate_metadata (
                candidate_id, role, skills, locations, languages, resume_text, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (candidate_id) DO UPDATE SET
                role = EXCLUDED.role,
                skills = EXCLUDED.skills,
                locations = EXCLUDED.locations,
                languages = EXCLUDED.languages,
                resume_text = EXCLUDED.resume_text,
                updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(entry.role.as_str())
        .bind(&entry.skills)
        .bind(&entry.locations)
        .bind(&entry.languages)
        .bind(&entry.text)
        .execute(&self.pool)
        .await
        .map_err(|e| HrError::DatabaseError(format!("Failed to store metadata: {e}")))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM candidate_metadata WHERE candidate_id = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| HrError::DatabaseError(format!("Failed to remove metadata: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn persist(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrdash_core::EntityTags;

    #[test]
    fn test_candidate_row_conversion() {
        let row = CandidateRow {
            id: 12,
            submission_time: None,
            first_name: Some("Omar".to_string()),
            last_name: None,
            email: Some("omar@example.com".to_string()),
            phone: None,
            working_status: None,
            resume_url: Some("https://files.test/omar.pdf".to_string()),
            local_filename: Some("omar.pdf".to_string()),
        };

        let record = CandidateRecord::from(row);
        assert_eq!(record.id, CandidateId(12));
        assert_eq!(record.last_name, "");
        assert_eq!(record.local_filename, "omar.pdf");
    }

    #[test]
    fn test_metadata_row_conversion() {
        let row = MetadataRow {
            role: "Unclassified".to_string(),
            skills: vec![],
            locations: vec![],
            languages: vec![],
            resume_text: None,
        };
        assert_eq!(CandidateMetadata::from(row), CandidateMetadata::unextracted());
    }

    #[tokio::test]
    async fn test_connect_requires_url() {
        let err = connect(&DatabaseConfig::default()).await.unwrap_err();
        assert!(matches!(err, HrError::ConfigError(_)));
    }

    /// Needs `DATABASE_URL` pointing at a scratch database
    #[tokio::test]
    #[ignore]
    async fn test_cache_store_round_trip() {
        let config = DatabaseConfig {
            postgres_url: std::env::var("DATABASE_URL").ok(),
            ..Default::default()
        };
        let store = PgCacheStore::new(connect(&config).await.unwrap());
        store.ensure_schema().await.unwrap();

        let entry = CandidateMetadata::extracted(
            "Python and AWS",
            RoleLabel::new("Junior Software Engineer"),
            EntityTags {
                skills: vec!["Python".to_string(), "AWS".to_string()],
                ..Default::default()
            },
        );

        store.put("pg-test", entry.clone()).await.unwrap();
        assert_eq!(store.get("pg-test").await.unwrap(), Some(entry));
        assert!(store.remove("pg-test").await.unwrap());
        assert!(store.get("pg-test").await.unwrap().is_none());
    }
}
