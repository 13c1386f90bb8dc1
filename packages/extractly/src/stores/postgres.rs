//! PostgreSQL storage implementation.
//!
//! Production backend for extraction records. Status transitions are
//! guarded at the SQL level (`UPDATE ... WHERE processing_status = ...`),
//! so concurrent writers cannot skip or reverse the lifecycle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, Postgres};
use sqlx::{FromRow, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ExtractlyError, Result};
use crate::traits::store::RecordStore;
use crate::types::{
    outcome::FieldExtraction,
    query::{RecordPage, RecordQuery, SortField, SortOrder},
    record::{ExtractionRecord, NewExtractionRecord, ProcessingStatus},
};

/// PostgreSQL-backed record store.
pub struct PostgresStore {
    pool: PgPool,
}

fn storage_err(e: sqlx::Error) -> ExtractlyError {
    ExtractlyError::Storage(e.to_string().into())
}

#[derive(FromRow)]
struct RecordRow {
    id: Uuid,
    url: String,
    instruction: String,
    html_content: String,
    processing_status: String,
    parsed_fields: Option<serde_json::Value>,
    extracted_data: Option<serde_json::Value>,
    confidence_scores: Option<serde_json::Value>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RecordRow> for ExtractionRecord {
    type Error = ExtractlyError;

    fn try_from(row: RecordRow) -> Result<Self> {
        let processing_status = ProcessingStatus::parse(&row.processing_status).ok_or_else(|| {
            ExtractlyError::Storage(
                format!("unknown processing_status: {}", row.processing_status).into(),
            )
        })?;

        Ok(ExtractionRecord {
            id: row.id,
            url: row.url,
            instruction: row.instruction,
            html_content: row.html_content,
            processing_status,
            parsed_fields: row
                .parsed_fields
                .map(serde_json::from_value)
                .transpose()?,
            extracted_data: row
                .extracted_data
                .map(serde_json::from_value)
                .transpose()?,
            confidence_scores: row
                .confidence_scores
                .map(serde_json::from_value)
                .transpose()?,
            error_message: row.error_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given connection URL.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(storage_err)?;
        Self::from_pool(pool).await
    }

    /// Create a store from an existing connection pool.
    ///
    /// Use this when the application already owns a `PgPool`; the store is
    /// constructed and injected at startup rather than held globally.
    pub async fn from_pool(pool: PgPool) -> Result<Self> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Idempotent base schema.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS extraction_records (
                id UUID PRIMARY KEY,
                url TEXT NOT NULL,
                instruction TEXT NOT NULL,
                html_content TEXT NOT NULL,
                processing_status TEXT NOT NULL DEFAULT 'pending',
                parsed_fields JSONB,
                extracted_data JSONB,
                confidence_scores JSONB,
                error_message TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_extraction_records_status \
             ON extraction_records(processing_status)",
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_extraction_records_created_at \
             ON extraction_records(created_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        debug!("extraction_records schema ready");
        Ok(())
    }

    /// Report why a guarded transition matched no rows.
    async fn transition_error(&self, id: Uuid, to: ProcessingStatus) -> ExtractlyError {
        match self.get(id).await {
            Ok(Some(record)) => ExtractlyError::InvalidTransition {
                from: record.processing_status,
                to,
            },
            Ok(None) => ExtractlyError::RecordNotFound { id },
            Err(err) => err,
        }
    }

    fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: &'a RecordQuery) {
        let mut has_where = false;

        if let Some(status) = query.status {
            builder.push(" WHERE processing_status = ");
            builder.push_bind(status.as_str());
            has_where = true;
        }

        if let Some(search) = &query.search {
            builder.push(if has_where { " AND " } else { " WHERE " });
            let pattern = format!("%{}%", search);
            builder.push("(url ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR instruction ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR error_message ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }

    fn sort_column(field: SortField) -> &'static str {
        match field {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Url => "url",
            SortField::ProcessingStatus => "processing_status",
        }
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn create(&self, input: NewExtractionRecord) -> Result<ExtractionRecord> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            INSERT INTO extraction_records (id, url, instruction, html_content, processing_status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.url)
        .bind(&input.instruction)
        .bind(&input.html_content)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        row.try_into()
    }

    async fn mark_processing(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE extraction_records \
             SET processing_status = 'processing', updated_at = now() \
             WHERE id = $1 AND processing_status = 'pending'",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(self.transition_error(id, ProcessingStatus::Processing).await);
        }
        Ok(())
    }

    async fn complete(&self, id: Uuid, fields: &FieldExtraction) -> Result<ExtractionRecord> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            UPDATE extraction_records
            SET processing_status = 'completed',
                parsed_fields = $2,
                extracted_data = $3,
                confidence_scores = $4,
                updated_at = now()
            WHERE id = $1 AND processing_status = 'processing'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(serde_json::to_value(&fields.parsed_fields)?)
        .bind(serde_json::to_value(&fields.extracted)?)
        .bind(serde_json::to_value(&fields.confidence)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        match row {
            Some(row) => row.try_into(),
            None => Err(self.transition_error(id, ProcessingStatus::Completed).await),
        }
    }

    async fn fail(&self, id: Uuid, error_message: &str) -> Result<ExtractionRecord> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            UPDATE extraction_records
            SET processing_status = 'failed',
                error_message = $2,
                updated_at = now()
            WHERE id = $1 AND processing_status = 'processing'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(error_message)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        match row {
            Some(row) => row.try_into(),
            None => Err(self.transition_error(id, ProcessingStatus::Failed).await),
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<ExtractionRecord>> {
        let row = sqlx::query_as::<_, RecordRow>(
            "SELECT * FROM extraction_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.map(ExtractionRecord::try_from).transpose()
    }

    async fn list(&self, query: &RecordQuery) -> Result<RecordPage> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM extraction_records");
        Self::push_filters(&mut count_builder, query);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM extraction_records");
        Self::push_filters(&mut builder, query);

        builder.push(" ORDER BY ");
        builder.push(Self::sort_column(query.sort_by));
        builder.push(match query.sort_order {
            SortOrder::Asc => " ASC",
            SortOrder::Desc => " DESC",
        });
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(query.limit));
        builder.push(" OFFSET ");
        builder.push_bind(query.offset() as i64);

        let rows: Vec<RecordRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        let records = rows
            .into_iter()
            .map(ExtractionRecord::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(RecordPage {
            records,
            total: total as u64,
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM extraction_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
