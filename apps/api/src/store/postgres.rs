use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::improvement::{ImprovementRow, NewImprovement};
use crate::models::job::{JobKeywords, JobRow, NewJob};
use crate::models::resume::{NewResume, ResumeRow, ResumeUpdate};
use crate::store::{MasterAssignment, ResumeStore, StoreError, StoreStats};

/// Postgres-backed store. Assumes the `resumes`, `jobs` and `improvements` tables exist.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

const MAX_CONNECTIONS: u32 = 10;

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and fails fast if the database is unreachable.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        info!("PostgreSQL connection pool established");
        Ok(Self::new(pool))
    }
}

const INSERT_RESUME: &str = r#"
    INSERT INTO resumes
        (id, content, content_type, filename, is_master, is_confirmed, parent_id,
         processed_data, processing_status, cover_letter, outreach_message, title,
         created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
    RETURNING *
"#;

async fn insert_resume(
    tx: &mut Transaction<'_, Postgres>,
    row: ResumeRow,
) -> Result<ResumeRow, StoreError> {
    Ok(sqlx::query_as::<_, ResumeRow>(INSERT_RESUME)
        .bind(row.id)
        .bind(&row.content)
        .bind(&row.content_type)
        .bind(&row.filename)
        .bind(row.is_master)
        .bind(row.is_confirmed)
        .bind(row.parent_id)
        .bind(&row.processed_data)
        .bind(&row.processing_status)
        .bind(&row.cover_letter)
        .bind(&row.outreach_message)
        .bind(&row.title)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&mut **tx)
        .await?)
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn create_resume(&self, new: NewResume) -> Result<ResumeRow, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = insert_resume(&mut tx, new.into_row(false)).await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn update_resume(&self, id: Uuid, update: ResumeUpdate) -> Result<ResumeRow, StoreError> {
        let ResumeUpdate {
            processed_data,
            processing_status,
            cover_letter,
            outreach_message,
            title,
        } = update;

        sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes SET
                processed_data = COALESCE($2, processed_data),
                processing_status = COALESCE($3, processing_status),
                cover_letter = COALESCE($4, cover_letter),
                outreach_message = COALESCE($5, outreach_message),
                title = COALESCE($6, title),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(processed_data)
        .bind(processing_status.map(|s| s.as_str()))
        .bind(cover_letter)
        .bind(outreach_message)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Resume {id}")))
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let child_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM resumes WHERE parent_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query(
            r#"
            DELETE FROM improvements
            WHERE original_resume_id = $1
               OR tailored_resume_id = $1
               OR tailored_resume_id = ANY($2)
            "#,
        )
        .bind(id)
        .bind(&child_ids)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM resumes WHERE parent_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM jobs WHERE resume_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        if deleted > 0 {
            info!("Deleted resume {id} and {} tailored child(ren)", child_ids.len());
        }
        Ok(deleted > 0)
    }

    async fn get_master_resume(&self) -> Result<Option<ResumeRow>, StoreError> {
        let masters = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE is_master = TRUE ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        if masters.len() > 1 {
            warn!(
                "Found {} master resumes; using the most recently updated",
                masters.len()
            );
        }
        Ok(masters.into_iter().next())
    }

    async fn commit_master_assignment(
        &self,
        new: NewResume,
        plan: MasterAssignment,
    ) -> Result<ResumeRow, StoreError> {
        let mut tx = self.pool.begin().await?;

        if let MasterAssignment::ReplaceFailed { demote } = plan {
            sqlx::query("UPDATE resumes SET is_master = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(demote)
                .execute(&mut *tx)
                .await?;
        }

        let row = insert_resume(&mut tx, new.into_row(plan.new_is_master())).await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn promote_master(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE resumes SET is_master = FALSE, updated_at = NOW() WHERE is_master = TRUE AND id <> $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE resumes SET is_master = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn create_job(&self, new: NewJob) -> Result<JobRow, StoreError> {
        let row = new.into_row();
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (id, content, company_name, role, resume_id, job_keywords, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(row.id)
        .bind(&row.content)
        .bind(&row.company_name)
        .bind(&row.role)
        .bind(row.resume_id)
        .bind(&row.job_keywords)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_job_keywords(&self, id: Uuid, keywords: &JobKeywords) -> Result<(), StoreError> {
        let value = serde_json::to_value(keywords)?;
        let updated = sqlx::query(
            "UPDATE jobs SET job_keywords = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(value)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(StoreError::NotFound(format!("Job {id}")));
        }
        Ok(())
    }

    async fn create_improvement(&self, new: NewImprovement) -> Result<ImprovementRow, StoreError> {
        let row = new.into_row();
        Ok(sqlx::query_as::<_, ImprovementRow>(
            r#"
            INSERT INTO improvements
                (id, original_resume_id, tailored_resume_id, job_id, improvements, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(row.id)
        .bind(row.original_resume_id)
        .bind(row.tailored_resume_id)
        .bind(row.job_id)
        .bind(Json(&row.improvements.0))
        .bind(row.created_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_improvement_by_tailored_resume(
        &self,
        tailored_resume_id: Uuid,
    ) -> Result<Option<ImprovementRow>, StoreError> {
        Ok(sqlx::query_as::<_, ImprovementRow>(
            "SELECT * FROM improvements WHERE tailored_resume_id = $1",
        )
        .bind(tailored_resume_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_stats(&self) -> Result<StoreStats, StoreError> {
        let total_resumes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes")
            .fetch_one(&self.pool)
            .await?;
        let total_jobs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        let total_improvements: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM improvements")
            .fetch_one(&self.pool)
            .await?;
        let masters: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE is_master = TRUE")
                .fetch_one(&self.pool)
                .await?;

        Ok(StoreStats {
            total_resumes,
            total_jobs,
            total_improvements,
            has_master_resume: masters > 0,
        })
    }
}
