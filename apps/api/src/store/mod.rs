//! Persistence collaborator. The tailoring core never issues queries itself; everything
//! goes through `ResumeStore`, which has a Postgres adapter and an in-process one.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::improvement::{ImprovementRow, NewImprovement};
use crate::models::job::{JobKeywords, JobRow, NewJob};
use crate::models::resume::{NewResume, ResumeRow, ResumeUpdate};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What to do with master status when a résumé is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterAssignment {
    /// No master exists; the new résumé takes the role.
    Promote,
    /// The current master failed processing; demote it and promote the new résumé.
    ReplaceFailed { demote: Uuid },
    /// A healthy master exists; the new résumé is created as non-master.
    Keep,
}

impl MasterAssignment {
    pub fn new_is_master(&self) -> bool {
        !matches!(self, MasterAssignment::Keep)
    }
}

/// Row counts across the three tables plus whether a master résumé exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_resumes: i64,
    pub total_jobs: i64,
    pub total_improvements: i64,
    pub has_master_resume: bool,
}

/// Narrow persistence interface used by the registry, the orchestrator and handlers.
///
/// `commit_master_assignment` and `promote_master` must each apply all of their writes
/// as one atomic unit: concurrent readers see either the state before or after, never a
/// collection with zero or two masters caused by a half-applied change.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn create_resume(&self, new: NewResume) -> Result<ResumeRow, StoreError>;
    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, StoreError>;
    async fn list_resumes(&self) -> Result<Vec<ResumeRow>, StoreError>;
    async fn update_resume(&self, id: Uuid, update: ResumeUpdate) -> Result<ResumeRow, StoreError>;
    /// Deletes the résumé together with its tailored children, their improvement
    /// records and jobs that reference it. Returns false when nothing was deleted.
    async fn delete_resume(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn get_master_resume(&self) -> Result<Option<ResumeRow>, StoreError>;
    async fn commit_master_assignment(
        &self,
        new: NewResume,
        plan: MasterAssignment,
    ) -> Result<ResumeRow, StoreError>;
    /// Demotes every master and promotes `id`. Returns false, changing nothing, when
    /// `id` does not exist.
    async fn promote_master(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn create_job(&self, new: NewJob) -> Result<JobRow, StoreError>;
    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, StoreError>;
    async fn set_job_keywords(&self, id: Uuid, keywords: &JobKeywords) -> Result<(), StoreError>;

    async fn create_improvement(&self, new: NewImprovement) -> Result<ImprovementRow, StoreError>;
    async fn get_improvement_by_tailored_resume(
        &self,
        tailored_resume_id: Uuid,
    ) -> Result<Option<ImprovementRow>, StoreError>;

    async fn get_stats(&self) -> Result<StoreStats, StoreError>;
}
