use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::improvement::{ImprovementRow, NewImprovement};
use crate::models::job::{JobKeywords, JobRow, NewJob};
use crate::models::resume::{NewResume, ResumeRow, ResumeUpdate};
use crate::store::{MasterAssignment, ResumeStore, StoreError, StoreStats};

#[derive(Default)]
struct Tables {
    resumes: Vec<ResumeRow>,
    jobs: Vec<JobRow>,
    improvements: Vec<ImprovementRow>,
}

/// In-process store. Every write runs under one write guard, so multi-row changes are
/// atomic with respect to readers.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn create_resume(&self, new: NewResume) -> Result<ResumeRow, StoreError> {
        let row = new.into_row(false);
        self.tables.write().await.resumes.push(row.clone());
        Ok(row)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.resumes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeRow>, StoreError> {
        Ok(self.tables.read().await.resumes.clone())
    }

    async fn update_resume(&self, id: Uuid, update: ResumeUpdate) -> Result<ResumeRow, StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .resumes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Resume {id}")))?;
        update.apply_to(row);
        Ok(row.clone())
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.resumes.iter().any(|r| r.id == id) {
            return Ok(false);
        }

        let mut doomed: Vec<Uuid> = tables
            .resumes
            .iter()
            .filter(|r| r.parent_id == Some(id))
            .map(|r| r.id)
            .collect();
        doomed.push(id);

        tables.improvements.retain(|imp| {
            !doomed.contains(&imp.original_resume_id) && !doomed.contains(&imp.tailored_resume_id)
        });
        tables.jobs.retain(|job| job.resume_id != Some(id));
        tables.resumes.retain(|r| !doomed.contains(&r.id));

        info!("Deleted resume {id} and {} tailored child(ren)", doomed.len() - 1);
        Ok(true)
    }

    async fn get_master_resume(&self) -> Result<Option<ResumeRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.resumes.iter().find(|r| r.is_master).cloned())
    }

    async fn commit_master_assignment(
        &self,
        new: NewResume,
        plan: MasterAssignment,
    ) -> Result<ResumeRow, StoreError> {
        let mut tables = self.tables.write().await;
        if let MasterAssignment::ReplaceFailed { demote } = plan {
            if let Some(old) = tables.resumes.iter_mut().find(|r| r.id == demote) {
                old.is_master = false;
                old.updated_at = Utc::now();
            }
        }
        let row = new.into_row(plan.new_is_master());
        tables.resumes.push(row.clone());
        Ok(row)
    }

    async fn promote_master(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.resumes.iter().any(|r| r.id == id) {
            return Ok(false);
        }
        let now = Utc::now();
        for row in tables.resumes.iter_mut() {
            let should_be_master = row.id == id;
            if row.is_master != should_be_master {
                row.is_master = should_be_master;
                row.updated_at = now;
            }
        }
        Ok(true)
    }

    async fn create_job(&self, new: NewJob) -> Result<JobRow, StoreError> {
        let row = new.into_row();
        self.tables.write().await.jobs.push(row.clone());
        Ok(row)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn set_job_keywords(&self, id: Uuid, keywords: &JobKeywords) -> Result<(), StoreError> {
        let value = serde_json::to_value(keywords)?;
        let mut tables = self.tables.write().await;
        let job = tables
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Job {id}")))?;
        job.job_keywords = Some(value);
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn create_improvement(&self, new: NewImprovement) -> Result<ImprovementRow, StoreError> {
        let row = new.into_row();
        self.tables.write().await.improvements.push(row.clone());
        Ok(row)
    }

    async fn get_improvement_by_tailored_resume(
        &self,
        tailored_resume_id: Uuid,
    ) -> Result<Option<ImprovementRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .improvements
            .iter()
            .find(|imp| imp.tailored_resume_id == tailored_resume_id)
            .cloned())
    }

    async fn get_stats(&self) -> Result<StoreStats, StoreError> {
        let tables = self.tables.read().await;
        Ok(StoreStats {
            total_resumes: tables.resumes.len() as i64,
            total_jobs: tables.jobs.len() as i64,
            total_improvements: tables.improvements.len() as i64,
            has_master_resume: tables.resumes.iter().any(|r| r.is_master),
        })
    }
}
