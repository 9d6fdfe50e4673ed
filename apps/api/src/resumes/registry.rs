//! Master Résumé Registry: keeps at most one résumé marked as master.
//!
//! One registry-wide lock serializes every operation that reads the current master,
//! decides, and writes. The writes themselves go through the store's atomic operations,
//! so readers that skip the lock still only see committed states.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::resume::{NewResume, ProcessingStatus, ResumeRow, ResumeUpdate};
use crate::store::{MasterAssignment, ResumeStore, StoreError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Resume {0} not found")]
    NotFound(Uuid),

    #[error("Cannot move resume from '{from}' to '{to}'")]
    InvalidTransition {
        from: ProcessingStatus,
        to: ProcessingStatus,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct MasterRegistry {
    store: Arc<dyn ResumeStore>,
    lock: Mutex<()>,
}

impl MasterRegistry {
    pub fn new(store: Arc<dyn ResumeStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Decides master status for a résumé about to be created, given the current master.
    pub fn plan_assignment(current: Option<&ResumeRow>) -> MasterAssignment {
        match current {
            None => MasterAssignment::Promote,
            Some(master) if master.status() == ProcessingStatus::Failed => {
                MasterAssignment::ReplaceFailed { demote: master.id }
            }
            Some(_) => MasterAssignment::Keep,
        }
    }

    /// Creates a résumé, making it master when there is none or when the current master
    /// failed processing. No other creation interleaves between lookup and commit.
    pub async fn create_with_master_assignment(
        &self,
        new: NewResume,
    ) -> Result<ResumeRow, RegistryError> {
        let _guard = self.lock.lock().await;

        let current = self.store.get_master_resume().await?;
        let plan = Self::plan_assignment(current.as_ref());
        if let MasterAssignment::ReplaceFailed { demote } = plan {
            warn!("Master resume {demote} failed processing; demoting it");
        }

        let row = self.store.commit_master_assignment(new, plan).await?;
        info!("Created resume {} (master: {})", row.id, row.is_master);
        Ok(row)
    }

    /// Makes `id` the master, demoting any other. An unknown id changes nothing.
    pub async fn set_master(&self, id: Uuid) -> Result<ResumeRow, RegistryError> {
        let _guard = self.lock.lock().await;

        if !self.store.promote_master(id).await? {
            return Err(RegistryError::NotFound(id));
        }
        info!("Resume {id} is now the master resume");

        self.store
            .get_resume(id)
            .await?
            .ok_or(RegistryError::NotFound(id))
    }

    /// Read-only lookup; relies on the store's committed view rather than the lock.
    pub async fn current_master(&self) -> Result<Option<ResumeRow>, RegistryError> {
        Ok(self.store.get_master_resume().await?)
    }

    /// Moves a résumé along its processing lifecycle. Runs under the registry lock since a
    /// master entering `failed` changes the next creation's outcome.
    pub async fn transition_status(
        &self,
        id: Uuid,
        next: ProcessingStatus,
    ) -> Result<ResumeRow, RegistryError> {
        let _guard = self.lock.lock().await;

        let row = self
            .store
            .get_resume(id)
            .await?
            .ok_or(RegistryError::NotFound(id))?;
        let current = row.status();
        if !current.can_transition_to(next) {
            return Err(RegistryError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        let updated = self
            .store
            .update_resume(
                id,
                ResumeUpdate {
                    processing_status: Some(next),
                    ..Default::default()
                },
            )
            .await?;
        info!("Resume {id}: {current} -> {next}");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn registry() -> (Arc<MemoryStore>, MasterRegistry) {
        let store = Arc::new(MemoryStore::new());
        let registry = MasterRegistry::new(store.clone());
        (store, registry)
    }

    async fn master_count(store: &MemoryStore) -> usize {
        store
            .list_resumes()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.is_master)
            .count()
    }

    async fn fail(registry: &MasterRegistry, id: Uuid) {
        registry
            .transition_status(id, ProcessingStatus::Failed)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_first_creation_becomes_master_second_does_not() {
        let (store, registry) = registry();
        let first = registry
            .create_with_master_assignment(NewResume::from_content("# One"))
            .await
            .unwrap();
        let second = registry
            .create_with_master_assignment(NewResume::from_content("# Two"))
            .await
            .unwrap();

        assert!(first.is_master);
        assert!(!second.is_master);
        assert_eq!(master_count(&store).await, 1);
    }

    #[tokio::test]
    async fn test_failed_master_is_replaced_by_next_creation() {
        let (store, registry) = registry();
        let first = registry
            .create_with_master_assignment(NewResume::from_content("# One"))
            .await
            .unwrap();
        registry
            .create_with_master_assignment(NewResume::from_content("# Two"))
            .await
            .unwrap();
        fail(&registry, first.id).await;

        let third = registry
            .create_with_master_assignment(NewResume::from_content("# Three"))
            .await
            .unwrap();

        assert!(third.is_master);
        let first = store.get_resume(first.id).await.unwrap().unwrap();
        assert!(!first.is_master);
        assert_eq!(master_count(&store).await, 1);
        assert_eq!(
            registry.current_master().await.unwrap().unwrap().id,
            third.id
        );
    }

    #[tokio::test]
    async fn test_healthy_master_in_processing_is_kept() {
        let (_, registry) = registry();
        let first = registry
            .create_with_master_assignment(NewResume::from_content("# One"))
            .await
            .unwrap();
        registry
            .transition_status(first.id, ProcessingStatus::Processing)
            .await
            .unwrap();

        let second = registry
            .create_with_master_assignment(NewResume::from_content("# Two"))
            .await
            .unwrap();
        assert!(!second.is_master);
    }

    #[tokio::test]
    async fn test_set_master_moves_the_role() {
        let (store, registry) = registry();
        let first = registry
            .create_with_master_assignment(NewResume::from_content("# One"))
            .await
            .unwrap();
        let second = registry
            .create_with_master_assignment(NewResume::from_content("# Two"))
            .await
            .unwrap();

        let promoted = registry.set_master(second.id).await.unwrap();
        assert!(promoted.is_master);
        assert!(!store.get_resume(first.id).await.unwrap().unwrap().is_master);
        assert_eq!(master_count(&store).await, 1);
    }

    #[tokio::test]
    async fn test_set_master_unknown_id_leaves_master_unchanged() {
        let (store, registry) = registry();
        let first = registry
            .create_with_master_assignment(NewResume::from_content("# One"))
            .await
            .unwrap();

        let missing = Uuid::new_v4();
        let result = registry.set_master(missing).await;
        assert!(matches!(result, Err(RegistryError::NotFound(id)) if id == missing));

        let master = registry.current_master().await.unwrap().unwrap();
        assert_eq!(master.id, first.id);
        assert_eq!(master_count(&store).await, 1);
    }

    #[tokio::test]
    async fn test_invalid_transition_is_rejected() {
        let (_, registry) = registry();
        let row = registry
            .create_with_master_assignment(NewResume::from_content("# One"))
            .await
            .unwrap();

        let result = registry
            .transition_status(row.id, ProcessingStatus::Ready)
            .await;
        assert!(matches!(
            result,
            Err(RegistryError::InvalidTransition {
                from: ProcessingStatus::Pending,
                to: ProcessingStatus::Ready
            })
        ));
    }

    #[tokio::test]
    async fn test_transition_unknown_resume_is_not_found() {
        let (_, registry) = registry();
        let result = registry
            .transition_status(Uuid::new_v4(), ProcessingStatus::Processing)
            .await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn test_plan_assignment() {
        let mut row = NewResume::from_content("# CV").into_row(true);
        assert_eq!(MasterRegistry::plan_assignment(None), MasterAssignment::Promote);
        assert_eq!(
            MasterRegistry::plan_assignment(Some(&row)),
            MasterAssignment::Keep
        );
        row.processing_status = ProcessingStatus::Failed.as_str().to_string();
        assert_eq!(
            MasterRegistry::plan_assignment(Some(&row)),
            MasterAssignment::ReplaceFailed { demote: row.id }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creations_yield_exactly_one_master() {
        let (store, registry) = registry();
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .create_with_master_assignment(NewResume::from_content(format!("# {i}")))
                        .await
                })
            })
            .collect();

        let mut masters = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_master {
                masters += 1;
            }
        }

        assert_eq!(masters, 1);
        assert_eq!(master_count(&store).await, 1);
        assert_eq!(store.list_resumes().await.unwrap().len(), 16);
    }
}
