use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{LeaveSlip, LeaveSlipPatch};
use crate::store::StoreError;

/// Storage port for leave slips.
///
/// Implementations own uniqueness of `employee_code`: `insert` and `update`
/// must fail with [`StoreError::UniqueViolation`] when the write would
/// duplicate a code, whatever the caller pre-checked. A failed write leaves
/// no partial state behind.
#[async_trait]
pub trait LeaveSlipRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<LeaveSlip>, StoreError>;
    async fn list(&self) -> Result<Vec<LeaveSlip>, StoreError>;
    async fn find_by_employee_code(&self, code: &str) -> Result<Option<LeaveSlip>, StoreError>;
    /// Most recently created slip for `national_id`.
    async fn latest_by_national_id(&self, national_id: &str) -> Result<Option<LeaveSlip>, StoreError>;
    async fn insert(&self, slip: LeaveSlip) -> Result<LeaveSlip, StoreError>;
    /// Apply `patch` to the stored slip; `Ok(None)` when `id` does not exist.
    async fn update(&self, id: Uuid, patch: &LeaveSlipPatch) -> Result<Option<LeaveSlip>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn count(&self) -> Result<u64, StoreError>;
}

/// Simple in-memory repository for tests, doc examples and local runs
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::RwLock;

    /// Keeps slips in insertion order; the write lock makes the uniqueness
    /// check and the write a single atomic step, like a database constraint.
    #[derive(Default)]
    pub struct MockLeaveSlipRepository {
        slips: RwLock<Vec<LeaveSlip>>,
        stale_code_lookups: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl MockLeaveSlipRepository {
        /// Make `find_by_employee_code` miss, as if a concurrent writer had
        /// not committed yet when the service pre-checked.
        pub fn set_stale_code_lookups(&self, on: bool) { self.stale_code_lookups.store(on, Ordering::SeqCst); }

        /// Make every write fail with a backend error.
        pub fn set_fail_writes(&self, on: bool) { self.fail_writes.store(on, Ordering::SeqCst); }

        fn check_writable(&self) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("injected write failure".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl LeaveSlipRepository for MockLeaveSlipRepository {
        async fn get(&self, id: Uuid) -> Result<Option<LeaveSlip>, StoreError> {
            let slips = self.slips.read().await;
            Ok(slips.iter().find(|s| s.id == id).cloned())
        }

        async fn list(&self) -> Result<Vec<LeaveSlip>, StoreError> {
            Ok(self.slips.read().await.clone())
        }

        async fn find_by_employee_code(&self, code: &str) -> Result<Option<LeaveSlip>, StoreError> {
            if self.stale_code_lookups.load(Ordering::SeqCst) {
                return Ok(None);
            }
            let slips = self.slips.read().await;
            Ok(slips.iter().find(|s| s.employee_code == code).cloned())
        }

        async fn latest_by_national_id(&self, national_id: &str) -> Result<Option<LeaveSlip>, StoreError> {
            let slips = self.slips.read().await;
            // max_by_key keeps the last maximum, so equal timestamps resolve to the later insert
            Ok(slips
                .iter()
                .filter(|s| s.national_id == national_id)
                .max_by_key(|s| s.created_at)
                .cloned())
        }

        async fn insert(&self, slip: LeaveSlip) -> Result<LeaveSlip, StoreError> {
            let mut slips = self.slips.write().await;
            self.check_writable()?;
            if slips.iter().any(|s| s.employee_code == slip.employee_code) {
                return Err(StoreError::UniqueViolation { field: "employee_code" });
            }
            slips.push(slip.clone());
            Ok(slip)
        }

        async fn update(&self, id: Uuid, patch: &LeaveSlipPatch) -> Result<Option<LeaveSlip>, StoreError> {
            let mut slips = self.slips.write().await;
            self.check_writable()?;
            let Some(pos) = slips.iter().position(|s| s.id == id) else { return Ok(None) };
            if let Some(code) = &patch.employee_code {
                if slips.iter().any(|s| s.id != id && &s.employee_code == code) {
                    return Err(StoreError::UniqueViolation { field: "employee_code" });
                }
            }
            let mut updated = slips[pos].clone();
            patch.apply_to(&mut updated);
            slips[pos] = updated.clone();
            Ok(Some(updated))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
            let mut slips = self.slips.write().await;
            self.check_writable()?;
            let before = slips.len();
            slips.retain(|s| s.id != id);
            Ok(slips.len() != before)
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Ok(self.slips.read().await.len() as u64)
        }
    }
}
