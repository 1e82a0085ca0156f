use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::domain::{LeaveSlip, LeaveSlipPatch, NewLeaveSlip, PrefillLookup};
use super::repository::LeaveSlipRepository;
use super::validation::{validate_new, validate_patch};
use crate::clock::{today, Clock};
use crate::errors::ServiceError;
use crate::store::StoreError;

const ENTITY: &str = "leave slip";

fn code_taken(code: &str) -> ServiceError {
    ServiceError::conflict("employee_code", format!("a leave slip with employee code {code} already exists"))
}

/// Translate a failed write. A unique violation means another writer took the
/// code between our pre-check and the commit; it is reported exactly like the
/// pre-check conflict.
fn write_failed(code: &str, e: StoreError) -> ServiceError {
    match e {
        StoreError::UniqueViolation { .. } => {
            warn!(employee_code = %code, "employee code claimed by a concurrent write");
            code_taken(code)
        }
        StoreError::Backend(msg) => {
            error!(error = %msg, "leave slip write failed");
            ServiceError::Internal(msg)
        }
    }
}

/// Leave-slip business service independent of web framework
pub struct LeaveSlipService<R: LeaveSlipRepository + ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: LeaveSlipRepository + ?Sized> LeaveSlipService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self { Self { repo, clock } }

    /// Validate and store a new slip.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use chrono::{NaiveTime, Utc};
    /// use service::clock::DefaultClock;
    /// use service::leave_slips::{domain::NewLeaveSlip, repository::mock::MockLeaveSlipRepository, LeaveSlipService};
    ///
    /// let svc = LeaveSlipService::new(Arc::new(MockLeaveSlipRepository::default()), Arc::new(DefaultClock));
    /// let input = NewLeaveSlip {
    ///     employee_name: "Maria Lopez".into(),
    ///     national_id: "12345678".into(),
    ///     employee_code: "A-1".into(),
    ///     area: "Rentas".into(),
    ///     position: "Asistente".into(),
    ///     reason: "Tramite personal".into(),
    ///     office_entity: "RENIEC".into(),
    ///     justification: "Renovacion de documento".into(),
    ///     date: Utc::now().date_naive() + chrono::Duration::days(1),
    ///     departure_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ///     return_time: None,
    ///     regime: "CAS".into(),
    /// };
    /// let slip = tokio_test::block_on(svc.create(input.clone())).unwrap();
    /// assert_eq!(slip.employee_code, "A-1");
    /// assert!(tokio_test::block_on(svc.create(input)).is_err());
    /// ```
    #[instrument(skip(self, input), fields(employee_code = %input.employee_code))]
    pub async fn create(&self, input: NewLeaveSlip) -> Result<LeaveSlip, ServiceError> {
        validate_new(&input, today(self.clock.as_ref()))?;

        if let Some(existing) = self.repo.find_by_employee_code(&input.employee_code).await? {
            debug!(existing_id = %existing.id, "employee code already used");
            return Err(code_taken(&input.employee_code));
        }

        let code = input.employee_code.clone();
        let slip = input.into_slip(Uuid::new_v4(), self.clock.utc());
        let saved = self.repo.insert(slip).await.map_err(|e| write_failed(&code, e))?;
        info!(slip_id = %saved.id, national_id = %saved.national_id, "leave_slip_created");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<LeaveSlip, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found(ENTITY))
    }

    pub async fn list(&self) -> Result<Vec<LeaveSlip>, ServiceError> {
        Ok(self.repo.list().await?)
    }

    /// Employee data from the most recent slip for `national_id`. A miss is
    /// returned as a lookup result, not an error.
    #[instrument(skip(self))]
    pub async fn find_latest_by_national_id(&self, national_id: &str) -> Result<PrefillLookup, ServiceError> {
        Ok(match self.repo.latest_by_national_id(national_id).await? {
            Some(slip) => PrefillLookup::hit(&slip),
            None => PrefillLookup::miss(),
        })
    }

    /// Apply the fields present in `patch`; returns the full updated slip.
    #[instrument(skip(self, patch), fields(fields = ?patch.fields()))]
    pub async fn update(&self, id: Uuid, patch: LeaveSlipPatch) -> Result<LeaveSlip, ServiceError> {
        let current = self.get(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut merged = current.clone();
        patch.apply_to(&mut merged);
        validate_patch(&patch, &merged, today(self.clock.as_ref()))?;

        if let Some(code) = patch.employee_code.as_deref().filter(|c| *c != current.employee_code) {
            if let Some(other) = self.repo.find_by_employee_code(code).await? {
                if other.id != id {
                    return Err(code_taken(code));
                }
            }
        }

        let updated = self
            .repo
            .update(id, &patch)
            .await
            .map_err(|e| write_failed(&merged.employee_code, e))?
            .ok_or_else(|| ServiceError::not_found(ENTITY))?;
        info!(slip_id = %id, "leave_slip_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let removed = self.repo.delete(id).await.map_err(|e| match e {
            StoreError::Backend(msg) => {
                error!(error = %msg, "leave slip delete failed");
                ServiceError::Internal(msg)
            }
            other => other.into(),
        })?;
        if !removed {
            return Err(ServiceError::not_found(ENTITY));
        }
        info!(slip_id = %id, "leave_slip_deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.repo.count().await?)
    }
}
