use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use models::leave_slip;

use crate::leave_slips::domain::{LeaveSlip, LeaveSlipPatch};
use crate::leave_slips::repository::LeaveSlipRepository;
use crate::store::{self, backend, StoreError};

const CONSTRAINTS: &[(&str, &str)] = &[(leave_slip::UQ_EMPLOYEE_CODE, "employee_code")];

pub struct SeaOrmLeaveSlipRepository {
    pub db: DatabaseConnection,
}

impl From<leave_slip::Model> for LeaveSlip {
    fn from(m: leave_slip::Model) -> Self {
        Self {
            id: m.id,
            employee_name: m.employee_name,
            national_id: m.national_id,
            employee_code: m.employee_code,
            area: m.area,
            position: m.position,
            reason: m.reason,
            office_entity: m.office_entity,
            justification: m.justification,
            date: m.date,
            departure_time: m.departure_time,
            return_time: m.return_time,
            regime: m.regime,
            created_at: m.created_at.with_timezone(&chrono::Utc),
        }
    }
}

fn to_active(s: LeaveSlip) -> leave_slip::ActiveModel {
    leave_slip::ActiveModel {
        id: Set(s.id),
        employee_name: Set(s.employee_name),
        national_id: Set(s.national_id),
        employee_code: Set(s.employee_code),
        area: Set(s.area),
        position: Set(s.position),
        reason: Set(s.reason),
        office_entity: Set(s.office_entity),
        justification: Set(s.justification),
        date: Set(s.date),
        departure_time: Set(s.departure_time),
        return_time: Set(s.return_time),
        regime: Set(s.regime),
        created_at: Set(s.created_at.into()),
    }
}

/// Mark only the patched columns as changed so the UPDATE touches nothing else.
fn apply_patch(am: &mut leave_slip::ActiveModel, p: &LeaveSlipPatch) {
    if let Some(v) = &p.employee_name { am.employee_name = Set(v.clone()); }
    if let Some(v) = &p.national_id { am.national_id = Set(v.clone()); }
    if let Some(v) = &p.employee_code { am.employee_code = Set(v.clone()); }
    if let Some(v) = &p.area { am.area = Set(v.clone()); }
    if let Some(v) = &p.position { am.position = Set(v.clone()); }
    if let Some(v) = &p.reason { am.reason = Set(v.clone()); }
    if let Some(v) = &p.office_entity { am.office_entity = Set(v.clone()); }
    if let Some(v) = &p.justification { am.justification = Set(v.clone()); }
    if let Some(v) = p.date { am.date = Set(v); }
    if let Some(v) = p.departure_time { am.departure_time = Set(v); }
    if let Some(v) = p.return_time { am.return_time = Set(v); }
    if let Some(v) = &p.regime { am.regime = Set(v.clone()); }
}

#[async_trait::async_trait]
impl LeaveSlipRepository for SeaOrmLeaveSlipRepository {
    async fn get(&self, id: Uuid) -> Result<Option<LeaveSlip>, StoreError> {
        let res = leave_slip::Entity::find_by_id(id).one(&self.db).await.map_err(backend)?;
        Ok(res.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<LeaveSlip>, StoreError> {
        let rows = leave_slip::Entity::find().all(&self.db).await.map_err(backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_employee_code(&self, code: &str) -> Result<Option<LeaveSlip>, StoreError> {
        let res = leave_slip::Entity::find()
            .filter(leave_slip::Column::EmployeeCode.eq(code))
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(res.map(Into::into))
    }

    async fn latest_by_national_id(&self, national_id: &str) -> Result<Option<LeaveSlip>, StoreError> {
        let res = leave_slip::Entity::find()
            .filter(leave_slip::Column::NationalId.eq(national_id))
            .order_by_desc(leave_slip::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(res.map(Into::into))
    }

    async fn insert(&self, slip: LeaveSlip) -> Result<LeaveSlip, StoreError> {
        let txn = store::begin(&self.db).await?;
        match to_active(slip).insert(&txn).await {
            Ok(model) => {
                store::commit(txn, CONSTRAINTS).await?;
                Ok(model.into())
            }
            Err(e) => Err(store::abort(txn, e, CONSTRAINTS).await),
        }
    }

    async fn update(&self, id: Uuid, patch: &LeaveSlipPatch) -> Result<Option<LeaveSlip>, StoreError> {
        let txn = store::begin(&self.db).await?;
        let found = match leave_slip::Entity::find_by_id(id).one(&txn).await {
            Ok(found) => found,
            Err(e) => return Err(store::abort(txn, e, CONSTRAINTS).await),
        };
        let Some(model) = found else {
            store::commit(txn, CONSTRAINTS).await?;
            return Ok(None);
        };
        if patch.is_empty() {
            store::commit(txn, CONSTRAINTS).await?;
            return Ok(Some(model.into()));
        }
        let mut am: leave_slip::ActiveModel = model.into();
        apply_patch(&mut am, patch);
        match am.update(&txn).await {
            Ok(updated) => {
                store::commit(txn, CONSTRAINTS).await?;
                Ok(Some(updated.into()))
            }
            Err(e) => Err(store::abort(txn, e, CONSTRAINTS).await),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let txn = store::begin(&self.db).await?;
        match leave_slip::Entity::delete_by_id(id).exec(&txn).await {
            Ok(res) => {
                store::commit(txn, CONSTRAINTS).await?;
                Ok(res.rows_affected > 0)
            }
            Err(e) => Err(store::abort(txn, e, CONSTRAINTS).await),
        }
    }

    async fn count(&self) -> Result<u64, StoreError> {
        leave_slip::Entity::find().count(&self.db).await.map_err(backend)
    }
}
