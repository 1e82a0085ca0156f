//! Admin dashboard counters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::leave_slips::repository::LeaveSlipRepository;
use crate::users::repository::UserRepository;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_leave_slips: u64,
}

pub struct DashboardService<U: UserRepository + ?Sized, S: LeaveSlipRepository + ?Sized> {
    users: Arc<U>,
    slips: Arc<S>,
}

impl<U: UserRepository + ?Sized, S: LeaveSlipRepository + ?Sized> DashboardService<U, S> {
    pub fn new(users: Arc<U>, slips: Arc<S>) -> Self { Self { users, slips } }

    #[tracing::instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, ServiceError> {
        Ok(DashboardStats { total_users: self.users.count().await?, total_leave_slips: self.slips.count().await? })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use models::user::Role;

    use super::*;
    use crate::clock::DefaultClock;
    use crate::leave_slips::{repository::mock::MockLeaveSlipRepository, LeaveSlipService};
    use crate::test_support::{sample_slip, sample_user};
    use crate::users::{repository::mock::MockUserRepository, UserService};

    #[tokio::test]
    async fn counts_both_tables() {
        let users = Arc::new(MockUserRepository::default());
        let slips = Arc::new(MockLeaveSlipRepository::default());
        let dash = DashboardService::new(users.clone(), slips.clone());
        assert_eq!(dash.stats().await.unwrap(), DashboardStats { total_users: 0, total_leave_slips: 0 });

        let user_svc = UserService::new(users);
        user_svc.create(sample_user("ana", "12345678", Role::Hr)).await.unwrap();
        user_svc.create(sample_user("root", "00000000", Role::Admin)).await.unwrap();
        let slip_svc = LeaveSlipService::new(slips, Arc::new(DefaultClock));
        slip_svc.create(sample_slip("A-1", "12345678", Utc::now().date_naive() + Duration::days(1))).await.unwrap();

        assert_eq!(dash.stats().await.unwrap(), DashboardStats { total_users: 2, total_leave_slips: 1 });
    }
}
