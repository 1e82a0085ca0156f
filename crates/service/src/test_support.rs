#![cfg(test)]
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Utc};
use migration::MigratorTrait;
use mockable::MockClock;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use models::user::Role;

use crate::leave_slips::domain::NewLeaveSlip;
use crate::users::domain::NewUser;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// Connection to the test database, or `None` when `SKIP_DB_TESTS` is set or
/// no database is reachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let migrated = MIGRATED
        .get_or_init(|| async {
            let db = match models::db::connect().await {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {}", e);
                    return false;
                }
            };
            if let Err(e) = migration::Migrator::up(&db, None).await {
                eprintln!("skip: migrate up failed: {}", e);
                return false;
            }
            true
        })
        .await;
    if !*migrated {
        return None;
    }
    models::db::connect().await.ok()
}

pub fn sample_slip(code: &str, national_id: &str, date: NaiveDate) -> NewLeaveSlip {
    NewLeaveSlip {
        employee_name: "Maria Lopez".into(),
        national_id: national_id.into(),
        employee_code: code.into(),
        area: "Rentas".into(),
        position: "Asistente".into(),
        reason: "Tramite personal".into(),
        office_entity: "RENIEC".into(),
        justification: "Renovacion de documento de identidad".into(),
        date,
        departure_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        return_time: Some(NaiveTime::from_hms_opt(11, 0, 0).unwrap()),
        regime: "CAS".into(),
    }
}

pub fn sample_user(username: &str, national_id: &str, role: Role) -> NewUser {
    NewUser {
        full_name: format!("User {username}"),
        username: username.into(),
        national_id: national_id.into(),
        role,
    }
}

/// Clock pinned at `at`.
pub fn fixed_clock(at: DateTime<Utc>) -> MockClock {
    let mut clock = MockClock::new();
    clock.expect_utc().returning(move || at);
    clock.expect_local().returning(move || at.with_timezone(&Local));
    clock
}

/// Clock that advances by `step` on every `utc()` read, so consecutive
/// creations get strictly increasing timestamps. The local date stays on `start`.
pub fn stepping_clock(start: DateTime<Utc>, step: Duration) -> MockClock {
    let mut ticks = 0;
    let mut clock = MockClock::new();
    clock.expect_utc().returning(move || {
        let now = start + step * ticks;
        ticks += 1;
        now
    });
    clock.expect_local().returning(move || start.with_timezone(&Local));
    clock
}
