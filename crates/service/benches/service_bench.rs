use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use chrono::{Duration, NaiveTime, Utc};
use models::user::Role;
use service::auth::{AuthService, CredentialResolver};
use service::clock::DefaultClock;
use service::leave_slips::{domain::NewLeaveSlip, repository::mock::MockLeaveSlipRepository, LeaveSlipService};
use service::users::{domain::NewUser, repository::mock::MockUserRepository, UserService};

fn bench_resolve(c: &mut Criterion) {
    let repo = Arc::new(MockUserRepository::default());
    let users = UserService::new(repo.clone());
    let auth = AuthService::new(repo);

    // seed outside of the measured loop
    let rt = tokio::runtime::Runtime::new().unwrap();
    for i in 0..500u32 {
        let input = NewUser {
            full_name: format!("Bench User {i}"),
            username: format!("user{i}"),
            national_id: format!("{:08}", 10_000_000 + i),
            role: Role::Hr,
        };
        rt.block_on(users.create(input)).unwrap();
    }

    c.bench_function("auth_resolve_credential", |b| {
        b.iter(|| rt.block_on(auth.resolve("user499:10000499")).unwrap());
    });
}

fn bench_create_slip(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let svc = LeaveSlipService::new(Arc::new(MockLeaveSlipRepository::default()), Arc::new(DefaultClock));
    let date = Utc::now().date_naive() + Duration::days(1);
    let mut n = 0u64;

    c.bench_function("leave_slip_create", |b| {
        b.iter(|| {
            n += 1;
            let input = NewLeaveSlip {
                employee_name: "Bench Employee".into(),
                national_id: "12345678".into(),
                employee_code: format!("B-{n}"),
                area: "Rentas".into(),
                position: "Asistente".into(),
                reason: "Tramite personal".into(),
                office_entity: "RENIEC".into(),
                justification: "Renovacion de documento".into(),
                date,
                departure_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                return_time: None,
                regime: "CAS".into(),
            };
            rt.block_on(svc.create(input)).unwrap()
        });
    });
}

criterion_group!(benches, bench_resolve, bench_create_slip);
criterion_main!(benches);
