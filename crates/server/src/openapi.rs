use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "00000000")]
    pub national_id: String,
}

#[derive(ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: Option<UserDoc>,
    /// Send back as `Authorization: Bearer <token>`.
    #[schema(example = "admin:00000000")]
    pub token: Option<String>,
}

#[derive(ToSchema)]
pub struct UserDoc {
    pub id: Uuid,
    pub full_name: String,
    pub username: String,
    pub national_id: String,
    #[schema(example = "hr")]
    pub role: String,
}

#[derive(ToSchema)]
pub struct UserSummaryDoc {
    pub id: Uuid,
    pub username: String,
    pub national_id: String,
    pub role: String,
}

#[derive(ToSchema)]
pub struct NewUserDoc {
    pub full_name: String,
    pub username: String,
    pub national_id: String,
    /// One of `hr`, `hr_readonly`, `admin`.
    pub role: String,
}

#[derive(ToSchema)]
pub struct UserPatchDoc {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub national_id: Option<String>,
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct DashboardStatsDoc {
    pub total_users: u64,
    pub total_leave_slips: u64,
}

#[derive(ToSchema)]
pub struct LeaveSlipDoc {
    pub id: Uuid,
    pub employee_name: String,
    pub national_id: String,
    pub employee_code: String,
    pub area: String,
    pub position: String,
    pub reason: String,
    pub office_entity: String,
    pub justification: String,
    #[schema(example = "2026-05-04")]
    pub date: String,
    #[schema(example = "09:00:00")]
    pub departure_time: String,
    pub return_time: Option<String>,
    pub regime: String,
    pub created_at: String,
}

#[derive(ToSchema)]
pub struct NewLeaveSlipDoc {
    pub employee_name: String,
    pub national_id: String,
    pub employee_code: String,
    pub area: String,
    pub position: String,
    pub reason: String,
    pub office_entity: String,
    pub justification: String,
    pub date: String,
    pub departure_time: String,
    pub return_time: Option<String>,
    pub regime: String,
}

/// Only present keys are applied; `"return_time": null` clears it.
#[derive(ToSchema)]
pub struct LeaveSlipPatchDoc {
    pub employee_name: Option<String>,
    pub national_id: Option<String>,
    pub employee_code: Option<String>,
    pub area: Option<String>,
    pub position: Option<String>,
    pub reason: Option<String>,
    pub office_entity: Option<String>,
    pub justification: Option<String>,
    pub date: Option<String>,
    pub departure_time: Option<String>,
    pub return_time: Option<String>,
    pub regime: Option<String>,
}

#[derive(ToSchema)]
pub struct EmployeePrefillDoc {
    pub employee_name: String,
    pub area: String,
    pub position: String,
    pub regime: String,
    pub national_id: String,
}

#[derive(ToSchema)]
pub struct PrefillLookupDoc {
    pub found: bool,
    pub message: Option<String>,
    pub data: Option<EmployeePrefillDoc>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::admin::stats,
        crate::routes::admin::list_users,
        crate::routes::admin::create_user,
        crate::routes::admin::get_user,
        crate::routes::admin::update_user,
        crate::routes::admin::delete_user,
        crate::routes::slips::list,
        crate::routes::slips::create,
        crate::routes::slips::get,
        crate::routes::slips::update,
        crate::routes::slips::delete,
        crate::routes::slips::prefill,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            LoginResponse,
            UserDoc,
            UserSummaryDoc,
            NewUserDoc,
            UserPatchDoc,
            DashboardStatsDoc,
            LeaveSlipDoc,
            NewLeaveSlipDoc,
            LeaveSlipPatchDoc,
            EmployeePrefillDoc,
            PrefillLookupDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "admin"),
        (name = "hr")
    )
)]
pub struct ApiDoc;
