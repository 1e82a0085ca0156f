use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::{FieldError, ServiceError};
use tracing::{error, warn};

/// JSON error body: `{"error": <kind>, "message": ..., "fields": [...]}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
    pub fields: Vec<FieldError>,
}

#[derive(Serialize)]
struct Body<'a> {
    error: &'a str,
    message: &'a str,
    fields: &'a [FieldError],
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self { status, kind, message: message.into(), fields: Vec::new() }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthenticated", message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let kind = e.kind();
        let message = e.to_string();
        match e {
            ServiceError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, kind, m),
            ServiceError::Conflict { field, message } => Self {
                status: StatusCode::CONFLICT,
                kind,
                message: message.clone(),
                fields: vec![FieldError { field, message }],
            },
            ServiceError::Validation(fields) => {
                Self { status: StatusCode::UNPROCESSABLE_ENTITY, kind, message, fields }
            }
            ServiceError::Unauthenticated(m) => Self::new(StatusCode::UNAUTHORIZED, kind, m),
            ServiceError::Forbidden(m) => Self::new(StatusCode::FORBIDDEN, kind, m),
            ServiceError::InvariantViolation(m) => Self::new(StatusCode::BAD_REQUEST, kind, m),
            // internal details stay in the logs
            ServiceError::Internal(detail) => {
                error!(code = 1200, error = %detail, "internal error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, kind, "internal server error")
            }
        }
    }
}

/// Body extraction failures keep the JSON error shape. A body that parses but
/// does not fit the target type is a validation failure (422).
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match &rejection {
            JsonRejection::JsonDataError(_) => "validation_failed",
            JsonRejection::JsonSyntaxError(_) => "malformed_body",
            JsonRejection::MissingJsonContentType(_) => "unsupported_media_type",
            _ => "bad_request",
        };
        Self::new(rejection.status(), kind, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_client_error() {
            warn!(status = self.status.as_u16(), kind = self.kind, message = %self.message, "request rejected");
        }
        let body = Body { error: self.kind, message: &self.message, fields: &self.fields };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status() {
        let cases = [
            (ServiceError::not_found("user"), StatusCode::NOT_FOUND),
            (ServiceError::conflict("username", "taken"), StatusCode::CONFLICT),
            (ServiceError::Validation(vec![]), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::InvariantViolation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Internal("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn conflict_names_the_field_and_internal_hides_detail() {
        let e = ApiError::from(ServiceError::conflict("employee_code", "taken"));
        assert_eq!(e.fields[0].field, "employee_code");
        let e = ApiError::from(ServiceError::Internal("password=secret".into()));
        assert!(!e.message.contains("secret"));
    }
}
