use axum::extract::FromRequest;

use crate::errors::ApiError;

/// `axum::Json` body whose rejections answer with the [`ApiError`] JSON shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
