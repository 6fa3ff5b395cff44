//! Custom Axum extractors

use axum::extract::FromRequest;

use super::error::ApiError;

/// JSON body whose decode failures become 400 validation errors.
///
/// Plain `Json` answers syntax errors with 400 but type errors with 422
/// and a text body; this keeps every bad body on the JSON error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ValidJson<T>(pub T);
