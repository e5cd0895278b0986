//! Request extractors that report rejections as [`AppError`].
//!
//! Axum's own `Json`, `Query` and `Path` answer malformed input with a plain
//! text body. These wrappers run the same extraction and turn any rejection
//! into a 400 with the usual `{"error": {..., "details": {"fields": ...}}}`
//! body, keyed by the offending field when serde names one.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::error::{AppError, FieldErrors};

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Deserialized query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryString<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let fields = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                rejection_fields("body", &rejection.body_text())
            }
            _ => single_field("body", rejection.body_text()),
        };

        AppError::invalid_fields("Invalid request body", fields)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::invalid_fields(
            "Invalid query parameters",
            rejection_fields("query", &rejection.body_text()),
        )
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::invalid_fields(
            "Invalid path parameter",
            single_field("id", rejection.body_text()),
        )
    }
}

/// Splits serde's `"<prefix>: <field>: <problem>"` rejection text.
///
/// Falls back to `default_field` when the text names no field, as for a
/// body that is not a JSON object at all.
fn rejection_fields(default_field: &str, text: &str) -> FieldErrors {
    let detail = text.split_once(": ").map_or(text, |(_, rest)| rest);

    match detail.split_once(": ") {
        Some((path, problem)) if is_field_path(path) => single_field(path, problem.to_string()),
        _ => single_field(default_field, detail.to_string()),
    }
}

fn single_field(field: &str, message: String) -> FieldErrors {
    FieldErrors::from([(field.to_string(), vec![message])])
}

fn is_field_path(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}
