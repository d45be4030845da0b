//! Request extractors whose rejections are reported as `AppError`.
//!
//! Axum's own `Json` and `Path` extractors answer malformed input with a
//! plain-text body. Wrapping them keeps every error response in the
//! `{"erroMsg": ...}` shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON body extractor. Missing fields, bad types and wrong content types
/// become `AppError::InvalidRequest`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameter extractor, e.g. the `{id}` in `/account/{id}`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
