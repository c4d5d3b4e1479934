//! Request extractors
//!
//! Wrappers over axum's extractors whose rejections render as
//! [`AppError`] bodies (`{ "error": ... }`).

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::app_error::AppError;

/// JSON body extractor; malformed bodies become `400 { "error": "Corpo da requisição inválido" }`
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor; unparsable ids become `400 { "error": "ID inválido" }`
#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
