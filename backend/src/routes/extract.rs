use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

// Extractors whose rejections render through `AppError`, so malformed
// input gets the same JSON error body as every other failure.

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
