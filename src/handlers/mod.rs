// handlers/mod.rs - one module per resource
//
// Every handler performs at most one store operation and answers with JSON
// (the root greeting excepted).
pub mod posts; // /posts/*, /post/users/:uid
pub mod root;  // /, /health
pub mod users; // /users/*

use axum::{body::Bytes, extract::rejection::BytesRejection};
use serde::de::DeserializeOwned;

use crate::error::ApiResult;

/// Decode a JSON request body regardless of its Content-Type header.
pub(crate) fn decode_body<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> ApiResult<T> {
    let body = body?;
    Ok(serde_json::from_slice(&body)?)
}
