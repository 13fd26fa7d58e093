//! Response body shapes.
//!
//! Create and ListAll failures answer with a status-tagged envelope; the other
//! operations answer with a plain `message` object. Successful ListAll and
//! GetOne bodies are bare records and need no wrapper.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Serialize, Serializer};

/// Application-level outcome class, serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTag {
    Failure = 0,
    Success = 1,
    Invalid = 3,
}

impl Serialize for StatusTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// `{status, message, error, data}`; `error` serializes as `null` when absent.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: StatusTag,
    pub message: &'static str,
    pub error: Option<String>,
    pub data: T,
}

impl Envelope<&'static str> {
    /// Failure envelope with the empty-string `data` placeholder.
    pub fn failed(status: StatusTag, message: &'static str, error: impl Into<String>) -> Self {
        Self { status, message, error: Some(error.into()), data: "" }
    }
}

/// `{status, message, error}`
#[derive(Debug, Serialize)]
pub struct TaggedMessage {
    pub status: StatusTag,
    pub message: &'static str,
    pub error: String,
}

/// `{message}` or `{message, error}`
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Message {
    pub fn new(message: &'static str) -> Self { Self { message, error: None } }

    pub fn with_error(message: &'static str, error: impl Into<String>) -> Self {
        Self { message, error: Some(error.into()) }
    }
}

/// `{message, data}`; `data` is always present, `null` included.
#[derive(Debug, Serialize)]
pub struct MessageWithData<T> {
    pub message: &'static str,
    pub data: T,
}

pub fn reply<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}
