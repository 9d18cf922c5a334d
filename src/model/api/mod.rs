//! API-compatible types.
//!
//! The types in this module are serialised the way the election API expects:
//!
//! - Field names are camelCase.
//! - Datetimes are RFC 3339 strings.
//! - Every response is wrapped in a [`ApiResponse`] envelope.

pub mod admin;
pub mod ballot;
pub mod election;

use serde::{de::DeserializeOwned, Deserialize};

use crate::error::{Error, Result};

/// Shown when the API reports failure without saying why.
pub const FALLBACK_ERROR: &str = "Unknown error occurred";

/// The envelope every API response arrives in.
///
/// The payload fields sit next to `success` and `error` in the same JSON
/// object, so they are flattened into `T`. Payload types must tolerate their
/// fields being absent, since failure responses usually omit them.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Validate the envelope, yielding the payload only if the API reported success.
    pub fn into_result(self) -> Result<T> {
        if self.success {
            Ok(self.payload)
        } else {
            Err(Error::Application(
                self.error
                    .filter(|msg| !msg.is_empty())
                    .unwrap_or_else(|| FALLBACK_ERROR.to_string()),
            ))
        }
    }
}

/// Payload of responses that carry nothing beyond the envelope.
#[derive(Debug, Default, Deserialize)]
pub struct Acknowledgement {}
