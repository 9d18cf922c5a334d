use std::fmt::{Debug, Formatter};

use serde::Serialize;

use crate::error::{Error, Result};

/// Header that carries the admin key on every admin request.
pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// An admin key, as typed by the user. Guaranteed non-empty and free of
/// surrounding whitespace.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminKey(String);

impl AdminKey {
    /// Trim the raw input and reject it if nothing is left.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("empty credential".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Keys must never end up in logs.
impl Debug for AdminKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AdminKey(***)")
    }
}

/// Body of a request to replace the admin key.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAdminRequest<'a> {
    pub new_admin_key: &'a str,
}
