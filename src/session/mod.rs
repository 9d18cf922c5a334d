//! The admin session: who we are authenticated as, and where that is remembered.

mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore, ADMIN_KEY_NAME};

use crate::model::api::admin::AdminKey;

/// Proof that the API accepted an admin key.
///
/// Only the bootstrapper creates these, and only after a successful check;
/// every admin-only API call requires one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    key: AdminKey,
}

impl AdminSession {
    pub(crate) fn new(key: AdminKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &AdminKey {
        &self.key
    }
}

/// The two-state authentication flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated(AdminSession),
}

impl AuthState {
    pub fn session(&self) -> Option<&AdminSession> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
