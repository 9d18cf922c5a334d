use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// States in the Election lifecycle, as far as the admin client can see.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionState {
    /// Accepting candidates and votes.
    #[default]
    Open,
    /// Closed by an admin; results are final.
    Closed,
    /// Any state this client doesn't know about.
    #[serde(other)]
    Unknown,
}

impl Display for ElectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
