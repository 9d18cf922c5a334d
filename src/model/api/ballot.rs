use serde::{Deserialize, Serialize};

use crate::model::common::election::{CandidateId, ElectionId};

/// A vote, as submitted on behalf of a voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub election_id: ElectionId,
    /// The voter's national identification number.
    pub nin: String,
    /// The voter's per-election secret code.
    pub secret_code: String,
    pub candidate: CandidateId,
}
