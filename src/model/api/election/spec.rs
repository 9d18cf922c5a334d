use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::election::{Candidate, ElectionId};

/// An election specification, as submitted by an admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSpec {
    /// Election title.
    pub title: String,
    /// Election start time.
    pub start_time: DateTime<Utc>,
    /// Election end time.
    pub end_time: DateTime<Utc>,
    pub budget: f64,
    /// Initial candidates; more can be added later.
    pub candidates: Vec<Candidate>,
}

/// Payload of `createElection`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedElection {
    #[serde(default, alias = "election_id")]
    pub election_id: Option<ElectionId>,
}
