use serde::Serialize;

use crate::model::common::election::{Candidate, ElectionId};

/// Body of `addCandidate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCandidateRequest<'a> {
    pub election_id: &'a ElectionId,
    pub candidate: &'a Candidate,
}

/// Body of `closeElection`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseElectionRequest<'a> {
    pub election_id: &'a ElectionId,
}

/// Query string of `getElectionResults`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsQuery<'a> {
    pub election_id: &'a ElectionId,
}
