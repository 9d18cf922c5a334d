use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::model::common::election::CandidateId;

/// Payload of `getElectionResults`.
#[derive(Debug, Default, Deserialize)]
pub struct ElectionResults {
    /// Title of the election.
    #[serde(default, alias = "title")]
    pub election: Option<String>,
    /// Votes received, by candidate.
    #[serde(default)]
    pub results: BTreeMap<CandidateId, u64>,
}

impl ElectionResults {
    /// Tallies ordered by vote count, then by name.
    pub fn standings(&self) -> Vec<CandidateTally> {
        let mut standings: Vec<_> = self
            .results
            .iter()
            .map(|(name, votes)| CandidateTally {
                candidate_name: name.clone(),
                votes: *votes,
            })
            .collect();
        // BTreeMap iteration is already name-ordered, so a stable sort keeps ties by name.
        standings.sort_by(|a, b| b.votes.cmp(&a.votes));
        standings
    }
}

/// A friendly representation of the result for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTally {
    pub candidate_name: String,
    pub votes: u64,
}

impl Display for CandidateTally {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} vote{}",
            self.candidate_name,
            self.votes,
            if self.votes != 1 { "s" } else { "" }
        )
    }
}
