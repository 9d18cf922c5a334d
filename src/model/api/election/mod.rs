mod desc;
mod requests;
mod results;
mod spec;

pub use desc::{ElectionDescription, ElectionList, Elections};
pub use requests::{AddCandidateRequest, CloseElectionRequest, ResultsQuery};
pub use results::{CandidateTally, ElectionResults};
pub use spec::{CreatedElection, ElectionSpec};
