use crate::{
    error::{Error, Result},
    model::{
        api::{
            admin::AdminKey,
            ballot::Vote,
            election::{ElectionList, ElectionResults, Elections, ResultsQuery},
            Acknowledgement,
        },
        common::election::ElectionId,
    },
};

use super::{authorised, HttpApi};

pub(super) async fn all_elections(api: &HttpApi, key: &AdminKey) -> Result<Elections> {
    const ENDPOINT: &str = "getAllElections";
    let list: ElectionList = api.send(ENDPOINT, authorised(api.get(ENDPOINT), key)).await?;
    list.elections
        .ok_or_else(|| Error::Malformed("success response without `elections`".to_string()))
}

pub(super) async fn cast_vote(api: &HttpApi, vote: &Vote) -> Result<()> {
    const ENDPOINT: &str = "castVote";
    let _: Acknowledgement = api.send(ENDPOINT, api.post(ENDPOINT).json(vote)).await?;
    Ok(())
}

pub(super) async fn election_results(
    api: &HttpApi,
    election_id: &ElectionId,
) -> Result<ElectionResults> {
    const ENDPOINT: &str = "getElectionResults";
    let query = ResultsQuery { election_id };
    api.send(ENDPOINT, api.get(ENDPOINT).query(&query)).await
}
