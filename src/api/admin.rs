use crate::{
    error::Result,
    model::{
        api::{
            admin::{AdminKey, ChangeAdminRequest},
            election::{AddCandidateRequest, CloseElectionRequest, CreatedElection, ElectionSpec},
            Acknowledgement,
        },
        common::election::{Candidate, ElectionId},
    },
    session::AdminSession,
};

use super::{authorised, HttpApi};

pub(super) async fn create_election(
    api: &HttpApi,
    session: &AdminSession,
    spec: &ElectionSpec,
) -> Result<Option<ElectionId>> {
    const ENDPOINT: &str = "createElection";
    let request = authorised(api.post(ENDPOINT), session.key()).json(spec);
    let created: CreatedElection = api.send(ENDPOINT, request).await?;
    Ok(created.election_id)
}

pub(super) async fn add_candidate(
    api: &HttpApi,
    session: &AdminSession,
    election_id: &ElectionId,
    candidate: &Candidate,
) -> Result<()> {
    const ENDPOINT: &str = "addCandidate";
    let body = AddCandidateRequest {
        election_id,
        candidate,
    };
    let request = authorised(api.post(ENDPOINT), session.key()).json(&body);
    let _: Acknowledgement = api.send(ENDPOINT, request).await?;
    Ok(())
}

pub(super) async fn change_admin(
    api: &HttpApi,
    session: &AdminSession,
    new_key: &AdminKey,
) -> Result<()> {
    const ENDPOINT: &str = "changeAdmin";
    let body = ChangeAdminRequest {
        new_admin_key: new_key.as_str(),
    };
    let request = authorised(api.post(ENDPOINT), session.key()).json(&body);
    let _: Acknowledgement = api.send(ENDPOINT, request).await?;
    Ok(())
}

pub(super) async fn close_election(
    api: &HttpApi,
    session: &AdminSession,
    election_id: &ElectionId,
) -> Result<()> {
    const ENDPOINT: &str = "closeElection";
    let body = CloseElectionRequest { election_id };
    let request = authorised(api.post(ENDPOINT), session.key()).json(&body);
    let _: Acknowledgement = api.send(ENDPOINT, request).await?;
    Ok(())
}
