//! Typed client for the remote election API.
//!
//! Every endpoint answers with an [`ApiResponse`] envelope; transport failures
//! and non-2xx statuses are reported before the body is even looked at.

mod admin;
mod public;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{Error, Result},
    logging::{log_request, log_response, RequestId},
    model::{
        api::{
            admin::{AdminKey, ADMIN_KEY_HEADER},
            ballot::Vote,
            election::{ElectionResults, ElectionSpec, Elections},
            ApiResponse,
        },
        common::election::{Candidate, ElectionId},
    },
    session::AdminSession,
};

/// Everything the admin console can ask of the election API.
#[async_trait]
pub trait ElectionApi {
    /// List every election. The key rides along so the listing doubles as a
    /// check that the key is accepted.
    async fn all_elections(&self, key: &AdminKey) -> Result<Elections>;

    /// Create an election, returning its ID if the API reports one.
    async fn create_election(
        &self,
        session: &AdminSession,
        spec: &ElectionSpec,
    ) -> Result<Option<ElectionId>>;

    async fn add_candidate(
        &self,
        session: &AdminSession,
        election_id: &ElectionId,
        candidate: &Candidate,
    ) -> Result<()>;

    /// Replace the admin key. The current session stops being valid on success.
    async fn change_admin(&self, session: &AdminSession, new_key: &AdminKey) -> Result<()>;

    async fn close_election(&self, session: &AdminSession, election_id: &ElectionId)
        -> Result<()>;

    async fn cast_vote(&self, vote: &Vote) -> Result<()>;

    async fn election_results(&self, election_id: &ElectionId) -> Result<ElectionResults>;
}

/// [`ElectionApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config.api_base()))
    }

    /// A client with default settings for the API at `base`.
    pub fn with_base(base: impl AsRef<str>) -> Self {
        Self::with_client(Client::new(), base)
    }

    fn with_client(client: Client, base: impl AsRef<str>) -> Self {
        Self {
            client,
            base: base.as_ref().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base, endpoint)
    }

    fn get(&self, endpoint: &str) -> RequestBuilder {
        self.client.get(self.url(endpoint))
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        self.client.post(self.url(endpoint))
    }

    /// Send a request, check the status and the envelope, and return the payload.
    async fn send<T: DeserializeOwned>(&self, endpoint: &str, request: RequestBuilder) -> Result<T> {
        let id = RequestId::next();
        let request = request.build()?;
        log_request(id, request.method(), request.url().as_str());

        let response = self.client.execute(request).await?;
        let status = response.status();
        log_response(id, status, endpoint);
        if !status.is_success() {
            return Err(Error::Status(status));
        }

        let body = response.bytes().await?;
        let envelope: ApiResponse<T> = serde_json::from_slice(&body).map_err(|e| {
            debug!("Undecodable body from {endpoint}: {}", String::from_utf8_lossy(&body));
            Error::Malformed(e.to_string())
        })?;
        envelope.into_result()
    }
}

/// Attach the admin key to a request.
fn authorised(request: RequestBuilder, key: &AdminKey) -> RequestBuilder {
    request.header(ADMIN_KEY_HEADER, key.as_str())
}

#[async_trait]
impl ElectionApi for HttpApi {
    async fn all_elections(&self, key: &AdminKey) -> Result<Elections> {
        public::all_elections(self, key).await
    }

    async fn create_election(
        &self,
        session: &AdminSession,
        spec: &ElectionSpec,
    ) -> Result<Option<ElectionId>> {
        admin::create_election(self, session, spec).await
    }

    async fn add_candidate(
        &self,
        session: &AdminSession,
        election_id: &ElectionId,
        candidate: &Candidate,
    ) -> Result<()> {
        admin::add_candidate(self, session, election_id, candidate).await
    }

    async fn change_admin(&self, session: &AdminSession, new_key: &AdminKey) -> Result<()> {
        admin::change_admin(self, session, new_key).await
    }

    async fn close_election(
        &self,
        session: &AdminSession,
        election_id: &ElectionId,
    ) -> Result<()> {
        admin::close_election(self, session, election_id).await
    }

    async fn cast_vote(&self, vote: &Vote) -> Result<()> {
        public::cast_vote(self, vote).await
    }

    async fn election_results(&self, election_id: &ElectionId) -> Result<ElectionResults> {
        public::election_results(self, election_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use figment::Jail;

    #[test]
    fn base_loses_trailing_slash() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "ElectionAdmin.toml",
                r#"api_base = "http://localhost:8000/api/""#,
            )?;
            let api = HttpApi::new(&Config::load(None).unwrap()).unwrap();
            assert_eq!(api.base(), "http://localhost:8000/api");
            assert_eq!(
                api.url("getAllElections"),
                "http://localhost:8000/api/getAllElections"
            );
            Ok(())
        });

        assert_eq!(
            HttpApi::with_base("http://localhost:8000/api//").base(),
            "http://localhost:8000/api"
        );
    }
}
