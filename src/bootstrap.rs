//! The admin session bootstrap: restore a remembered admin key, check it
//! against the API, and show the outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::{
    api::ElectionApi,
    error::{Error, Result},
    model::api::{admin::AdminKey, election::Elections},
    session::{AdminSession, AuthState, SessionStore},
    view::{render_elections, Severity, StatusBanner, View},
};

pub const EMPTY_KEY_MESSAGE: &str = "Please enter an admin key";
pub const AUTHENTICATED_MESSAGE: &str = "Authenticated as admin";
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Check your admin key.";
pub const LOGGED_OUT_MESSAGE: &str = "Logged out";

/// Marks an authentication attempt as in flight until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the admin session and drives the view through authentication.
pub struct Bootstrapper<A, S, V> {
    api: A,
    store: S,
    view: V,
    state: Mutex<AuthState>,
    authenticating: AtomicBool,
}

impl<A, S, V> Bootstrapper<A, S, V>
where
    A: ElectionApi,
    S: SessionStore,
    V: View,
{
    /// Start out unauthenticated.
    pub fn new(api: A, store: S, view: V) -> Self {
        Self {
            api,
            store,
            view,
            state: Mutex::new(AuthState::Unauthenticated),
            authenticating: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    fn state(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The live admin session, if authenticated.
    pub fn session(&self) -> Option<AdminSession> {
        self.state().session().cloned()
    }

    /// The live admin session, or [`Error::Unauthenticated`].
    pub fn require_session(&self) -> Result<AdminSession> {
        self.session().ok_or(Error::Unauthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Restore a remembered admin key, if there is one, and authenticate with it.
    ///
    /// With nothing stored this stays unauthenticated and makes no request.
    pub async fn restore_and_validate(&self) -> Result<Option<AdminSession>> {
        let stored = match self.store.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                debug!("No stored admin key, staying unauthenticated");
                return Ok(None);
            }
            Err(e) => {
                warn!("Could not read stored admin key: {e}");
                return Ok(None);
            }
        };
        self.view.set_credential_input(&stored);
        self.authenticate().await.map(Some)
    }

    /// Authenticate with whatever is in the credential input.
    ///
    /// The key is remembered before the check and forgotten again if the
    /// check fails. The cause of a failure goes to the log; the user only
    /// sees a fixed message.
    pub async fn authenticate(&self) -> Result<AdminSession> {
        let _in_flight = InFlight::acquire(&self.authenticating).ok_or_else(|| {
            warn!("Ignoring authentication request while another is outstanding");
            Error::AuthInProgress
        })?;

        let key = match AdminKey::parse(&self.view.credential_input()) {
            Ok(key) => key,
            Err(e) => {
                self.view
                    .show_status(&StatusBanner::new(Severity::Warning, EMPTY_KEY_MESSAGE));
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(key.as_str()) {
            warn!("Could not remember admin key: {e}");
        }

        match self.fetch_all_elections(&key).await {
            Ok(elections) => {
                info!("Authenticated as admin ({} elections)", elections.len());
                let session = AdminSession::new(key);
                *self.state() = AuthState::Authenticated(session.clone());
                self.view
                    .show_status(&StatusBanner::new(Severity::Success, AUTHENTICATED_MESSAGE));
                self.view.set_panel_visible(true);
                Ok(session)
            }
            Err(e) => {
                error!("Authentication failed: {e}");
                if let Err(e) = self.store.clear() {
                    warn!("Could not forget admin key: {e}");
                }
                *self.state() = AuthState::Unauthenticated;
                self.view
                    .show_status(&StatusBanner::new(Severity::Danger, AUTH_FAILED_MESSAGE));
                self.view.set_panel_visible(false);
                Err(e)
            }
        }
    }

    /// Fetch every election with `key` and render the list.
    pub async fn fetch_all_elections(&self, key: &AdminKey) -> Result<Elections> {
        let elections = self.api.all_elections(key).await?;
        render_elections(&self.view, &elections);
        Ok(elections)
    }

    /// Re-fetch and re-render the elections list for the live session.
    pub async fn refresh_elections(&self) -> Result<Elections> {
        let session = self.require_session()?;
        self.fetch_all_elections(session.key()).await
    }

    /// Replace the admin key. On success the new key becomes the live session
    /// and, if it can be stored, the remembered key.
    pub async fn change_admin(&self, new_key: &str) -> Result<AdminSession> {
        let session = self.require_session()?;
        let new_key = AdminKey::parse(new_key)?;
        self.api.change_admin(&session, &new_key).await?;

        info!("Admin key changed");
        self.view.set_credential_input(new_key.as_str());
        let session = AdminSession::new(new_key);
        *self.state() = AuthState::Authenticated(session.clone());

        // The old key is dead either way; never leave it remembered.
        if let Err(e) = self.store.save(session.key().as_str()) {
            warn!("Could not remember new admin key: {e}");
            if let Err(e) = self.store.clear() {
                warn!("Could not forget old admin key: {e}");
            }
        }
        Ok(session)
    }

    /// Drop the session and forget the remembered key.
    pub fn logout(&self) -> Result<()> {
        *self.state() = AuthState::Unauthenticated;
        self.view.set_credential_input("");
        self.view.set_panel_visible(false);
        self.store.clear()?;
        self.view
            .show_status(&StatusBanner::new(Severity::Success, LOGGED_OUT_MESSAGE));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::{
        api::HttpApi,
        model::common::election::ElectionId,
        session::MemorySessionStore,
        view::RecordingView,
    };

    use super::*;

    type TestBootstrapper = Bootstrapper<HttpApi, MemorySessionStore, RecordingView>;

    fn init_logging() {
        log4rs_test_utils::test_logging::init_logging_once_for(["election_admin"], None, None);
    }

    fn bootstrapper(server: &MockServer, store: MemorySessionStore) -> TestBootstrapper {
        init_logging();
        Bootstrapper::new(
            HttpApi::with_base(server.uri()),
            store,
            RecordingView::default(),
        )
    }

    fn listing(status: u16, body: serde_json::Value) -> Mock {
        Mock::given(method("GET"))
            .and(path("/getAllElections"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
    }

    fn two_elections() -> serde_json::Value {
        json!({
            "success": true,
            "elections": {
                "1": {"title": "Quidditch Captain"},
                "2": {"title": "Moongolf President"},
            },
        })
    }

    #[tokio::test]
    async fn restore_without_stored_key() {
        let server = MockServer::start().await;
        listing(200, two_elections()).expect(0).mount(&server).await;

        let bootstrapper = bootstrapper(&server, MemorySessionStore::default());
        assert_eq!(bootstrapper.restore_and_validate().await.unwrap(), None);
        assert!(!bootstrapper.is_authenticated());
        assert_eq!(bootstrapper.view().last_banner(), None);
        assert_eq!(bootstrapper.view().panel_visible(), None);
    }

    #[tokio::test]
    async fn restore_with_accepted_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getAllElections"))
            .and(header("X-Admin-Key", "abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(two_elections()))
            .expect(1)
            .mount(&server)
            .await;

        let bootstrapper = bootstrapper(&server, MemorySessionStore::with_value("abc123"));
        let session = bootstrapper.restore_and_validate().await.unwrap().unwrap();
        assert_eq!(session.key().as_str(), "abc123");

        let view = bootstrapper.view();
        assert_eq!(view.credential_input(), "abc123");
        assert_eq!(
            view.last_banner(),
            Some(StatusBanner::new(Severity::Success, AUTHENTICATED_MESSAGE))
        );
        assert_eq!(view.panel_visible(), Some(true));
        assert_eq!(
            view.listed(),
            Some(vec![ElectionId::from("1"), ElectionId::from("2")])
        );
        assert_eq!(
            bootstrapper.store.load().unwrap().as_deref(),
            Some("abc123")
        );
        assert_eq!(bootstrapper.session(), Some(session));
    }

    #[tokio::test]
    async fn restore_populates_exact_stored_value() {
        let server = MockServer::start().await;
        listing(200, two_elections()).expect(1).mount(&server).await;

        let bootstrapper = bootstrapper(&server, MemorySessionStore::with_value(" abc123 "));
        bootstrapper.restore_and_validate().await.unwrap();
        assert_eq!(bootstrapper.view().credential_input(), " abc123 ");
        assert_eq!(
            bootstrapper.store.load().unwrap().as_deref(),
            Some("abc123")
        );
    }

    #[tokio::test]
    async fn restore_with_rejected_key() {
        let server = MockServer::start().await;
        listing(200, json!({"success": false, "error": "bad key"}))
            .expect(1)
            .mount(&server)
            .await;

        let bootstrapper = bootstrapper(&server, MemorySessionStore::with_value("abc123"));
        let err = bootstrapper.restore_and_validate().await.unwrap_err();
        assert!(matches!(err, Error::Application(ref msg) if msg == "bad key"));

        let view = bootstrapper.view();
        assert_eq!(
            view.last_banner(),
            Some(StatusBanner::new(Severity::Danger, AUTH_FAILED_MESSAGE))
        );
        assert_eq!(view.panel_visible(), Some(false));
        assert_eq!(bootstrapper.store.load().unwrap(), None);
        assert!(!bootstrapper.is_authenticated());
    }

    #[tokio::test]
    async fn http_failure_discards_partial_payload() {
        let server = MockServer::start().await;
        listing(500, two_elections()).expect(1).mount(&server).await;

        let bootstrapper = bootstrapper(&server, MemorySessionStore::default());
        bootstrapper.view().set_credential_input("abc123");
        let err = bootstrapper.authenticate().await.unwrap_err();
        assert!(err.is_network());

        let view = bootstrapper.view();
        assert_eq!(view.panel_visible(), Some(false));
        assert_eq!(view.listed(), None);
        assert_eq!(bootstrapper.store.load().unwrap(), None);
        // The banner never shows the raw cause.
        assert_eq!(view.last_banner().unwrap().message, AUTH_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn blank_key_makes_no_request() {
        let server = MockServer::start().await;
        listing(200, two_elections()).expect(0).mount(&server).await;

        let bootstrapper = bootstrapper(&server, MemorySessionStore::default());
        for blank in ["", "   ", "\t"] {
            bootstrapper.view().set_credential_input(blank);
            let err = bootstrapper.authenticate().await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
            assert_eq!(
                bootstrapper.view().last_banner(),
                Some(StatusBanner::new(Severity::Warning, EMPTY_KEY_MESSAGE))
            );
        }
        assert_eq!(bootstrapper.store.load().unwrap(), None);
        assert_eq!(bootstrapper.view().panel_visible(), None);
    }

    #[tokio::test]
    async fn overlapping_authentication_is_refused() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getAllElections"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(two_elections())
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let bootstrapper = bootstrapper(&server, MemorySessionStore::default());
        bootstrapper.view().set_credential_input("abc123");
        let (first, second) = tokio::join!(bootstrapper.authenticate(), bootstrapper.authenticate());
        assert!(first.is_ok());
        assert!(matches!(second, Err(Error::AuthInProgress)));

        // The guard is released once the first attempt finishes.
        assert!(bootstrapper.authenticate().await.is_ok());
    }

    #[tokio::test]
    async fn change_admin_swaps_session() {
        let server = MockServer::start().await;
        listing(200, two_elections()).mount(&server).await;
        Mock::given(method("POST"))
            .and(path("/changeAdmin"))
            .and(header("X-Admin-Key", "abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let bootstrapper = bootstrapper(&server, MemorySessionStore::with_value("abc123"));
        bootstrapper.restore_and_validate().await.unwrap();

        let session = bootstrapper.change_admin("  dreip4lyfe ").await.unwrap();
        assert_eq!(session.key().as_str(), "dreip4lyfe");
        assert_eq!(bootstrapper.session(), Some(session));
        assert_eq!(
            bootstrapper.store.load().unwrap().as_deref(),
            Some("dreip4lyfe")
        );
    }

    #[tokio::test]
    async fn loosely_shaped_elections_still_authenticate() {
        let server = MockServer::start().await;
        listing(
            200,
            json!({
                "success": true,
                "elections": {
                    "1": {
                        "title": null,
                        "state": "active",
                        "start_time": "2025-03-10T08:00:00",
                        "end_time": "2025-03-12T08:00:00",
                        "votes": [],
                    },
                },
            }),
        )
        .expect(1)
        .mount(&server)
        .await;

        let bootstrapper = bootstrapper(&server, MemorySessionStore::with_value("abc123"));
        assert!(bootstrapper.restore_and_validate().await.unwrap().is_some());

        let view = bootstrapper.view();
        assert_eq!(
            view.last_banner(),
            Some(StatusBanner::new(Severity::Success, AUTHENTICATED_MESSAGE))
        );
        assert_eq!(view.panel_visible(), Some(true));
        assert_eq!(view.listed(), Some(vec![ElectionId::from("1")]));
        assert_eq!(
            bootstrapper.store.load().unwrap().as_deref(),
            Some("abc123")
        );
    }

    /// A store that remembers what it was seeded with but can't take new values.
    struct ReadOnlyStore(MemorySessionStore);

    impl SessionStore for ReadOnlyStore {
        fn load(&self) -> Result<Option<String>> {
            self.0.load()
        }

        fn save(&self, _value: &str) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn clear(&self) -> Result<()> {
            self.0.clear()
        }
    }

    #[tokio::test]
    async fn change_admin_survives_unwritable_store() {
        init_logging();
        let server = MockServer::start().await;
        listing(200, two_elections()).mount(&server).await;
        Mock::given(method("POST"))
            .and(path("/changeAdmin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let bootstrapper = Bootstrapper::new(
            HttpApi::with_base(server.uri()),
            ReadOnlyStore(MemorySessionStore::with_value("abc123")),
            RecordingView::default(),
        );
        bootstrapper.restore_and_validate().await.unwrap();

        let session = bootstrapper.change_admin("dreip4lyfe").await.unwrap();
        assert_eq!(session.key().as_str(), "dreip4lyfe");
        assert_eq!(
            bootstrapper.require_session().unwrap().key().as_str(),
            "dreip4lyfe"
        );
        assert_eq!(bootstrapper.view().credential_input(), "dreip4lyfe");
        // The rejected old key is not left behind.
        assert_eq!(bootstrapper.store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn change_admin_requires_session() {
        let server = MockServer::start().await;
        let bootstrapper = bootstrapper(&server, MemorySessionStore::default());
        assert!(matches!(
            bootstrapper.change_admin("dreip4lyfe").await,
            Err(Error::Unauthenticated)
        ));
        assert!(matches!(
            bootstrapper.refresh_elections().await,
            Err(Error::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn logout_forgets_key() {
        let server = MockServer::start().await;
        listing(200, two_elections()).mount(&server).await;

        let bootstrapper = bootstrapper(&server, MemorySessionStore::with_value("abc123"));
        bootstrapper.restore_and_validate().await.unwrap();
        assert!(bootstrapper.is_authenticated());

        bootstrapper.logout().unwrap();
        assert!(!bootstrapper.is_authenticated());
        assert_eq!(bootstrapper.store.load().unwrap(), None);
        assert_eq!(bootstrapper.view().panel_visible(), Some(false));
        assert_eq!(bootstrapper.view().credential_input(), "");
    }
}
