use std::marker::PhantomData;
use std::sync::RwLock;

use async_trait::async_trait;
use log::{info, warn};

use super::{AuthRepository, Repository};
use crate::error::{AppError, Result};
use crate::fetch::request::{collection_path, record_path, LOGIN_ENDPOINT, LOGOUT_ENDPOINT};
use crate::fetch::ApiClient;
use crate::records::{Credentials, Entity, ListFilter, Session};

/// Repository speaking the `/api/{collection}` REST contract.
pub struct RemoteRepository<E: Entity> {
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> RemoteRepository<E> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for RemoteRepository<E> {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<E>> {
        let path = collection_path(E::COLLECTION)?;
        let records: Option<Vec<E>> = self.client.get_json(&path, &filter.to_query()).await?;
        Ok(records.unwrap_or_default())
    }

    async fn get(&self, id: &str) -> Result<E> {
        let path = record_path(E::COLLECTION, id)?;
        self.client
            .get_json::<E>(&path, &[])
            .await?
            .ok_or_else(|| AppError::not_found(E::KIND, id))
    }

    async fn create(&self, input: E::Create) -> Result<E> {
        let path = collection_path(E::COLLECTION)?;
        self.client.post_json(&path, &input).await
    }

    async fn update(&self, id: &str, patch: E::Patch) -> Result<E> {
        let path = record_path(E::COLLECTION, id)?;
        self.client
            .put_json::<_, E>(&path, &patch)
            .await?
            .ok_or_else(|| AppError::not_found(E::KIND, id))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let path = record_path(E::COLLECTION, id)?;
        if self.client.delete(&path).await? {
            Ok(())
        } else {
            Err(AppError::not_found(E::KIND, id))
        }
    }
}

/// Login against the backend; the issued token is installed on the shared client.
pub struct RemoteAuthRepository {
    client: ApiClient,
    session: RwLock<Option<Session>>,
}

impl RemoteAuthRepository {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            session: RwLock::new(None),
        }
    }

    fn store_session(&self, session: Option<Session>) {
        self.client
            .set_token(session.as_ref().map(|session| session.token.clone()));
        match self.session.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }
}

#[async_trait]
impl AuthRepository for RemoteAuthRepository {
    async fn login(&self, credentials: Credentials) -> Result<Session> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(AppError::validation("username and password are required"));
        }

        let session: Session = self.client.post_json(LOGIN_ENDPOINT, &credentials).await?;
        info!("Signed in to {} as {}", self.client.base_url(), session.username);
        self.store_session(Some(session.clone()));
        Ok(session)
    }

    async fn logout(&self) -> Result<()> {
        if self.client.has_token() {
            if let Err(err) = self.client.post_empty(LOGOUT_ENDPOINT).await {
                warn!("Logout request failed, dropping local session anyway: {err}");
            }
        }
        self.store_session(None);
        Ok(())
    }

    async fn session(&self) -> Result<Option<Session>> {
        let session = match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Task, TaskStatus, Team, TeamPatch};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn formwork_team() -> Team {
        Team {
            id: "4".to_string(),
            name: "Formwork".to_string(),
            lead_id: Some("7".to_string()),
            member_ids: vec!["7".to_string(), "8".to_string()],
            project_id: Some("2".to_string()),
        }
    }

    #[tokio::test]
    async fn login_installs_bearer_token_for_later_requests() {
        let server = MockServer::start().await;
        let session = Session {
            token: "t-42".to_string(),
            username: "admin".to_string(),
            display_name: "Site Administrator".to_string(),
            expires_at: Utc.with_ymd_and_hms(2026, 12, 1, 8, 0, 0).unwrap(),
        };
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "username": "admin", "password": "admin123" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&session))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/teams/4"))
            .and(header("authorization", "Bearer t-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(formwork_team()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let auth = RemoteAuthRepository::new(client.clone());
        let teams = RemoteRepository::<Team>::new(client);

        let signed_in = auth.login(Credentials::new("admin", "admin123")).await.unwrap();
        assert_eq!(signed_in.token, "t-42");
        assert_eq!(teams.get("4").await.unwrap(), formwork_team());
    }

    #[tokio::test]
    async fn list_sends_filter_as_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .and(query_param("projectId", "2"))
            .and(query_param("status", "blocked"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = RemoteRepository::<Task>::new(client_for(&server));
        let filter = ListFilter::for_project("2").with_status(TaskStatus::Blocked);
        assert!(tasks.list(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_records_map_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(path("/api/teams/99"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let teams = RemoteRepository::<Team>::new(client_for(&server));
        assert!(teams.get("99").await.unwrap_err().is_not_found());
        assert!(teams.delete("99").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn rejected_credentials_map_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/teams"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let auth = RemoteAuthRepository::new(client.clone());
        let err = auth.login(Credentials::new("admin", "wrong")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
        assert!(!client.has_token());

        let teams = RemoteRepository::<Team>::new(client);
        let err = teams.list(&ListFilter::all()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn invalid_update_maps_to_validation() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/teams/4"))
            .and(body_json(json!({ "name": "" })))
            .respond_with(ResponseTemplate::new(422).set_body_string("team name is required"))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/teams/5"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let teams = RemoteRepository::<Team>::new(client_for(&server));
        let patch = TeamPatch {
            name: Some(String::new()),
            ..TeamPatch::default()
        };

        match teams.update("4", patch.clone()).await.unwrap_err() {
            AppError::Validation(message) => assert_eq!(message, "team name is required"),
            other => panic!("expected a validation error, got {other:?}"),
        }
        match teams.update("5", patch).await.unwrap_err() {
            AppError::Validation(message) => assert!(message.contains("400"), "{message}"),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn record_ids_are_sent_as_one_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/teams/a%2Fb"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let teams = RemoteRepository::<Team>::new(client_for(&server));
        teams.delete("a/b").await.unwrap();
    }

    #[tokio::test]
    async fn empty_credentials_never_reach_the_network() {
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let auth = RemoteAuthRepository::new(client);
        let err = auth.login(Credentials::new(" ", "x")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn logout_clears_the_shared_token() {
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let auth = RemoteAuthRepository::new(client.clone());
        auth.store_session(Some(Session {
            token: "t-1".to_string(),
            username: "admin".to_string(),
            display_name: "Admin".to_string(),
            expires_at: Utc::now(),
        }));
        assert_eq!(client.token().as_deref(), Some("t-1"));

        // The logout call itself fails (nothing listens on port 9); the local session still goes.
        auth.logout().await.unwrap();
        assert!(!client.has_token());
        assert!(auth.session().await.unwrap().is_none());
    }
}
