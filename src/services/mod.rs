//! Repositories over the domain records, backed by an in-memory store or the REST API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::info;

use crate::config::BackendConfig;
use crate::error::Result;
use crate::fetch::ApiClient;
use crate::records::{
    Credentials, Document, Employee, Entity, FinancialRecord, ListFilter, Project,
    Session, Task, Team,
};

pub mod aggregates;
pub mod mock;
pub mod remote;
pub mod seed;

pub use aggregates::{DashboardSummary, FinancialSummary};
pub use mock::{MockAuthRepository, MockRepository};
pub use remote::{RemoteAuthRepository, RemoteRepository};

/// CRUD surface shared by every record kind.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<E>>;
    /// Fails with `AppError::NotFound` when no record has this id.
    async fn get(&self, id: &str) -> Result<E>;
    async fn create(&self, input: E::Create) -> Result<E>;
    async fn update(&self, id: &str, patch: E::Patch) -> Result<E>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn login(&self, credentials: Credentials) -> Result<Session>;
    async fn logout(&self) -> Result<()>;
    async fn session(&self) -> Result<Option<Session>>;
}

/// Repository handles built once at startup and shared with every screen.
#[derive(Clone)]
pub struct Repositories {
    pub projects: Arc<dyn Repository<Project>>,
    pub tasks: Arc<dyn Repository<Task>>,
    pub employees: Arc<dyn Repository<Employee>>,
    pub teams: Arc<dyn Repository<Team>>,
    pub documents: Arc<dyn Repository<Document>>,
    pub financials: Arc<dyn Repository<FinancialRecord>>,
    pub auth: Arc<dyn AuthRepository>,
}

impl Repositories {
    pub fn from_config(backend: &BackendConfig) -> Result<Self> {
        match backend {
            BackendConfig::Mock { latency } => {
                info!("Using in-memory repositories ({} ms latency)", latency.as_millis());
                Ok(Self::mock(*latency))
            }
            BackendConfig::Remote { base_url, timeout } => {
                info!("Using remote repositories at {base_url}");
                Ok(Self::remote(ApiClient::new(base_url.clone(), *timeout)?))
            }
        }
    }

    /// In-memory repositories filled with the fixed seed data set.
    pub fn mock(latency: Duration) -> Self {
        let seed = seed::SeedData::load();
        Self {
            projects: Arc::new(MockRepository::with_records(seed.projects, latency)),
            tasks: Arc::new(MockRepository::with_records(seed.tasks, latency)),
            employees: Arc::new(MockRepository::with_records(seed.employees, latency)),
            teams: Arc::new(MockRepository::with_records(seed.teams, latency)),
            documents: Arc::new(MockRepository::with_records(seed.documents, latency)),
            financials: Arc::new(MockRepository::with_records(seed.financials, latency)),
            auth: Arc::new(MockAuthRepository::new(seed.accounts, latency)),
        }
    }

    pub fn remote(client: ApiClient) -> Self {
        Self {
            projects: Arc::new(RemoteRepository::new(client.clone())),
            tasks: Arc::new(RemoteRepository::new(client.clone())),
            employees: Arc::new(RemoteRepository::new(client.clone())),
            teams: Arc::new(RemoteRepository::new(client.clone())),
            documents: Arc::new(RemoteRepository::new(client.clone())),
            financials: Arc::new(RemoteRepository::new(client.clone())),
            auth: Arc::new(RemoteAuthRepository::new(client)),
        }
    }
}

/// First numeric id above every numeric id already in use.
pub(crate) fn first_free_id<'a>(ids: impl Iterator<Item = &'a str>) -> u64 {
    ids.filter_map(|id| id.parse::<u64>().ok())
        .max()
        .map_or(1, |max| max + 1)
}
