use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use tokio::time::sleep;

use super::{first_free_id, AuthRepository, Repository};
use crate::error::{AppError, Result};
use crate::records::{Credentials, Entity, ListFilter, Session};

/// Session lifetime handed out by the mock login.
const MOCK_SESSION_TTL_HOURS: i64 = 8;

/// In-memory store that simulates backend latency before every call.
pub struct MockRepository<E: Entity> {
    records: RwLock<Vec<E>>,
    next_id: AtomicU64,
    latency: Duration,
}

impl<E: Entity> MockRepository<E> {
    pub fn new(latency: Duration) -> Self {
        Self::with_records(Vec::new(), latency)
    }

    pub fn with_records(records: Vec<E>, latency: Duration) -> Self {
        let next_id = first_free_id(records.iter().map(Entity::id));
        Self {
            records: RwLock::new(records),
            next_id: AtomicU64::new(next_id),
            latency,
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<E>> {
        self.records.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<E>> {
        self.records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MockRepository<E> {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<E>> {
        self.simulate_latency().await;
        let records = self
            .read()
            .iter()
            .filter(|record| record.matches(filter))
            .cloned()
            .collect::<Vec<_>>();
        debug!("mock list {} -> {} records", E::COLLECTION, records.len());
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<E> {
        self.simulate_latency().await;
        self.read()
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(E::KIND, id))
    }

    async fn create(&self, input: E::Create) -> Result<E> {
        self.simulate_latency().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let record = E::from_create(id, input)?;
        self.write().push(record.clone());
        debug!("mock created {} `{}`", E::KIND, record.id());
        Ok(record)
    }

    async fn update(&self, id: &str, patch: E::Patch) -> Result<E> {
        self.simulate_latency().await;
        let mut records = self.write();
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| AppError::not_found(E::KIND, id))?;
        record.apply_patch(patch)?;
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.simulate_latency().await;
        let mut records = self.write();
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            Err(AppError::not_found(E::KIND, id))
        } else {
            Ok(())
        }
    }
}

/// Login account known to the mock backend.
#[derive(Debug, Clone)]
pub struct MockAccount {
    pub username: String,
    pub password: String,
    pub display_name: String,
}

pub struct MockAuthRepository {
    accounts: HashMap<String, MockAccount>,
    session: RwLock<Option<Session>>,
    issued: AtomicU64,
    latency: Duration,
}

impl MockAuthRepository {
    pub fn new(accounts: Vec<MockAccount>, latency: Duration) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|account| (account.username.to_lowercase(), account))
            .collect();
        Self {
            accounts,
            session: RwLock::new(None),
            issued: AtomicU64::new(0),
            latency,
        }
    }

    fn store_session(&self, session: Option<Session>) {
        match self.session.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }
}

#[async_trait]
impl AuthRepository for MockAuthRepository {
    async fn login(&self, credentials: Credentials) -> Result<Session> {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }

        let username = credentials.username.trim();
        if username.is_empty() || credentials.password.is_empty() {
            return Err(AppError::validation("username and password are required"));
        }

        let account = self
            .accounts
            .get(&username.to_lowercase())
            .filter(|account| account.password == credentials.password)
            .ok_or(AppError::Unauthorized)?;

        let serial = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let session = Session {
            token: format!("mock-token-{}-{serial}", account.username),
            username: account.username.clone(),
            display_name: account.display_name.clone(),
            expires_at: Utc::now() + chrono::Duration::hours(MOCK_SESSION_TTL_HOURS),
        };
        info!("Signed in as {}", session.username);
        self.store_session(Some(session.clone()));
        Ok(session)
    }

    async fn logout(&self) -> Result<()> {
        self.store_session(None);
        Ok(())
    }

    async fn session(&self) -> Result<Option<Session>> {
        let session = match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        Ok(session.filter(|session| !session.is_expired_at(Utc::now())))
    }
}
