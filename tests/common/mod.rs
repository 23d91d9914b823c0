//! Common test utilities for integration tests
//!
//! Provides fakes for the ports, a wiremock-backed set of enrichment
//! providers, and builders for the services under test.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fio_enricher::adapters::cache::MokaAttributeCache;
use fio_enricher::adapters::providers::{build_http_client, HttpAttributeProvider};
use fio_enricher::adapters::sqlite::{create_migrated_test_pool, SqliteMessageLog};
use fio_enricher::domain::errors::{DomainError, DomainResult};
use fio_enricher::domain::models::{AttributeKind, NewPerson, Person, PublishReceipt, QueueMessage};
use fio_enricher::domain::ports::{AttributeCache, DeadLetterSink, MessageLog, PersonRepository};
use fio_enricher::services::{EnrichmentService, PersonService};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Setup test logging
///
/// Call this at the beginning of tests that need log output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Path prefix under which each provider is mounted on the shared mock server.
pub fn provider_path(kind: AttributeKind) -> String {
    format!("/{}/", kind.as_str())
}

pub fn provider_base_url(server: &MockServer, kind: AttributeKind) -> String {
    format!("{}/{}", server.uri(), kind.as_str())
}

/// Stub one provider's answer for `name`.
pub async fn mount_provider(server: &MockServer, kind: AttributeKind, name: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(provider_path(kind)))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Stub all three providers with the canonical Zahar answers: 35 / male / RU.
pub async fn mount_zahar(server: &MockServer) {
    mount_provider(server, AttributeKind::Age, "Zahar", json!({"count": 120, "name": "Zahar", "age": 35})).await;
    mount_provider(
        server,
        AttributeKind::Gender,
        "Zahar",
        json!({"count": 120, "name": "Zahar", "gender": "male", "probability": 0.99}),
    )
    .await;
    mount_provider(
        server,
        AttributeKind::Nationality,
        "Zahar",
        json!({"count": 120, "name": "Zahar", "country": [{"country_id": "RU", "probability": 0.4}, {"country_id": "UA", "probability": 0.2}]}),
    )
    .await;
}

pub fn http_provider(server: &MockServer, kind: AttributeKind, timeout: Duration) -> HttpAttributeProvider {
    let http = build_http_client(timeout).unwrap();
    HttpAttributeProvider::new(kind, provider_base_url(server, kind), http)
}

pub fn enrichment_service(server: &MockServer, cache: Arc<dyn AttributeCache>) -> EnrichmentService {
    let timeout = Duration::from_secs(2);
    EnrichmentService::with_providers(
        cache,
        Arc::new(http_provider(server, AttributeKind::Age, timeout)),
        Arc::new(http_provider(server, AttributeKind::Gender, timeout)),
        Arc::new(http_provider(server, AttributeKind::Nationality, timeout)),
    )
}

pub fn person_service(server: &MockServer, repository: Arc<dyn PersonRepository>) -> PersonService {
    let cache: Arc<dyn AttributeCache> = Arc::new(MokaAttributeCache::new());
    PersonService::new(repository, Arc::new(enrichment_service(server, cache)))
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// `PersonRepository` held in memory.
#[derive(Default)]
pub struct InMemoryPersonRepository {
    people: Mutex<BTreeMap<i64, Person>>,
    next_id: AtomicI64,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self {
        Self {
            people: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn all(&self) -> Vec<Person> {
        self.people.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn create(&self, person: &NewPerson) -> DomainResult<Person> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let person = person.clone().with_id(id);
        self.people.lock().unwrap().insert(id, person.clone());
        Ok(person)
    }

    async fn get(&self, id: i64) -> DomainResult<Option<Person>> {
        Ok(self.people.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> DomainResult<Option<Person>> {
        Ok(self.people.lock().unwrap().values().find(|p| p.name == name).cloned())
    }

    async fn update(&self, person: &Person) -> DomainResult<Person> {
        let mut people = self.people.lock().unwrap();
        match people.get_mut(&person.id) {
            Some(existing) => {
                *existing = person.clone();
                Ok(person.clone())
            }
            None => Err(DomainError::PersonNotFound(person.id)),
        }
    }

    async fn delete(&self, id: i64) -> DomainResult<bool> {
        Ok(self.people.lock().unwrap().remove(&id).is_some())
    }
}

/// `PersonRepository` whose writes always fail.
pub struct FailingPersonRepository;

#[async_trait]
impl PersonRepository for FailingPersonRepository {
    async fn create(&self, _person: &NewPerson) -> DomainResult<Person> {
        Err(DomainError::DatabaseError("disk I/O error".to_string()))
    }

    async fn get(&self, _id: i64) -> DomainResult<Option<Person>> {
        Err(DomainError::DatabaseError("disk I/O error".to_string()))
    }

    async fn get_by_name(&self, _name: &str) -> DomainResult<Option<Person>> {
        Err(DomainError::DatabaseError("disk I/O error".to_string()))
    }

    async fn update(&self, _person: &Person) -> DomainResult<Person> {
        Err(DomainError::DatabaseError("disk I/O error".to_string()))
    }

    async fn delete(&self, _id: i64) -> DomainResult<bool> {
        Err(DomainError::DatabaseError("disk I/O error".to_string()))
    }
}

/// `DeadLetterSink` that records every payload it receives.
#[derive(Default)]
pub struct RecordingDeadLetterSink {
    payloads: Mutex<Vec<Vec<u8>>>,
}

impl RecordingDeadLetterSink {
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeadLetterSink for RecordingDeadLetterSink {
    async fn publish(&self, payload: &[u8]) -> DomainResult<PublishReceipt> {
        let mut payloads = self.payloads.lock().unwrap();
        payloads.push(payload.to_vec());
        Ok(PublishReceipt {
            partition: 0,
            offset: payloads.len() as i64 - 1,
        })
    }
}

// ---------------------------------------------------------------------------
// Message log
// ---------------------------------------------------------------------------

pub async fn message_log() -> Arc<SqliteMessageLog> {
    let pool = create_migrated_test_pool().await.unwrap();
    Arc::new(SqliteMessageLog::new(pool))
}

pub fn queue_message(offset: i64, payload: &[u8]) -> QueueMessage {
    QueueMessage {
        topic: "FIO".to_string(),
        partition: 0,
        offset,
        payload: payload.to_vec(),
    }
}

/// Poll `check` every 20ms until it holds or `timeout` elapses.
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Convenience: append `payload` to the `FIO` topic.
pub async fn publish(log: &dyn MessageLog, payload: &[u8]) -> PublishReceipt {
    log.append("FIO", 0, payload).await.unwrap()
}
