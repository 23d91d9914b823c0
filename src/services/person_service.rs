//! Person service shared by the HTTP and queue ingress paths.

use std::sync::Arc;

use crate::domain::errors::{DecodeError, DomainError, DomainResult};
use crate::domain::models::{NewPerson, Person, PersonInput};
use crate::domain::ports::PersonRepository;

use super::enrichment_service::EnrichmentService;

/// Create, read, update and delete people, enriching on create.
#[derive(Clone)]
pub struct PersonService {
    repository: Arc<dyn PersonRepository>,
    enrichment: Arc<EnrichmentService>,
}

impl PersonService {
    /// Service over `repository`, enriching new people with `enrichment`.
    pub fn new(repository: Arc<dyn PersonRepository>, enrichment: Arc<EnrichmentService>) -> Self {
        Self { repository, enrichment }
    }

    /// Decode raw ingress bytes into a person input.
    pub fn decode(&self, bytes: &[u8]) -> Result<PersonInput, DecodeError> {
        PersonInput::decode(bytes)
    }

    /// Enrich and persist a new person.
    ///
    /// Nothing is written unless all three lookups succeed.
    pub async fn create(&self, input: PersonInput) -> DomainResult<Person> {
        let enriched = self.enrichment.enrich(input).await?;
        let person = self.repository.create(&enriched).await?;
        tracing::info!(person_id = person.id, name = %person.name, "person created");
        Ok(person)
    }

    /// Fetch a person by identifier.
    pub async fn get(&self, id: i64) -> DomainResult<Option<Person>> {
        self.repository.get(id).await
    }

    /// Fetch the first person with exactly this given name.
    pub async fn find_by_name(&self, name: &str) -> DomainResult<Option<Person>> {
        self.repository.get_by_name(name).await
    }

    /// Replace every field of an existing person. No enrichment is performed.
    ///
    /// A replacement with a blank name, surname, gender or nationality is
    /// rejected with [`DomainError::Decode`] before the store is touched.
    pub async fn update(&self, id: i64, replacement: NewPerson) -> DomainResult<Person> {
        replacement.validate()?;
        let current = self.repository.get(id).await?.ok_or(DomainError::PersonNotFound(id))?;
        let updated = self.repository.update(&current.replace_with(replacement)).await?;
        tracing::info!(person_id = id, "person updated");
        Ok(updated)
    }

    /// Delete a person. Returns `false` if it did not exist.
    pub async fn delete(&self, id: i64) -> DomainResult<bool> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            tracing::info!(person_id = id, "person deleted");
        }
        Ok(deleted)
    }
}
