//! Person repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{NewPerson, Person};

/// Repository interface for Person persistence.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Insert an enriched person and return it with its assigned identifier.
    async fn create(&self, person: &NewPerson) -> DomainResult<Person>;

    /// Get a person by ID.
    async fn get(&self, id: i64) -> DomainResult<Option<Person>>;

    /// Get the first person with the given given-name.
    async fn get_by_name(&self, name: &str) -> DomainResult<Option<Person>>;

    /// Overwrite every field of an existing person except its ID.
    ///
    /// Returns `DomainError::PersonNotFound` if no row has that ID.
    async fn update(&self, person: &Person) -> DomainResult<Person>;

    /// Delete a person by ID. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> DomainResult<bool>;
}
