//! GraphQL schema over the person service.
//!
//! Endpoint: `POST /graphql` with a standard `{"query": ..., "variables": ...}`
//! body. Responses that carry errors are sent with HTTP 500.

use async_graphql::{Context, EmptySubscription, Object, Result as GqlResult, Schema, SimpleObject};
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::models::{NewPerson, Person, PersonInput};
use crate::services::PersonService;

use super::AppState;

/// Executable schema served at `/graphql`.
pub type PersonSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// GraphQL person object.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Person")]
pub struct GqlPerson {
    /// Store-assigned identifier.
    pub id: i64,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Patronymic, if any.
    pub patronymic: Option<String>,
    /// Inferred age.
    pub age: u32,
    /// Inferred gender.
    pub gender: String,
    /// Inferred ISO country code.
    pub nationality: String,
}

impl From<Person> for GqlPerson {
    fn from(p: Person) -> Self {
        Self {
            id: p.id,
            name: p.name,
            surname: p.surname,
            patronymic: p.patronymic,
            age: p.age,
            gender: p.gender,
            nationality: p.nationality,
        }
    }
}

/// Read-only queries.
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Get a person by ID.
    async fn person(&self, ctx: &Context<'_>, id: i64) -> GqlResult<GqlPerson> {
        let people = ctx.data::<PersonService>()?;
        match people.get(id).await {
            Ok(Some(person)) => Ok(person.into()),
            Ok(None) => Err(async_graphql::Error::new("Person not found")),
            Err(e) => Err(async_graphql::Error::new(e.to_string())),
        }
    }
}

/// Create, update and delete mutations.
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Enrich and store a new person.
    async fn create_person(
        &self,
        ctx: &Context<'_>,
        name: String,
        surname: String,
        patronymic: Option<String>,
    ) -> GqlResult<GqlPerson> {
        let people = ctx.data::<PersonService>()?;
        if name.trim().is_empty() || surname.trim().is_empty() {
            return Err(async_graphql::Error::new("name and surname cannot be empty"));
        }

        let patronymic = patronymic.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
        let input = PersonInput::new(name.trim(), surname.trim(), patronymic);
        people
            .create(input)
            .await
            .map(GqlPerson::from)
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }

    /// Update a person. Omitted arguments keep their current value; an empty
    /// `patronymic` clears it.
    #[allow(clippy::too_many_arguments)]
    async fn update_person(
        &self,
        ctx: &Context<'_>,
        id: i64,
        name: Option<String>,
        surname: Option<String>,
        patronymic: Option<String>,
        age: Option<u32>,
        gender: Option<String>,
        nationality: Option<String>,
    ) -> GqlResult<GqlPerson> {
        let people = ctx.data::<PersonService>()?;
        let current = people
            .get(id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .ok_or_else(|| async_graphql::Error::new("Person not found"))?;

        let trimmed = |value: Option<String>, current: String| value.map_or(current, |v| v.trim().to_string());
        let replacement = NewPerson {
            name: trimmed(name, current.name),
            surname: trimmed(surname, current.surname),
            patronymic: match patronymic.as_deref().map(str::trim) {
                Some("") => None,
                Some(p) => Some(p.to_string()),
                None => current.patronymic,
            },
            age: age.unwrap_or(current.age),
            gender: trimmed(gender, current.gender),
            nationality: trimmed(nationality, current.nationality),
        };

        match people.update(id, replacement).await {
            Ok(person) => Ok(person.into()),
            Err(DomainError::PersonNotFound(_)) => Err(async_graphql::Error::new("Person not found")),
            Err(DomainError::Decode(_)) => Err(async_graphql::Error::new(
                "name, surname, gender and nationality cannot be empty",
            )),
            Err(e) => Err(async_graphql::Error::new(e.to_string())),
        }
    }

    /// Delete a person. Returns whether a record was removed.
    async fn delete_person(&self, ctx: &Context<'_>, id: i64) -> GqlResult<bool> {
        let people = ctx.data::<PersonService>()?;
        people.delete(id).await.map_err(|e| async_graphql::Error::new(e.to_string()))
    }
}

/// Build the schema with the person service as context data.
pub fn build_schema(people: PersonService) -> PersonSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(people)
        .finish()
}

pub(crate) async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<async_graphql::Request>,
) -> (StatusCode, Json<async_graphql::Response>) {
    let response = state.schema.execute(request).await;
    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(response))
}
