//! Enrichment coordinator.

use std::sync::Arc;

use crate::domain::errors::LookupError;
use crate::domain::models::{AttributeKind, AttributeValue, Enrichment, NewPerson, PersonInput};
use crate::domain::ports::{AttributeCache, AttributeProvider};

use super::enrichment_client::EnrichmentClient;

/// Runs the age, gender and nationality lookups for one person.
///
/// The three lookups run concurrently; the first failure wins and the
/// remaining lookups are dropped. A [`NewPerson`] only comes out of a fully
/// successful enrichment.
#[derive(Clone)]
pub struct EnrichmentService {
    age: EnrichmentClient,
    gender: EnrichmentClient,
    nationality: EnrichmentClient,
}

impl EnrichmentService {
    /// Combine three clients, one per attribute kind.
    pub fn new(age: EnrichmentClient, gender: EnrichmentClient, nationality: EnrichmentClient) -> Self {
        Self { age, gender, nationality }
    }

    /// Wire one client per provider over a shared cache.
    pub fn with_providers(
        cache: Arc<dyn AttributeCache>,
        age: Arc<dyn AttributeProvider>,
        gender: Arc<dyn AttributeProvider>,
        nationality: Arc<dyn AttributeProvider>,
    ) -> Self {
        Self::new(
            EnrichmentClient::new(cache.clone(), age),
            EnrichmentClient::new(cache.clone(), gender),
            EnrichmentClient::new(cache, nationality),
        )
    }

    /// Look up all three attributes for `input.name`.
    pub async fn enrich(&self, input: PersonInput) -> Result<NewPerson, LookupError> {
        let name = input.name.as_str();
        let (age, gender, nationality) = tokio::try_join!(
            self.age.resolve(name),
            self.gender.resolve(name),
            self.nationality.resolve(name),
        )?;

        let enrichment = Enrichment {
            age: match age {
                AttributeValue::Age(age) => age,
                other => return Err(mismatch(AttributeKind::Age, &other)),
            },
            gender: match gender {
                AttributeValue::Gender(gender) => gender,
                other => return Err(mismatch(AttributeKind::Gender, &other)),
            },
            nationality: match nationality {
                AttributeValue::Nationality(nationality) => nationality,
                other => return Err(mismatch(AttributeKind::Nationality, &other)),
            },
        };

        tracing::debug!(
            name,
            age = enrichment.age,
            gender = %enrichment.gender,
            nationality = %enrichment.nationality,
            "person enriched"
        );
        Ok(input.enriched(enrichment))
    }
}

fn mismatch(expected: AttributeKind, got: &AttributeValue) -> LookupError {
    LookupError::Provider {
        kind: expected,
        status: 0,
        message: format!("lookup yielded a {} value", got.kind()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::MokaAttributeCache;
    use async_trait::async_trait;

    struct FixedProvider(Result<AttributeValue, LookupError>, AttributeKind);

    #[async_trait]
    impl AttributeProvider for FixedProvider {
        fn kind(&self) -> AttributeKind {
            self.1
        }

        async fn fetch(&self, _name: &str) -> Result<AttributeValue, LookupError> {
            self.0.clone()
        }
    }

    fn ok(value: AttributeValue) -> Arc<dyn AttributeProvider> {
        let kind = value.kind();
        Arc::new(FixedProvider(Ok(value), kind))
    }

    #[tokio::test]
    async fn test_enrich_combines_all_attributes() {
        let service = EnrichmentService::with_providers(
            Arc::new(MokaAttributeCache::new()),
            ok(AttributeValue::Age(35)),
            ok(AttributeValue::Gender("male".to_string())),
            ok(AttributeValue::Nationality("RU".to_string())),
        );

        let input = PersonInput::new("Zahar", "Ivanov", Some("Andreevich".to_string()));
        let person = service.enrich(input).await.unwrap();

        assert_eq!(person.name, "Zahar");
        assert_eq!(person.patronymic.as_deref(), Some("Andreevich"));
        assert_eq!((person.age, person.gender.as_str(), person.nationality.as_str()), (35, "male", "RU"));
    }

    #[tokio::test]
    async fn test_enrich_fails_on_any_lookup_failure() {
        let not_found = LookupError::NotFound {
            kind: AttributeKind::Nationality,
            name: "Zahar".to_string(),
        };
        let service = EnrichmentService::with_providers(
            Arc::new(MokaAttributeCache::new()),
            ok(AttributeValue::Age(35)),
            ok(AttributeValue::Gender("male".to_string())),
            Arc::new(FixedProvider(Err(not_found.clone()), AttributeKind::Nationality)),
        );

        let result = service.enrich(PersonInput::new("Zahar", "Ivanov", None)).await;
        assert_eq!(result, Err(not_found));
    }
}
