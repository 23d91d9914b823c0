//! Provider response payloads.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! response (`count`, `probability`, echoed `name`) is ignored. Every field is
//! optional so that a structurally valid but empty answer maps to
//! `LookupError::NotFound` rather than a parse failure.

use serde::Deserialize;

/// `GET https://api.agify.io/?name=Zahar` -> `{"count":..,"name":"Zahar","age":35}`
#[derive(Debug, Clone, Deserialize)]
pub struct AgeResponse {
    /// Estimated age; `null` or `0` when unknown.
    #[serde(default)]
    pub age: Option<u32>,
}

/// `GET https://api.genderize.io/?name=Zahar` -> `{"gender":"male","probability":0.99,..}`
#[derive(Debug, Clone, Deserialize)]
pub struct GenderResponse {
    /// `male`, `female`, or `null` when unknown.
    #[serde(default)]
    pub gender: Option<String>,
}

/// `GET https://api.nationalize.io/?name=Zahar` -> `{"country":[{"country_id":"RU","probability":0.4}]}`
///
/// Countries arrive ordered by descending probability.
#[derive(Debug, Clone, Deserialize)]
pub struct NationalityResponse {
    /// Candidate countries, most probable first.
    #[serde(default)]
    pub country: Vec<CountryGuess>,
}

/// One entry of the nationality candidate list.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryGuess {
    /// ISO 3166-1 alpha-2 code.
    #[serde(default)]
    pub country_id: Option<String>,
}
