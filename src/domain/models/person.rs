//! Person domain model.
//!
//! A person moves through three shapes on its way to the record store:
//! [`PersonInput`] (decoded raw input, nothing enriched), [`NewPerson`]
//! (fully enriched, no identifier yet) and [`Person`] (persisted, with the
//! identifier assigned by the store). Only `NewPerson` can be created in the
//! store, so a partially enriched record cannot be persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::DecodeError;

/// Attribute looked up from an external inference provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Estimated age in years.
    Age,
    /// `male` or `female`.
    Gender,
    /// Most probable ISO country code.
    Nationality,
}

impl AttributeKind {
    /// All kinds, in lookup order.
    pub const ALL: [Self; 3] = [Self::Age, Self::Gender, Self::Nationality];

    /// Lowercase name, used in cache keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Nationality => "nationality",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Age in years, never 0.
    Age(u32),
    /// Gender as reported by the provider.
    Gender(String),
    /// ISO 3166-1 alpha-2 country code.
    Nationality(String),
}

impl AttributeValue {
    /// Kind this value answers.
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::Age(_) => AttributeKind::Age,
            Self::Gender(_) => AttributeKind::Gender,
            Self::Nationality(_) => AttributeKind::Nationality,
        }
    }

    /// Canonical string form, as stored in the attribute cache.
    pub fn to_cache_string(&self) -> String {
        match self {
            Self::Age(age) => age.to_string(),
            Self::Gender(s) | Self::Nationality(s) => s.clone(),
        }
    }

    /// Parse a cached string back into a value of `kind`.
    ///
    /// Returns `None` for values that could never have come from a provider
    /// (non-numeric or zero age, empty strings), so the caller treats them as
    /// a cache miss.
    pub fn from_cache_string(kind: AttributeKind, raw: &str) -> Option<Self> {
        match kind {
            AttributeKind::Age => raw.trim().parse::<u32>().ok().filter(|age| *age > 0).map(Self::Age),
            AttributeKind::Gender if !raw.is_empty() => Some(Self::Gender(raw.to_string())),
            AttributeKind::Nationality if !raw.is_empty() => Some(Self::Nationality(raw.to_string())),
            _ => None,
        }
    }
}

/// Decoded ingestion input: the names only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonInput {
    /// Given name; the enrichment lookup key.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Patronymic, absent when blank.
    pub patronymic: Option<String>,
}

#[derive(Deserialize)]
struct RawPersonInput {
    name: Option<String>,
    surname: Option<String>,
    patronymic: Option<String>,
}

impl PersonInput {
    /// Build an input from already validated names.
    pub fn new(name: impl Into<String>, surname: impl Into<String>, patronymic: Option<String>) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            patronymic,
        }
    }

    /// Decode a JSON payload such as
    /// `{"name":"Zahar","surname":"Ivanov","patronymic":"Andreevich"}`.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let raw: RawPersonInput =
            serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;

        Ok(Self {
            name: required(raw.name, "name")?,
            surname: required(raw.surname, "surname")?,
            patronymic: optional(raw.patronymic),
        })
    }

    /// Attach a complete enrichment, producing a record ready for creation.
    pub fn enriched(self, enrichment: Enrichment) -> NewPerson {
        NewPerson {
            name: self.name,
            surname: self.surname,
            patronymic: self.patronymic,
            age: enrichment.age,
            gender: enrichment.gender,
            nationality: enrichment.nationality,
        }
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, DecodeError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DecodeError::MissingField(field)),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn non_blank(value: &str, field: &'static str) -> Result<(), DecodeError> {
    if value.trim().is_empty() {
        return Err(DecodeError::MissingField(field));
    }
    Ok(())
}

/// The three looked-up attributes for one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    /// Estimated age.
    pub age: u32,
    /// Most probable gender.
    pub gender: String,
    /// Most probable country code.
    pub nationality: String,
}

/// A fully enriched person that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Patronymic, if any.
    pub patronymic: Option<String>,
    /// Age in years.
    pub age: u32,
    /// Gender.
    pub gender: String,
    /// ISO country code.
    pub nationality: String,
}

impl NewPerson {
    /// Attach the store-assigned identifier.
    pub fn with_id(self, id: i64) -> Person {
        Person {
            id,
            name: self.name,
            surname: self.surname,
            patronymic: self.patronymic,
            age: self.age,
            gender: self.gender,
            nationality: self.nationality,
        }
    }

    /// Reject records with a blank name, surname, gender or nationality.
    pub fn validate(&self) -> Result<(), DecodeError> {
        non_blank(&self.name, "name")?;
        non_blank(&self.surname, "surname")?;
        non_blank(&self.gender, "gender")?;
        non_blank(&self.nationality, "nationality")
    }

    /// Decode a full replacement body (`PUT /api/people/{id}`).
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        #[derive(Deserialize)]
        struct RawReplacement {
            name: Option<String>,
            surname: Option<String>,
            patronymic: Option<String>,
            age: Option<u32>,
            gender: Option<String>,
            nationality: Option<String>,
        }

        let raw: RawReplacement =
            serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;

        Ok(Self {
            name: required(raw.name, "name")?,
            surname: required(raw.surname, "surname")?,
            patronymic: optional(raw.patronymic),
            age: raw.age.ok_or(DecodeError::MissingField("age"))?,
            gender: required(raw.gender, "gender")?,
            nationality: required(raw.nationality, "nationality")?,
        })
    }
}

/// A persisted person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Store-assigned identifier.
    pub id: i64,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Patronymic, if any.
    pub patronymic: Option<String>,
    /// Age in years.
    pub age: u32,
    /// Gender.
    pub gender: String,
    /// ISO country code.
    pub nationality: String,
}

impl Person {
    /// Replace every field except the identifier.
    pub fn replace_with(self, replacement: NewPerson) -> Self {
        replacement.with_id(self.id)
    }
}
