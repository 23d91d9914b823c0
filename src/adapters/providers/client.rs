//! reqwest-based `AttributeProvider`.
//!
//! All three providers share the same protocol: `GET {base_url}/?name={name}`
//! returning a small JSON object. Each provider instance answers for exactly
//! one attribute kind and owns nothing but its base URL and a handle to a
//! shared HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::domain::errors::LookupError;
use crate::domain::models::{AttributeKind, AttributeValue, ProvidersConfig};
use crate::domain::ports::AttributeProvider;

use super::models::{AgeResponse, GenderResponse, NationalityResponse};

/// Build the HTTP client shared by all providers.
///
/// The timeout bounds the whole request, body included.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("fio-enricher/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// HTTP client for a single inference provider.
#[derive(Debug, Clone)]
pub struct HttpAttributeProvider {
    kind: AttributeKind,
    base_url: String,
    http: Client,
}

impl HttpAttributeProvider {
    /// Provider for `kind` rooted at `base_url`.
    pub fn new(kind: AttributeKind, base_url: impl Into<String>, http: Client) -> Self {
        Self {
            kind,
            base_url: base_url.into(),
            http,
        }
    }

    /// One provider per kind, pointed at the configured endpoints.
    pub fn from_config(config: &ProvidersConfig, http: &Client) -> [Self; 3] {
        [
            Self::new(AttributeKind::Age, config.age_url.clone(), http.clone()),
            Self::new(AttributeKind::Gender, config.gender_url.clone(), http.clone()),
            Self::new(AttributeKind::Nationality, config.nationality_url.clone(), http.clone()),
        ]
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, LookupError> {
        let resp = self
            .http
            .get(self.endpoint())
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| self.transport(&e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LookupError::Provider {
                kind: self.kind,
                status: status.as_u16(),
                message: if body.is_empty() { status.to_string() } else { body },
            });
        }

        let body = resp.bytes().await.map_err(|e| self.transport(&e))?;
        serde_json::from_slice(&body).map_err(|e| LookupError::Provider {
            kind: self.kind,
            status: status.as_u16(),
            message: format!("unreadable response body: {e}"),
        })
    }

    fn transport(&self, err: &reqwest::Error) -> LookupError {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else {
            err.to_string()
        };
        LookupError::Transport {
            kind: self.kind,
            message,
        }
    }

    fn not_found(&self, name: &str) -> LookupError {
        LookupError::NotFound {
            kind: self.kind,
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl AttributeProvider for HttpAttributeProvider {
    fn kind(&self) -> AttributeKind {
        self.kind
    }

    async fn fetch(&self, name: &str) -> Result<AttributeValue, LookupError> {
        tracing::debug!(kind = %self.kind, name, "querying provider");

        match self.kind {
            AttributeKind::Age => {
                let resp: AgeResponse = self.get_json(name).await?;
                // agify answers `"age": null` for unknown names; zero is no better.
                resp.age
                    .filter(|age| *age > 0)
                    .map(AttributeValue::Age)
                    .ok_or_else(|| self.not_found(name))
            }
            AttributeKind::Gender => {
                let resp: GenderResponse = self.get_json(name).await?;
                resp.gender
                    .filter(|g| !g.is_empty())
                    .map(AttributeValue::Gender)
                    .ok_or_else(|| self.not_found(name))
            }
            AttributeKind::Nationality => {
                let resp: NationalityResponse = self.get_json(name).await?;
                resp.country
                    .into_iter()
                    .next()
                    .and_then(|c| c.country_id)
                    .filter(|id| !id.is_empty())
                    .map(AttributeValue::Nationality)
                    .ok_or_else(|| self.not_found(name))
            }
        }
    }
}
