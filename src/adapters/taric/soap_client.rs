//! HTTP client for the EU TARIC goods description SOAP service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

use super::envelope::{goods_description_envelope, ResponseParser, UnparsedResponse};
use crate::domain::errors::RemoteLookupError;
use crate::domain::models::{
    CacheEntry, LanguageTag, RawPayload, RemoteConfig, RemoteLookup, TaricCode,
    EU_TARIC_WSDL_SOURCE,
};
use crate::domain::ports::RemoteLookupClient;

/// Longest error body kept in [`RemoteLookupError::UnexpectedStatus`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// SOAP-over-HTTP implementation of [`RemoteLookupClient`].
///
/// Every request is bounded by the configured total and connect timeouts.
/// The client never reads or writes the cache.
#[derive(Clone)]
pub struct TaricSoapClient {
    http: Client,
    endpoint: String,
    soap_action: Option<String>,
    timeout_secs: u64,
    parser: Arc<dyn ResponseParser>,
}

impl TaricSoapClient {
    /// Create a client from the remote section of the configuration.
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!("taric-official/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            soap_action: config.soap_action.clone(),
            timeout_secs: config.timeout_secs,
            parser: Arc::new(UnparsedResponse),
        })
    }

    /// Replace the response parser.
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn ResponseParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_transport_error(&self, err: &reqwest::Error) -> RemoteLookupError {
        if err.is_timeout() {
            RemoteLookupError::Timeout(self.timeout_secs)
        } else {
            RemoteLookupError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl RemoteLookupClient for TaricSoapClient {
    async fn fetch(
        &self,
        code: &TaricCode,
        language: &LanguageTag,
    ) -> Result<RemoteLookup, RemoteLookupError> {
        let envelope = goods_description_envelope(code, language);

        tracing::info!(code = %code, language = %language, "TARIC SOAP request");

        let mut request = self
            .http
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(envelope);
        if let Some(action) = &self.soap_action {
            request = request.header("SOAPAction", action);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            tracing::error!(status = status.as_u16(), code = %code, "TARIC SOAP unexpected status");
            return Err(RemoteLookupError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                RemoteLookupError::Timeout(self.timeout_secs)
            } else {
                RemoteLookupError::InvalidPayload(e.to_string())
            }
        })?;

        match self.parser.parse(code, language, &body)? {
            Some(description) => Ok(RemoteLookup::Found(CacheEntry::fetched_now(
                code.clone(),
                language.clone(),
                description,
                EU_TARIC_WSDL_SOURCE,
                Some(RawPayload::new(body)),
            ))),
            None => Ok(RemoteLookup::NotFound),
        }
    }
}
