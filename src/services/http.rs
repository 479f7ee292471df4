// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP plumbing shared by the provider clients.
//!
//! Every call is a read-only GET. Any non-success status becomes
//! `AppError::Upstream` tagged with the provider and resource; nothing is
//! retried.

use crate::error::AppError;
use crate::models::Provider;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;

const USER_AGENT_VALUE: &str = concat!("devstats/", env!("CARGO_PKG_VERSION"));

/// GET client bound to one provider.
#[derive(Clone)]
pub struct ProviderHttp {
    http: reqwest::Client,
    provider: Provider,
    headers: HeaderMap,
    token: Option<String>,
}

impl ProviderHttp {
    pub fn new(provider: Provider, token: Option<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Self {
            http: reqwest::Client::new(),
            provider,
            headers,
            token,
        }
    }

    /// Override the `Accept` header sent on every request.
    pub fn with_accept(mut self, accept: &'static str) -> Self {
        self.headers.insert(ACCEPT, HeaderValue::from_static(accept));
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Issue a GET and fail on any non-success status.
    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        resource: &str,
    ) -> Result<reqwest::Response, AppError> {
        let response = self.send(url, query, resource).await?;
        self.check_response(response, resource)
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        resource: &str,
    ) -> Result<T, AppError> {
        let response = self.get(url, query, resource).await?;
        self.decode(response, resource).await
    }

    /// GET that reports success as a boolean instead of an error.
    ///
    /// Used for probes where a non-success status is an answer, not a failure.
    /// Transport errors still propagate.
    pub async fn probe(&self, url: &str, resource: &str) -> Result<bool, AppError> {
        let response = self.send(url, &[], resource).await?;
        Ok(response.status().is_success())
    }

    pub async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        resource: &str,
    ) -> Result<T, AppError> {
        response
            .json()
            .await
            .map_err(|e| self.transport_error(resource, format!("JSON parse error: {}", e)))
    }

    async fn send(
        &self,
        url: &str,
        query: &[(&str, &str)],
        resource: &str,
    ) -> Result<reqwest::Response, AppError> {
        let mut request = self.http.get(url).headers(self.headers.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(provider = %self.provider, url, "Provider request");

        request
            .send()
            .await
            .map_err(|e| self.transport_error(resource, e.to_string()))
    }

    /// Check response status and return error if not successful.
    fn check_response(
        &self,
        response: reqwest::Response,
        resource: &str,
    ) -> Result<reqwest::Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 429 || status.as_u16() == 403 {
            tracing::warn!(
                provider = %self.provider,
                status = status.as_u16(),
                resource,
                "Provider refused request (possible rate limit)"
            );
        }

        Err(AppError::Upstream {
            provider: self.provider,
            resource: resource.to_string(),
            status: status.as_u16(),
        })
    }

    /// Failure with no usable status, such as a malformed body.
    pub fn transport_error(&self, resource: &str, message: String) -> AppError {
        AppError::UpstreamTransport {
            provider: self.provider,
            resource: resource.to_string(),
            message,
        }
    }
}

/// Percent-encode one path segment (handle, slug).
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
