//! HTTP client seam shared by every provider implementation

use async_trait::async_trait;

use crate::domain::PipelineError;

/// Trait for the JSON HTTP operations providers need (for mocking).
///
/// Failures carry the status code inside the message so provider
/// implementations can classify them (rate limits in particular).
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// GET returning `None` on 404, so callers can probe for existence.
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<Option<serde_json::Value>, PipelineError>;

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, PipelineError>;

    async fn put_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, PipelineError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn send_json(
        &self,
        request: reqwest::RequestBuilder,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, PipelineError> {
        let mut request = request;

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(PipelineError::transport(format!(
                "HTTP {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PipelineError::transport(format!("Failed to parse response: {}", e)))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<Option<serde_json::Value>, PipelineError> {
        let mut request = self.client.get(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::transport(format!("Request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(PipelineError::transport(format!(
                "HTTP {}: {}",
                status, error_body
            )));
        }

        let json = response
            .json()
            .await
            .map_err(|e| PipelineError::transport(format!("Failed to parse response: {}", e)))?;

        Ok(Some(json))
    }

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, PipelineError> {
        self.send_json(self.client.post(url).json(body), headers)
            .await
    }

    async fn put_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, PipelineError> {
        self.send_json(self.client.put(url).json(body), headers)
            .await
    }
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::RwLock;

    use super::*;

    /// Canned-response client keyed by "METHOD url". Unmocked GETs act as
    /// 404s so existence probes can be tested without extra setup.
    #[derive(Debug, Default)]
    pub struct MockHttpClient {
        responses: RwLock<HashMap<String, serde_json::Value>>,
        errors: RwLock<HashMap<String, String>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(
            self,
            method: &str,
            url: impl Into<String>,
            response: serde_json::Value,
        ) -> Self {
            self.responses
                .write()
                .unwrap()
                .insert(format!("{} {}", method, url.into()), response);
            self
        }

        pub fn with_error(
            self,
            method: &str,
            url: impl Into<String>,
            error: impl Into<String>,
        ) -> Self {
            self.errors
                .write()
                .unwrap()
                .insert(format!("{} {}", method, url.into()), error.into());
            self
        }

        fn lookup(
            &self,
            method: &str,
            url: &str,
        ) -> Result<Option<serde_json::Value>, PipelineError> {
            let key = format!("{} {}", method, url);

            if let Some(error) = self.errors.read().unwrap().get(&key) {
                return Err(PipelineError::transport(error.clone()));
            }

            Ok(self.responses.read().unwrap().get(&key).cloned())
        }
    }

    #[async_trait]
    impl HttpClientTrait for MockHttpClient {
        async fn get_json(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
        ) -> Result<Option<serde_json::Value>, PipelineError> {
            self.lookup("GET", url)
        }

        async fn post_json(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
            _body: &serde_json::Value,
        ) -> Result<serde_json::Value, PipelineError> {
            self.lookup("POST", url)?.ok_or_else(|| {
                PipelineError::transport(format!("No mock response for POST {}", url))
            })
        }

        async fn put_json(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
            _body: &serde_json::Value,
        ) -> Result<serde_json::Value, PipelineError> {
            self.lookup("PUT", url)?.ok_or_else(|| {
                PipelineError::transport(format!("No mock response for PUT {}", url))
            })
        }
    }
}
