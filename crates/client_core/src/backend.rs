use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{AnalysisResult, Article, Language},
    error::ApiErrorBody,
    protocol::{
        AnalyzeRequest, AnalyzeResponse, HealthResponse, SearchResponse, TranslateRequest,
        TranslateResponse,
    },
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    analysis::AnalysisRequest,
    config::{ClientSettings, SearchRoute},
};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Malformed(String),
    #[error("backend reported error: {0}")]
    Reported(String),
    #[error("response is missing field `{0}`")]
    MissingField(&'static str),
}

/// Request/response contract of the search, analysis and translation service.
#[async_trait]
pub trait NewsBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Article>, BackendError>;
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, BackendError>;
    async fn translate(&self, text: &str, target: Language) -> Result<String, BackendError>;
    async fn health(&self) -> Result<(), BackendError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
    search_route: SearchRoute,
}

impl HttpBackend {
    /// `base_url` is used as given, minus trailing slashes.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            search_route: SearchRoute::Primary,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            search_route: settings.search_route,
        })
    }

    pub fn with_search_route(mut self, search_route: SearchRoute) -> Self {
        self.search_route = search_route;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| BackendError::Malformed(err.to_string()))
}

/// Consumes a non-2xx response, logging whatever error the body carried.
async fn status_failure(operation: &'static str, response: Response) -> BackendError {
    let status = response.status().as_u16();
    let reported = response
        .bytes()
        .await
        .ok()
        .and_then(|bytes| serde_json::from_slice::<ApiErrorBody>(&bytes).ok())
        .map(|body| body.error);
    warn!(operation, status, reported = ?reported, "backend: request failed");
    BackendError::Status(status)
}

#[async_trait]
impl NewsBackend for HttpBackend {
    async fn search(&self, query: &str) -> Result<Vec<Article>, BackendError> {
        let (path, param) = self.search_route.path_and_param();
        let response = self
            .http
            .get(self.endpoint(path))
            .query(&[(param, query)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_failure("search", response).await);
        }

        let body: SearchResponse = decode_body(response).await?;
        debug!(query, count = body.articles.len(), "backend: search decoded");
        Ok(body.articles)
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, BackendError> {
        let response = self
            .http
            .post(self.endpoint("analyze/"))
            .json(&AnalyzeRequest::from(request))
            .send()
            .await?;

        // A reported error wins over the status code.
        let status = response.status();
        let bytes = response.bytes().await?;
        let decoded = serde_json::from_slice::<AnalyzeResponse>(&bytes);
        if let Ok(body) = &decoded {
            if let Some(message) = body.reported_error() {
                return Err(BackendError::Reported(message.to_string()));
            }
        }
        if !status.is_success() {
            warn!(
                operation = "analyze",
                status = status.as_u16(),
                "backend: request failed"
            );
            return Err(BackendError::Status(status.as_u16()));
        }

        decoded
            .map_err(|err| BackendError::Malformed(err.to_string()))?
            .into_result()
            .map_err(BackendError::MissingField)
    }

    async fn translate(&self, text: &str, target: Language) -> Result<String, BackendError> {
        let response = self
            .http
            .post(self.endpoint("translate/"))
            .json(&TranslateRequest {
                text: text.to_string(),
                target_lang: target,
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_failure("translate", response).await);
        }

        let body: TranslateResponse = decode_body(response).await?;
        body.translated_text
            .ok_or(BackendError::MissingField("translated_text"))
    }

    async fn health(&self) -> Result<(), BackendError> {
        let response = self.http.get(self.endpoint("healthz")).send().await?;
        if !response.status().is_success() {
            return Err(status_failure("health", response).await);
        }

        let body: HealthResponse = decode_body(response).await?;
        if body.status != "ok" {
            return Err(BackendError::Reported(format!("health status {}", body.status)));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
