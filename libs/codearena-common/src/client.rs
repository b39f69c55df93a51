//! HTTP client for the judge backend

use crate::routes;
use crate::types::{
    CodeSubmission, Problem, ProblemDraft, ProblemSummary, RunResult, SolvedEntry, SubmitResult,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure, timeout, or malformed request
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Identifier that cannot be used as a single path segment
    #[error("Invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// 2xx response whose body did not match the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Execution backend seam
///
/// Implementations issue exactly one request per call. No retries.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    async fn run_code(
        &self,
        problem_id: &str,
        submission: &CodeSubmission,
    ) -> ClientResult<RunResult>;

    async fn submit_code(
        &self,
        problem_id: &str,
        submission: &CodeSubmission,
    ) -> ClientResult<SubmitResult>;
}

/// Read side of the problem bank
#[async_trait]
pub trait ProblemCatalog: Send + Sync {
    async fn fetch_problem(&self, problem_id: &str) -> ClientResult<Problem>;

    async fn list_problems(&self) -> ClientResult<Vec<ProblemSummary>>;

    /// Identifiers of problems the authenticated user has solved
    async fn solved_problem_ids(&self) -> ClientResult<Vec<String>>;
}

/// reqwest-backed implementation of both seams
#[derive(Debug, Clone)]
pub struct HttpJudgeClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpJudgeClient {
    /// Create a new client
    ///
    /// `timeout` of None keeps reqwest's default, which never times out.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach the session token sent as a bearer credential
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Admin: create a new problem from a validated draft
    pub async fn create_problem(&self, draft: &ProblemDraft) -> ClientResult<()> {
        self.post_draft(self.url(routes::PROBLEM_CREATE)?, draft).await
    }

    /// Admin: full problem document, hidden test cases included, ready for editing
    pub async fn fetch_admin_problem(&self, problem_id: &str) -> ClientResult<ProblemDraft> {
        self.get(self.resource_url(routes::ADMIN_PROBLEM_PREFIX, problem_id)?).await
    }

    /// Admin: replace an existing problem with a validated draft
    pub async fn update_problem(&self, problem_id: &str, draft: &ProblemDraft) -> ClientResult<()> {
        self.post_draft(self.resource_url(routes::PROBLEM_UPDATE_PREFIX, problem_id)?, draft)
            .await
    }

    /// Admin: remove the editorial video attached to a problem
    pub async fn delete_video(&self, problem_id: &str) -> ClientResult<()> {
        let url = self.resource_url(routes::VIDEO_DELETE_PREFIX, problem_id)?;
        debug!(path = url.path(), "DELETE");
        let response = self.authorize(self.client.delete(url.clone())).send().await?;
        Self::check_status(&url, response).await?;
        Ok(())
    }

    // ========== Internal HTTP helpers ==========

    fn url(&self, path: &str) -> ClientResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// `prefix` followed by `id` as one escaped path segment
    fn resource_url(&self, prefix: &str, id: &str) -> ClientResult<Url> {
        if !routes::is_valid_id(id) {
            return Err(ClientError::InvalidId(id.to_string()));
        }

        let mut url = self.url(prefix)?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .push(id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ClientResult<T> {
        debug!(path = url.path(), "GET");
        let response = self.authorize(self.client.get(url.clone())).send().await?;
        Self::handle_response(&url, response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> ClientResult<T> {
        debug!(path = url.path(), "POST");
        let response = self
            .authorize(self.client.post(url.clone()))
            .json(body)
            .send()
            .await?;
        Self::handle_response(&url, response).await
    }

    /// Admin writes answer with a message body nobody reads
    async fn post_draft(&self, url: Url, draft: &ProblemDraft) -> ClientResult<()> {
        debug!(path = url.path(), "POST");
        let response = self
            .authorize(self.client.post(url.clone()))
            .json(draft)
            .send()
            .await?;
        Self::check_status(&url, response).await?;
        Ok(())
    }

    async fn handle_response<T: DeserializeOwned>(
        url: &Url,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let response = Self::check_status(url, response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn check_status(url: &Url, response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::NOT_FOUND {
            Err(ClientError::NotFound(url.path().to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl ExecutionBackend for HttpJudgeClient {
    async fn run_code(
        &self,
        problem_id: &str,
        submission: &CodeSubmission,
    ) -> ClientResult<RunResult> {
        self.post(self.resource_url(routes::RUN_PREFIX, problem_id)?, submission)
            .await
    }

    async fn submit_code(
        &self,
        problem_id: &str,
        submission: &CodeSubmission,
    ) -> ClientResult<SubmitResult> {
        self.post(self.resource_url(routes::SUBMIT_PREFIX, problem_id)?, submission)
            .await
    }
}

#[async_trait]
impl ProblemCatalog for HttpJudgeClient {
    async fn fetch_problem(&self, problem_id: &str) -> ClientResult<Problem> {
        self.get(self.resource_url(routes::PROBLEM_PREFIX, problem_id)?)
            .await
    }

    async fn list_problems(&self) -> ClientResult<Vec<ProblemSummary>> {
        self.get(self.url(routes::PROBLEMS_ALL)?).await
    }

    async fn solved_problem_ids(&self) -> ClientResult<Vec<String>> {
        // the backend answers null when nothing is solved yet
        let entries: Option<Vec<SolvedEntry>> = self.get(self.url(routes::PROBLEMS_SOLVED)?).await?;
        Ok(entries
            .unwrap_or_default()
            .into_iter()
            .map(SolvedEntry::into_id)
            .collect())
    }
}
