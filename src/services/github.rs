use crate::domain::constants::USER_AGENT;
use crate::domain::models::{CompareStatus, GithubRepository};
use crate::services::deadline::{Deadline, Elapsed};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    #[error("comparison {base}...{head} not found")]
    NotFound { base: String, head: String },
    #[error("github API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("github request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid github response: {0}")]
    Decode(String),
    #[error(transparent)]
    Timeout(#[from] Elapsed),
}

/// Git-history comparison backed by the git host.
pub trait CommitComparer {
    /// Relationship of `head` to `base`, e.g. `Ahead` when `head` descends from `base`.
    fn compare(&self, base: &str, head: &str) -> Result<CompareStatus, CompareError>;
}

pub struct GithubClient {
    client: Client,
    token: String,
    api_url: String,
    repository: GithubRepository,
    deadline: Deadline,
}

impl GithubClient {
    pub fn new(
        token: &str,
        api_url: &str,
        repository: GithubRepository,
        deadline: Deadline,
    ) -> Result<Self, CompareError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(CompareError::Transport)?;
        Ok(Self {
            client,
            token: token.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            repository,
            deadline,
        })
    }

    fn compare_url(&self, base: &str, head: &str) -> String {
        format!(
            "{}/repos/{}/{}/compare/{}...{}",
            self.api_url, self.repository.owner, self.repository.name, base, head
        )
    }

    fn transport_error(&self, e: reqwest::Error) -> CompareError {
        if e.is_timeout() {
            CompareError::Timeout(self.deadline.elapsed_error())
        } else {
            CompareError::Transport(e)
        }
    }
}

impl CommitComparer for GithubClient {
    fn compare(&self, base: &str, head: &str) -> Result<CompareStatus, CompareError> {
        let url = self.compare_url(base, head);
        let timeout = self.deadline.remaining()?;
        debug!(%url, "compare commits");
        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CompareError::NotFound {
                base: base.to_string(),
                head: head.to_string(),
            });
        }
        let body = resp.text().map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            return Err(CompareError::Status {
                status: status.as_u16(),
                message: api_message(&body),
            });
        }
        parse_compare_body(&body)
    }
}

#[derive(Deserialize)]
struct CompareResponse {
    status: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

fn parse_compare_body(body: &str) -> Result<CompareStatus, CompareError> {
    let resp: CompareResponse =
        serde_json::from_str(body).map_err(|e| CompareError::Decode(e.to_string()))?;
    Ok(CompareStatus::from_api(&resp.status))
}

fn api_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => body.trim().to_string(),
    }
}
