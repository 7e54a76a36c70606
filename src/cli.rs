use crate::domain::constants::{DEFAULT_GITHUB_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::domain::models::{EventContext, GithubRepository, RefType};
use clap::Parser;
use std::time::Duration;

/// Every input can come from a flag or from the environment the CI runner sets.
/// Empty values are treated as missing.
#[derive(Parser, Debug)]
#[command(
    name = "trackpush",
    version,
    about = "Push a module to its registry track from a CI event"
)]
pub struct Cli {
    #[arg(
        long,
        env = "INPUT_REGISTRY_TOKEN",
        hide_env_values = true,
        default_value = "",
        hide_default_value = true,
        help = "Registry authentication token"
    )]
    pub registry_token: String,
    #[arg(
        long,
        env = "INPUT_GITHUB_TOKEN",
        hide_env_values = true,
        default_value = "",
        hide_default_value = true,
        help = "GitHub token used to compare commits"
    )]
    pub github_token: String,
    #[arg(
        long,
        env = "INPUT_TRACK",
        default_value = "",
        hide_default_value = true,
        help = "Registry track to push to"
    )]
    pub track: String,
    #[arg(
        long,
        env = "INPUT_DEFAULT_BRANCH",
        default_value = "",
        hide_default_value = true,
        help = "Default branch of the git repository"
    )]
    pub default_branch: String,
    #[arg(
        long,
        env = "INPUT_INPUT",
        default_value = ".",
        help = "Directory containing the module"
    )]
    pub input: String,
    #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "", hide_default_value = true)]
    pub event_name: String,
    #[arg(long, env = "GITHUB_REF_NAME", default_value = "", hide_default_value = true)]
    pub ref_name: String,
    #[arg(long, env = "GITHUB_REF_TYPE", default_value = "", hide_default_value = true)]
    pub ref_type: String,
    #[arg(
        long,
        env = "GITHUB_SHA",
        default_value = "",
        hide_default_value = true,
        help = "Git commit being pushed"
    )]
    pub sha: String,
    #[arg(
        long,
        env = "GITHUB_REPOSITORY",
        default_value = "",
        hide_default_value = true,
        help = "GitHub repository as owner/repo"
    )]
    pub repository: String,
    #[arg(
        long,
        env = "GITHUB_API_URL",
        default_value = "",
        hide_default_value = true,
        help = "GitHub API base URL (default: https://api.github.com)"
    )]
    pub github_api_url: String,
    #[arg(
        long,
        env = "INPUT_REGISTRY_URL",
        help = "Registry API base URL (default: https://api.<module remote>)"
    )]
    pub registry_url: Option<String>,
    #[arg(
        long,
        env = "INPUT_TIMEOUT_SECS",
        default_value = "",
        hide_default_value = true,
        help = "Time budget for the whole run, in seconds (default: 120)"
    )]
    pub timeout_secs: String,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("a registry authentication token was not provided")]
    MissingRegistryToken,
    #[error("a github authentication token was not provided")]
    MissingGithubToken,
    #[error("a github repository was not provided")]
    MissingRepository,
    #[error("a github repository was not provided in the format owner/repo")]
    MalformedRepository,
    #[error("current git commit not found in environment")]
    MissingCommit,
    #[error("a github event name was not provided")]
    MissingEventName,
    #[error("timeout must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

impl Cli {
    pub fn event_context(&self) -> EventContext {
        EventContext {
            event_name: self.event_name.trim().to_string(),
            ref_type: RefType::parse(self.ref_type.trim()),
            ref_name: self.ref_name.trim().to_string(),
            track: self.track.trim().to_string(),
            default_branch: self.default_branch.trim().to_string(),
        }
    }

    pub fn require_registry_token(&self) -> Result<&str, InputError> {
        non_empty(&self.registry_token).ok_or(InputError::MissingRegistryToken)
    }

    pub fn require_github_token(&self) -> Result<&str, InputError> {
        non_empty(&self.github_token).ok_or(InputError::MissingGithubToken)
    }

    pub fn require_repository(&self) -> Result<GithubRepository, InputError> {
        let raw = non_empty(&self.repository).ok_or(InputError::MissingRepository)?;
        GithubRepository::parse(raw).ok_or(InputError::MalformedRepository)
    }

    pub fn require_commit(&self) -> Result<&str, InputError> {
        non_empty(&self.sha).ok_or(InputError::MissingCommit)
    }

    pub fn registry_url(&self) -> Option<String> {
        self.registry_url
            .as_deref()
            .and_then(non_empty)
            .map(str::to_string)
    }

    pub fn github_api_url(&self) -> &str {
        non_empty(&self.github_api_url).unwrap_or(DEFAULT_GITHUB_API_URL)
    }

    /// Blank means the default budget; anything else must be a positive integer.
    pub fn timeout(&self) -> Result<Duration, InputError> {
        let Some(raw) = non_empty(&self.timeout_secs) else {
            return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        };
        match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(InputError::InvalidTimeout(raw.to_string())),
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
