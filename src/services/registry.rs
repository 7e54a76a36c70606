use crate::domain::constants::USER_AGENT;
use crate::domain::models::{Module, ModuleIdentity, ModuleReference};
use crate::services::deadline::{Deadline, Elapsed};
use base64::Engine;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const COMMIT_SERVICE: &str = "buf.alpha.registry.v1alpha1.RepositoryCommitService";
const PUSH_SERVICE: &str = "buf.alpha.registry.v1alpha1.PushService";
const REPOSITORY_SERVICE: &str = "buf.alpha.registry.v1alpha1.RepositoryService";
const TAG_SERVICE: &str = "buf.alpha.registry.v1alpha1.RepositoryTagService";
const TRACK_SERVICE: &str = "buf.alpha.registry.v1alpha1.RepositoryTrackService";

/// Status codes carried by registry errors (Connect/gRPC code space).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Canceled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl ErrorCode {
    pub fn from_connect(raw: &str) -> Self {
        match raw {
            "canceled" => ErrorCode::Canceled,
            "invalid_argument" => ErrorCode::InvalidArgument,
            "deadline_exceeded" => ErrorCode::DeadlineExceeded,
            "not_found" => ErrorCode::NotFound,
            "already_exists" => ErrorCode::AlreadyExists,
            "permission_denied" => ErrorCode::PermissionDenied,
            "resource_exhausted" => ErrorCode::ResourceExhausted,
            "failed_precondition" => ErrorCode::FailedPrecondition,
            "aborted" => ErrorCode::Aborted,
            "out_of_range" => ErrorCode::OutOfRange,
            "unimplemented" => ErrorCode::Unimplemented,
            "internal" => ErrorCode::Internal,
            "unavailable" => ErrorCode::Unavailable,
            "data_loss" => ErrorCode::DataLoss,
            "unauthenticated" => ErrorCode::Unauthenticated,
            _ => ErrorCode::Unknown,
        }
    }

    /// Fallback when the body is not a Connect error (proxies, gateways).
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => ErrorCode::InvalidArgument,
            401 => ErrorCode::Unauthenticated,
            403 => ErrorCode::PermissionDenied,
            404 => ErrorCode::NotFound,
            409 => ErrorCode::AlreadyExists,
            429 | 502 | 503 | 504 => ErrorCode::Unavailable,
            501 => ErrorCode::Unimplemented,
            _ => ErrorCode::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Canceled => "canceled",
            ErrorCode::Unknown => "unknown",
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::DeadlineExceeded => "deadline_exceeded",
            ErrorCode::NotFound => "not_found",
            ErrorCode::AlreadyExists => "already_exists",
            ErrorCode::PermissionDenied => "permission_denied",
            ErrorCode::ResourceExhausted => "resource_exhausted",
            ErrorCode::FailedPrecondition => "failed_precondition",
            ErrorCode::Aborted => "aborted",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::Unimplemented => "unimplemented",
            ErrorCode::Internal => "internal",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::DataLoss => "data_loss",
            ErrorCode::Unauthenticated => "unauthenticated",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("{code}: {message}")]
    Rpc { code: ErrorCode, message: String },
    #[error("registry request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid registry response: {0}")]
    Decode(String),
    #[error(transparent)]
    Timeout(#[from] Elapsed),
}

impl RegistryError {
    pub fn rpc(code: ErrorCode, message: impl Into<String>) -> Self {
        RegistryError::Rpc {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::Rpc { code, .. } => *code,
            RegistryError::Timeout(_) => ErrorCode::DeadlineExceeded,
            RegistryError::Transport(_) | RegistryError::Decode(_) => ErrorCode::Unknown,
        }
    }
}

/// Registry operations the push and delete flows depend on.
pub trait Registry {
    /// Raw tag names on the commit the `track` reference currently points at.
    fn track_tags(&self, identity: &ModuleIdentity, track: &str)
        -> Result<Vec<String>, RegistryError>;

    /// Pushes module content and returns the new registry commit id.
    fn push(
        &self,
        identity: &ModuleIdentity,
        module: &Module,
        tags: &[String],
        tracks: &[String],
    ) -> Result<String, RegistryError>;

    fn repository_id(&self, identity: &ModuleIdentity) -> Result<String, RegistryError>;

    /// Creates tag `name` at `reference` and returns the commit id it points at.
    fn create_tag(
        &self,
        identity: &ModuleIdentity,
        repository_id: &str,
        name: &str,
        reference: &str,
    ) -> Result<String, RegistryError>;

    fn delete_track(&self, identity: &ModuleIdentity, track: &str) -> Result<(), RegistryError>;
}

/// Unary JSON-over-HTTP client for the registry API.
pub struct HttpRegistry {
    client: Client,
    token: String,
    base_url: Option<String>,
    deadline: Deadline,
}

impl HttpRegistry {
    /// `base_url` overrides the default `https://api.<remote>` endpoint.
    pub fn new(
        token: &str,
        base_url: Option<String>,
        deadline: Deadline,
    ) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(RegistryError::Transport)?;
        Ok(Self {
            client,
            token: token.to_string(),
            base_url,
            deadline,
        })
    }

    fn endpoint(&self, identity: &ModuleIdentity, service: &str, method: &str) -> String {
        let base = match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://api.{}", identity.remote),
        };
        format!("{}/{}/{}", base, service, method)
    }

    fn call<Req, Resp>(
        &self,
        identity: &ModuleIdentity,
        service: &str,
        method: &str,
        req: &Req,
    ) -> Result<Resp, RegistryError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(identity, service, method);
        let timeout = self.deadline.remaining()?;
        debug!(%url, "registry call");
        let resp = self
            .client
            .post(&url)
            .timeout(timeout)
            .bearer_auth(&self.token)
            .header("Connect-Protocol-Version", "1")
            .json(req)
            .send()
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let body = resp.bytes().map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            return Err(decode_error(status.as_u16(), &body));
        }
        serde_json::from_slice(&body).map_err(|e| RegistryError::Decode(e.to_string()))
    }

    fn transport_error(&self, e: reqwest::Error) -> RegistryError {
        if e.is_timeout() {
            RegistryError::Timeout(self.deadline.elapsed_error())
        } else {
            RegistryError::Transport(e)
        }
    }
}

impl Registry for HttpRegistry {
    fn track_tags(
        &self,
        identity: &ModuleIdentity,
        track: &str,
    ) -> Result<Vec<String>, RegistryError> {
        let resp: GetCommitByReferenceResponse = self.call(
            identity,
            COMMIT_SERVICE,
            "GetRepositoryCommitByReference",
            &GetCommitByReferenceRequest {
                repository_owner: &identity.owner,
                repository_name: &identity.repository,
                reference: track,
            },
        )?;
        let commit = resp
            .repository_commit
            .ok_or_else(|| RegistryError::Decode("missing repositoryCommit".to_string()))?;
        Ok(commit.tags.into_iter().map(|t| t.name).collect())
    }

    fn push(
        &self,
        identity: &ModuleIdentity,
        module: &Module,
        tags: &[String],
        tracks: &[String],
    ) -> Result<String, RegistryError> {
        let resp: PushResponse = self.call(
            identity,
            PUSH_SERVICE,
            "Push",
            &PushRequest {
                owner: &identity.owner,
                repository: &identity.repository,
                branch: "",
                module: WireModule::from_module(module),
                tags,
                tracks,
            },
        )?;
        resp.local_module_pin
            .map(|pin| pin.commit)
            .ok_or_else(|| RegistryError::Decode("missing localModulePin".to_string()))
    }

    fn repository_id(&self, identity: &ModuleIdentity) -> Result<String, RegistryError> {
        let full_name = identity.full_name();
        let resp: GetRepositoryResponse = self.call(
            identity,
            REPOSITORY_SERVICE,
            "GetRepositoryByFullName",
            &GetRepositoryByFullNameRequest {
                full_name: &full_name,
            },
        )?;
        resp.repository
            .map(|r| r.id)
            .ok_or_else(|| RegistryError::Decode("missing repository".to_string()))
    }

    fn create_tag(
        &self,
        identity: &ModuleIdentity,
        repository_id: &str,
        name: &str,
        reference: &str,
    ) -> Result<String, RegistryError> {
        let resp: CreateRepositoryTagResponse = self.call(
            identity,
            TAG_SERVICE,
            "CreateRepositoryTag",
            &CreateRepositoryTagRequest {
                repository_id,
                name,
                commit_name: reference,
            },
        )?;
        resp.repository_tag
            .map(|t| t.commit_name)
            .ok_or_else(|| RegistryError::Decode("missing repositoryTag".to_string()))
    }

    fn delete_track(&self, identity: &ModuleIdentity, track: &str) -> Result<(), RegistryError> {
        let _: serde_json::Value = self.call(
            identity,
            TRACK_SERVICE,
            "DeleteRepositoryTrackByName",
            &DeleteTrackRequest {
                owner_name: &identity.owner,
                repository_name: &identity.repository,
                name: track,
            },
        )?;
        Ok(())
    }
}

/// Maps a non-2xx response to an error code, preferring the Connect error body.
pub fn decode_error(status: u16, body: &[u8]) -> RegistryError {
    if let Ok(err) = serde_json::from_slice::<ConnectError>(body) {
        if !err.code.is_empty() {
            return RegistryError::rpc(ErrorCode::from_connect(&err.code), err.message);
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    let message = if text.is_empty() {
        format!("HTTP {}", status)
    } else {
        text
    };
    RegistryError::rpc(ErrorCode::from_http_status(status), message)
}

#[derive(Deserialize)]
struct ConnectError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetCommitByReferenceRequest<'a> {
    repository_owner: &'a str,
    repository_name: &'a str,
    reference: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetCommitByReferenceResponse {
    repository_commit: Option<WireCommit>,
}

#[derive(Deserialize)]
struct WireCommit {
    #[serde(default)]
    tags: Vec<WireTag>,
}

#[derive(Deserialize)]
struct WireTag {
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PushRequest<'a> {
    owner: &'a str,
    repository: &'a str,
    branch: &'a str,
    module: WireModule<'a>,
    tags: &'a [String],
    tracks: &'a [String],
}

#[derive(Serialize)]
struct WireModule<'a> {
    files: Vec<WireFile<'a>>,
    dependencies: &'a [ModuleReference],
    #[serde(skip_serializing_if = "Option::is_none")]
    documentation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<&'a str>,
}

impl<'a> WireModule<'a> {
    fn from_module(module: &'a Module) -> Self {
        let engine = base64::engine::general_purpose::STANDARD;
        Self {
            files: module
                .files
                .iter()
                .map(|f| WireFile {
                    path: &f.path,
                    content: engine.encode(&f.content),
                })
                .collect(),
            dependencies: &module.dependencies,
            documentation: module.documentation.as_deref(),
            license: module.license.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct WireFile<'a> {
    path: &'a str,
    content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PushResponse {
    local_module_pin: Option<WirePin>,
}

#[derive(Deserialize)]
struct WirePin {
    commit: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetRepositoryByFullNameRequest<'a> {
    full_name: &'a str,
}

#[derive(Deserialize)]
struct GetRepositoryResponse {
    repository: Option<WireRepository>,
}

#[derive(Deserialize)]
struct WireRepository {
    id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRepositoryTagRequest<'a> {
    repository_id: &'a str,
    name: &'a str,
    commit_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRepositoryTagResponse {
    repository_tag: Option<WireRepositoryTag>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRepositoryTag {
    commit_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteTrackRequest<'a> {
    owner_name: &'a str,
    repository_name: &'a str,
    name: &'a str,
}
