use crate::domain::constants::{
    COMMIT_TAG_LEN, EVENT_DELETE, EVENT_PUSH, EVENT_WORKFLOW_DISPATCH, REF_TYPE_BRANCH,
    REF_TYPE_TAG,
};
use serde::Serialize;
use std::fmt;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid module name {0:?}: expected <remote>/<owner>/<repository>")]
    Malformed(String),
}

/// Registry address of a module: `{remote}/{owner}/{repository}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleIdentity {
    pub remote: String,
    pub owner: String,
    pub repository: String,
}

impl ModuleIdentity {
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let trimmed = raw.trim();
        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(IdentityError::Malformed(trimmed.to_string()));
        }
        Ok(Self {
            remote: parts[0].to_string(),
            owner: parts[1].to_string(),
            repository: parts[2].to_string(),
        })
    }

    /// `owner/repository`, the name the registry indexes repositories by.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }

    pub fn commit_url(&self, commit: &str) -> String {
        format!("https://{}/tree/{}", self, commit)
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.remote, self.owner, self.repository)
    }
}

/// A dependency entry from the module config, e.g. `buf.build/acme/units:v2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReference {
    #[serde(flatten)]
    pub identity: ModuleIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl ModuleReference {
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let (name, reference) = match raw.trim().split_once(':') {
            Some((name, reference)) if !reference.is_empty() => {
                (name, Some(reference.to_string()))
            }
            Some((name, _)) => (name, None),
            None => (raw, None),
        };
        Ok(Self {
            identity: ModuleIdentity::parse(name)?,
            reference,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFile {
    pub path: String,
    pub content: Vec<u8>,
}

/// Module content as read from disk, ready to push.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Module {
    /// Relative, `/`-separated, sorted by path.
    pub files: Vec<ModuleFile>,
    pub dependencies: Vec<ModuleReference>,
    pub documentation: Option<String>,
    pub license: Option<String>,
}

/// A registry tag that records the git commit a registry commit was pushed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitTag(String);

impl CommitTag {
    /// Accepts only 40-character hex strings; everything else is some other kind of tag.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() != COMMIT_TAG_LEN {
            return None;
        }
        hex::decode(raw).ok()?;
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Git-history relationship of a candidate commit to a reference commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareStatus {
    Identical,
    Ahead,
    Behind,
    Diverged,
    /// The reference no longer exists in git history.
    NotFound,
    /// A status the git host reported that this tool does not know about.
    Other(String),
}

impl CompareStatus {
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "identical" => CompareStatus::Identical,
            "ahead" => CompareStatus::Ahead,
            "behind" => CompareStatus::Behind,
            "diverged" => CompareStatus::Diverged,
            other => CompareStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CompareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareStatus::Identical => f.write_str("identical"),
            CompareStatus::Ahead => f.write_str("ahead"),
            CompareStatus::Behind => f.write_str("behind"),
            CompareStatus::Diverged => f.write_str("diverged"),
            CompareStatus::NotFound => f.write_str("not_found"),
            CompareStatus::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefType {
    Branch,
    Tag,
    Other(String),
}

impl RefType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            REF_TYPE_BRANCH => RefType::Branch,
            REF_TYPE_TAG => RefType::Tag,
            other => RefType::Other(other.to_string()),
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, RefType::Branch)
    }
}

impl fmt::Display for RefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefType::Branch => f.write_str(REF_TYPE_BRANCH),
            RefType::Tag => f.write_str(REF_TYPE_TAG),
            RefType::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Push,
    WorkflowDispatch,
    Delete,
    Other(String),
}

impl EventKind {
    /// `None` when no event name was given at all.
    pub fn parse(raw: &str) -> Option<Self> {
        let kind = match raw {
            "" => return None,
            EVENT_PUSH => EventKind::Push,
            EVENT_WORKFLOW_DISPATCH => EventKind::WorkflowDispatch,
            EVENT_DELETE => EventKind::Delete,
            other => EventKind::Other(other.to_string()),
        };
        Some(kind)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Push => f.write_str(EVENT_PUSH),
            EventKind::WorkflowDispatch => f.write_str(EVENT_WORKFLOW_DISPATCH),
            EventKind::Delete => f.write_str(EVENT_DELETE),
            EventKind::Other(s) => f.write_str(s),
        }
    }
}

/// `owner/repo` on the git host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubRepository {
    pub owner: String,
    pub name: String,
}

impl GithubRepository {
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split('/').collect();
        if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        Some(Self {
            owner: parts[0].to_string(),
            name: parts[1].to_string(),
        })
    }
}

/// What triggered this run and which track it targets, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub event_name: String,
    pub ref_type: RefType,
    pub ref_name: String,
    pub track: String,
    pub default_branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushResult {
    pub commit: String,
    pub track: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedEvent { event: String },
    UnsupportedRef { event: String, ref_type: String },
    AlreadyHead { track: String },
    Behind { track: String },
    TrackMissing { track: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedEvent { event } => {
                write!(f, "Skipping because {:?} events are not supported", event)
            }
            SkipReason::UnsupportedRef { event, ref_type } => write!(
                f,
                "Skipping because {:?} events are not supported with {:?} references",
                event, ref_type
            ),
            SkipReason::AlreadyHead { track } => write!(
                f,
                "Skipping because the current git commit is already the head of track {}",
                track
            ),
            SkipReason::Behind { track } => write!(
                f,
                "Skipping because the current git commit is behind the head of track {}",
                track
            ),
            SkipReason::TrackMissing { track } => {
                write!(f, "Skipping because track {} does not exist", track)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Skipped(SkipReason),
    Pushed(PushResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Skipped(SkipReason),
    Deleted { track: String },
}
