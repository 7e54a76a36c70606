//! In-memory registry and git-host stand-ins for unit tests.

use crate::domain::models::{CommitTag, CompareStatus, Module, ModuleIdentity};
use crate::services::github::{CommitComparer, CompareError};
use crate::services::registry::{ErrorCode, Registry, RegistryError};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    TrackTags {
        track: String,
    },
    Push {
        files: usize,
        tags: Vec<String>,
        tracks: Vec<String>,
    },
    RepositoryId {
        full_name: String,
    },
    CreateTag {
        repository_id: String,
        name: String,
        reference: String,
    },
    DeleteTrack {
        track: String,
    },
}

pub struct FakeRegistry {
    pub tags: Result<Vec<String>, ErrorCode>,
    pub push: Result<String, ErrorCode>,
    pub repository: Result<String, ErrorCode>,
    pub create_tag: Result<String, ErrorCode>,
    pub delete: Result<(), ErrorCode>,
    calls: RefCell<Vec<Call>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self {
            tags: Ok(Vec::new()),
            push: Ok("c0ffee".to_string()),
            repository: Ok("repo-1".to_string()),
            create_tag: Ok("c0ffee".to_string()),
            delete: Ok(()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

fn fail(code: ErrorCode) -> RegistryError {
    RegistryError::rpc(code, "fake registry")
}

impl Registry for FakeRegistry {
    fn track_tags(
        &self,
        _identity: &ModuleIdentity,
        track: &str,
    ) -> Result<Vec<String>, RegistryError> {
        self.record(Call::TrackTags {
            track: track.to_string(),
        });
        self.tags.clone().map_err(fail)
    }

    fn push(
        &self,
        _identity: &ModuleIdentity,
        module: &Module,
        tags: &[String],
        tracks: &[String],
    ) -> Result<String, RegistryError> {
        self.record(Call::Push {
            files: module.files.len(),
            tags: tags.to_vec(),
            tracks: tracks.to_vec(),
        });
        self.push.clone().map_err(fail)
    }

    fn repository_id(&self, identity: &ModuleIdentity) -> Result<String, RegistryError> {
        self.record(Call::RepositoryId {
            full_name: identity.full_name(),
        });
        self.repository.clone().map_err(fail)
    }

    fn create_tag(
        &self,
        _identity: &ModuleIdentity,
        repository_id: &str,
        name: &str,
        reference: &str,
    ) -> Result<String, RegistryError> {
        self.record(Call::CreateTag {
            repository_id: repository_id.to_string(),
            name: name.to_string(),
            reference: reference.to_string(),
        });
        self.create_tag.clone().map_err(fail)
    }

    fn delete_track(&self, _identity: &ModuleIdentity, track: &str) -> Result<(), RegistryError> {
        self.record(Call::DeleteTrack {
            track: track.to_string(),
        });
        self.delete.map_err(fail)
    }
}

#[derive(Debug, Clone)]
pub enum FakeCompare {
    Status(CompareStatus),
    /// Base commit unknown to git.
    Missing,
    Fail,
}

/// Answers `Ahead` for any base it was not told about.
pub struct FakeComparer {
    answers: HashMap<String, FakeCompare>,
    calls: RefCell<Vec<(String, String)>>,
}

impl FakeComparer {
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with(mut self, base: &CommitTag, answer: FakeCompare) -> Self {
        self.answers.insert(base.to_string(), answer);
        self
    }

    /// `(base, head)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl CommitComparer for FakeComparer {
    fn compare(&self, base: &str, head: &str) -> Result<CompareStatus, CompareError> {
        self.calls
            .borrow_mut()
            .push((base.to_string(), head.to_string()));
        match self.answers.get(base) {
            None => Ok(CompareStatus::Ahead),
            Some(FakeCompare::Status(s)) => Ok(s.clone()),
            Some(FakeCompare::Missing) => Err(CompareError::NotFound {
                base: base.to_string(),
                head: head.to_string(),
            }),
            Some(FakeCompare::Fail) => Err(CompareError::Status {
                status: 500,
                message: "fake failure".to_string(),
            }),
        }
    }
}
