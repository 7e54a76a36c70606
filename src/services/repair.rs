use crate::domain::models::ModuleIdentity;
use crate::services::registry::{ErrorCode, Registry, RegistryError};
use tracing::info;

#[derive(thiserror::Error, Debug)]
pub enum RepairError {
    #[error("a repository named {0:?} does not exist")]
    RepositoryNotFound(String),
    #[error("{identity}:{reference} does not exist")]
    ReferenceNotFound { identity: String, reference: String },
    #[error("{identity}:{tag} already exists with different content")]
    TagConflict { identity: String, tag: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Tags the commit `reference` points at with `tag_name`, for when the content
/// was already pushed by an earlier or concurrent run. Returns that commit's id.
pub fn repair(
    registry: &dyn Registry,
    identity: &ModuleIdentity,
    tag_name: &str,
    reference: &str,
) -> Result<String, RepairError> {
    let repository_id = match registry.repository_id(identity) {
        Ok(id) => id,
        Err(e) if e.code() == ErrorCode::NotFound => {
            return Err(RepairError::RepositoryNotFound(identity.to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    match registry.create_tag(identity, &repository_id, tag_name, reference) {
        Ok(commit) => {
            info!(%identity, tag = tag_name, reference, %commit, "tagged existing commit");
            Ok(commit)
        }
        Err(e) => Err(match e.code() {
            ErrorCode::NotFound => RepairError::ReferenceNotFound {
                identity: identity.to_string(),
                reference: reference.to_string(),
            },
            ErrorCode::AlreadyExists => RepairError::TagConflict {
                identity: identity.to_string(),
                tag: tag_name.to_string(),
            },
            _ => e.into(),
        }),
    }
}
