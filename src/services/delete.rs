use crate::domain::constants::MAIN_TRACK;
use crate::domain::models::{DeleteOutcome, EventContext, ModuleIdentity, SkipReason};
use crate::services::registry::{ErrorCode, Registry, RegistryError};
use crate::services::track::{
    require_track_inputs, resolve_track, unsupported_ref, Preflight, TrackError,
};
use tracing::info;

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error("cannot delete main track")]
    MainTrack,
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Resolves the track a branch deletion refers to, without touching the network.
pub fn preflight(ctx: &EventContext) -> Result<Preflight, DeleteError> {
    if let Some(reason) = unsupported_ref(ctx) {
        return Ok(Preflight::Skip(reason));
    }
    require_track_inputs(ctx)?;
    let track = resolve_track(&ctx.track, &ctx.default_branch, &ctx.ref_name);
    if track == MAIN_TRACK {
        return Err(DeleteError::MainTrack);
    }
    Ok(Preflight::Track(track))
}

/// Removes the registry track for a deleted branch. Missing tracks are a skip.
pub fn delete_track(
    registry: &dyn Registry,
    identity: &ModuleIdentity,
    ctx: &EventContext,
) -> Result<DeleteOutcome, DeleteError> {
    let track = match preflight(ctx)? {
        Preflight::Track(track) => track,
        Preflight::Skip(reason) => return Ok(DeleteOutcome::Skipped(reason)),
    };
    match registry.delete_track(identity, &track) {
        Ok(()) => {
            info!(%identity, %track, "deleted track");
            Ok(DeleteOutcome::Deleted { track })
        }
        Err(e) if e.code() == ErrorCode::NotFound => {
            Ok(DeleteOutcome::Skipped(SkipReason::TrackMissing { track }))
        }
        Err(e) => Err(e.into()),
    }
}
