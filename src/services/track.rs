use crate::domain::constants::MAIN_TRACK;
use crate::domain::models::{EventContext, SkipReason};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TrackError {
    #[error("track not provided")]
    MissingTrack,
    #[error("default_branch not provided")]
    MissingDefaultBranch,
}

/// Result of the network-free checks that run before a push or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preflight {
    Skip(SkipReason),
    /// Effective track to operate on.
    Track(String),
}

/// Only branch refs map onto tracks.
pub fn unsupported_ref(ctx: &EventContext) -> Option<SkipReason> {
    if ctx.ref_type.is_branch() {
        return None;
    }
    Some(SkipReason::UnsupportedRef {
        event: ctx.event_name.clone(),
        ref_type: ctx.ref_type.to_string(),
    })
}

pub fn require_track_inputs(ctx: &EventContext) -> Result<(), TrackError> {
    if ctx.track.is_empty() {
        return Err(TrackError::MissingTrack);
    }
    if ctx.default_branch.is_empty() {
        return Err(TrackError::MissingDefaultBranch);
    }
    Ok(())
}

/// Maps pushes from the default branch onto the `main` track.
///
/// Returns `main` when `track` equals `default_branch` and either equals `ref_name`
/// or no ref name is known (manual dispatch). Otherwise `track` is returned as is.
pub fn resolve_track(track: &str, default_branch: &str, ref_name: &str) -> String {
    if track == default_branch && (track == ref_name || ref_name.is_empty()) {
        return MAIN_TRACK.to_string();
    }
    track.to_string()
}

/// True when a branch literally named `main` would write to the `main` track
/// even though the repository's default branch is something else.
pub fn is_cross_branch_main_write(track: &str, default_branch: &str, ref_name: &str) -> bool {
    default_branch != MAIN_TRACK && track == MAIN_TRACK && track == ref_name
}
