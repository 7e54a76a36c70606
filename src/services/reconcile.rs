//! Push reconciliation: decide whether the current commit needs pushing to its
//! track, push it, and fall back to tagging when the content is already there.
//!
//! At most one push and one tag repair happen per run. Re-running the same CI
//! event is safe: a duplicate push comes back as `already_exists` and is turned
//! into a tag on the existing commit.

use crate::domain::models::{EventContext, Module, ModuleIdentity, PushOutcome, PushResult};
use crate::services::github::CommitComparer;
use crate::services::history::{commit_tags, scan, HistoryError, HistoryVerdict};
use crate::services::output::WorkflowOutput;
use crate::services::registry::{ErrorCode, Registry, RegistryError};
use crate::services::repair::{repair, RepairError};
use crate::services::track::{
    is_cross_branch_main_write, require_track_inputs, resolve_track, unsupported_ref, Preflight,
    TrackError,
};
use std::io::Write;
use tracing::{debug, info};

#[derive(thiserror::Error, Debug)]
pub enum PushError {
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error("cannot push to main track from a non-default branch")]
    CrossBranchMain,
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Repair(#[from] RepairError),
}

/// Checks that need no network: ref type, required inputs, the main-track guard.
/// Yields the effective track when the push should go ahead.
pub fn preflight(ctx: &EventContext) -> Result<Preflight, PushError> {
    if let Some(reason) = unsupported_ref(ctx) {
        return Ok(Preflight::Skip(reason));
    }
    require_track_inputs(ctx)?;
    // A branch literally named main must not feed the main track when the
    // default branch is something else; that would interleave two histories.
    if is_cross_branch_main_write(&ctx.track, &ctx.default_branch, &ctx.ref_name) {
        return Err(PushError::CrossBranchMain);
    }
    Ok(Preflight::Track(resolve_track(
        &ctx.track,
        &ctx.default_branch,
        &ctx.ref_name,
    )))
}

pub struct PushRequest<'a> {
    pub event: &'a EventContext,
    pub current_commit: &'a str,
    pub identity: &'a ModuleIdentity,
    pub module: &'a Module,
}

pub struct Reconciler<'a> {
    registry: &'a dyn Registry,
    comparer: &'a dyn CommitComparer,
}

impl<'a> Reconciler<'a> {
    pub fn new(registry: &'a dyn Registry, comparer: &'a dyn CommitComparer) -> Self {
        Self { registry, comparer }
    }

    pub fn reconcile<W: Write>(
        &self,
        req: &PushRequest<'_>,
        out: &mut WorkflowOutput<W>,
    ) -> Result<PushOutcome, PushError> {
        let track = match preflight(req.event)? {
            Preflight::Skip(reason) => return Ok(PushOutcome::Skipped(reason)),
            Preflight::Track(track) => track,
        };
        info!(identity = %req.identity, %track, commit = req.current_commit, "reconciling track");

        let tags = match self.registry.track_tags(req.identity, &track) {
            Ok(names) => commit_tags(names),
            Err(e) if e.code() == ErrorCode::NotFound => {
                debug!(%track, "track has no registry history yet");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        debug!(count = tags.len(), "commit tags on track head");

        if let HistoryVerdict::Skip(reason) =
            scan(self.comparer, &tags, req.current_commit, &track, out)?
        {
            return Ok(PushOutcome::Skipped(reason));
        }

        let pushed = self.registry.push(
            req.identity,
            req.module,
            &[req.current_commit.to_string()],
            &[track.clone()],
        );
        let commit = match pushed {
            Ok(commit) => commit,
            Err(e) if e.code() == ErrorCode::AlreadyExists => {
                info!(%track, "content already pushed, tagging existing commit");
                repair(self.registry, req.identity, req.current_commit, &track)?
            }
            Err(e) => return Err(e.into()),
        };
        info!(%commit, %track, "track up to date");
        Ok(PushOutcome::Pushed(PushResult { commit, track }))
    }
}
