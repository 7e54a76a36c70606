//! Classifies the current git commit against commits already recorded on a track.

use crate::domain::models::{CommitTag, CompareStatus, SkipReason};
use crate::services::github::{CommitComparer, CompareError};
use crate::services::output::WorkflowOutput;
use std::io::Write;
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug)]
pub enum HistoryError {
    #[error("unexpected status: {0}")]
    UnexpectedStatus(String),
    #[error(transparent)]
    Compare(#[from] CompareError),
    #[error("failed to write notice: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryVerdict {
    Proceed,
    Skip(SkipReason),
}

/// Keeps registry order; tags that are not git commit markers are dropped.
pub fn commit_tags<I, S>(names: I) -> Vec<CommitTag>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| CommitTag::parse(name.as_ref()))
        .collect()
}

/// Where `candidate` stands relative to `reference`. A reference git no longer
/// knows about comes back as `NotFound` rather than an error.
pub fn classify(
    comparer: &dyn CommitComparer,
    candidate: &str,
    reference: &CommitTag,
) -> Result<CompareStatus, CompareError> {
    match comparer.compare(reference.as_str(), candidate) {
        Err(CompareError::NotFound { .. }) => Ok(CompareStatus::NotFound),
        other => other,
    }
}

/// Walks `tags` in order and stops at the first one showing the track already
/// holds `current` or something newer.
pub fn scan<W: Write>(
    comparer: &dyn CommitComparer,
    tags: &[CommitTag],
    current: &str,
    track: &str,
    out: &mut WorkflowOutput<W>,
) -> Result<HistoryVerdict, HistoryError> {
    for tag in tags {
        let status = classify(comparer, current, tag)?;
        debug!(%tag, %status, "compared track tag");
        match status {
            CompareStatus::Identical => {
                return Ok(HistoryVerdict::Skip(SkipReason::AlreadyHead {
                    track: track.to_string(),
                }))
            }
            CompareStatus::Behind => {
                return Ok(HistoryVerdict::Skip(SkipReason::Behind {
                    track: track.to_string(),
                }))
            }
            CompareStatus::NotFound => continue,
            CompareStatus::Diverged => {
                warn!(%tag, track, "current commit diverged from track history");
                out.notice(&format!(
                    "The current git commit is diverged from the head of track {}",
                    track
                ))?;
            }
            CompareStatus::Ahead => {}
            CompareStatus::Other(s) => return Err(HistoryError::UnexpectedStatus(s)),
        }
    }
    Ok(HistoryVerdict::Proceed)
}
