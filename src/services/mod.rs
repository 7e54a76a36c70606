//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `track.rs` — effective track resolution + main-track guard.
//! - `history.rs` — commit-tag filtering and history classification.
//! - `reconcile.rs` — push decision, push, conflict fallback.
//! - `repair.rs` — tag an already-pushed commit after a push conflict.
//! - `delete.rs` — track removal for branch deletions.
//! - `registry.rs` — `Registry` trait + HTTP client.
//! - `github.rs` — `CommitComparer` trait + GitHub compare client.
//! - `module_reader.rs` — module directory to content + identity.
//! - `output.rs` — workflow command output.
//! - `deadline.rs` — whole-run time budget.
//!
//! ## Conventions
//! - Decision logic takes its collaborators as `&dyn Trait` arguments.
//! - Network-free checks run before anything that talks to a remote.
//! - Keep command handlers thin; delegate to services.

pub mod deadline;
pub mod delete;
pub mod github;
pub mod history;
pub mod module_reader;
pub mod output;
pub mod reconcile;
pub mod registry;
pub mod repair;
pub mod track;

#[cfg(test)]
pub mod fakes;
