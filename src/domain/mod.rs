//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep identity, tag, status and outcome types in one place.
//! - Avoid cyclic imports between the reconciler and its collaborators.
//!
//! ## Files
//! - `models.rs` — module identity, commit tags, compare status, outcomes.
//! - `constants.rs` — env keys, output ids, canonical track name.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//! Parsing from raw strings is fine; talking to anything is not.

pub mod constants;
pub mod models;
