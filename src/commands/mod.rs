//! Command handler layer.
//!
//! This module turns the parsed CI inputs into one service call and writes
//! the result as workflow commands.
//!
//! ## Files
//! - `push.rs` — `push` / `workflow_dispatch` events.
//! - `delete.rs` — `delete` events (branch removed).
//!
//! ## Principles
//! - Validate inputs here, before any client is built.
//! - Delegate business logic to `services/*`.
//! - Notices and outputs are the only stdout; logs go to stderr.

pub mod delete;
pub mod push;

pub use delete::handle_delete;
pub use push::handle_push;

use crate::cli::{Cli, InputError};
use crate::domain::models::{EventKind, SkipReason};
use crate::services::deadline::Deadline;
use crate::services::output::WorkflowOutput;
use std::io::Write;
use tracing::debug;

pub fn run<W: Write>(cli: &Cli, out: &mut WorkflowOutput<W>) -> anyhow::Result<()> {
    cli.require_registry_token()?;
    let kind = EventKind::parse(cli.event_name.trim()).ok_or(InputError::MissingEventName)?;
    let deadline = Deadline::after(cli.timeout()?);
    debug!(event = %kind, budget_secs = deadline.budget().as_secs(), "dispatching event");

    let event = cli.event_context();
    match kind {
        EventKind::Delete => handle_delete(cli, &event, deadline, out),
        EventKind::Push | EventKind::WorkflowDispatch => handle_push(cli, &event, deadline, out),
        EventKind::Other(event) => {
            out.notice(&SkipReason::UnsupportedEvent { event }.to_string())?;
            Ok(())
        }
    }
}
