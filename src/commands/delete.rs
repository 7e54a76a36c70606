use crate::cli::Cli;
use crate::domain::models::{DeleteOutcome, EventContext};
use crate::services::deadline::Deadline;
use crate::services::delete::{delete_track, preflight};
use crate::services::module_reader::{DirModuleSource, ModuleSource};
use crate::services::output::WorkflowOutput;
use crate::services::registry::HttpRegistry;
use crate::services::track::Preflight;
use std::io::Write;

pub fn handle_delete<W: Write>(
    cli: &Cli,
    event: &EventContext,
    deadline: Deadline,
    out: &mut WorkflowOutput<W>,
) -> anyhow::Result<()> {
    if let Preflight::Skip(reason) = preflight(event)? {
        out.notice(&reason.to_string())?;
        return Ok(());
    }
    let (_, identity) = DirModuleSource.read(&cli.input)?;
    let registry = HttpRegistry::new(cli.require_registry_token()?, cli.registry_url(), deadline)?;
    match delete_track(&registry, &identity, event)? {
        DeleteOutcome::Skipped(reason) => out.notice(&reason.to_string())?,
        DeleteOutcome::Deleted { track } => out.notice(&format!("Deleted track {}", track))?,
    }
    Ok(())
}
