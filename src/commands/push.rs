use crate::cli::Cli;
use crate::domain::constants::{COMMIT_OUTPUT_ID, COMMIT_URL_OUTPUT_ID};
use crate::domain::models::{EventContext, PushOutcome};
use crate::services::deadline::Deadline;
use crate::services::github::GithubClient;
use crate::services::module_reader::{DirModuleSource, ModuleSource};
use crate::services::output::WorkflowOutput;
use crate::services::reconcile::{preflight, PushRequest, Reconciler};
use crate::services::registry::HttpRegistry;
use crate::services::track::Preflight;
use std::io::Write;
use tracing::info;

pub fn handle_push<W: Write>(
    cli: &Cli,
    event: &EventContext,
    deadline: Deadline,
    out: &mut WorkflowOutput<W>,
) -> anyhow::Result<()> {
    if let Preflight::Skip(reason) = preflight(event)? {
        out.notice(&reason.to_string())?;
        return Ok(());
    }
    let github_token = cli.require_github_token()?;
    let repository = cli.require_repository()?;
    let current_commit = cli.require_commit()?;

    let (module, identity) = DirModuleSource.read(&cli.input)?;
    info!(%identity, files = module.files.len(), "read module");

    let registry = HttpRegistry::new(cli.require_registry_token()?, cli.registry_url(), deadline)?;
    let comparer = GithubClient::new(github_token, cli.github_api_url(), repository, deadline)?;
    let request = PushRequest {
        event,
        current_commit,
        identity: &identity,
        module: &module,
    };
    match Reconciler::new(&registry, &comparer).reconcile(&request, out)? {
        PushOutcome::Skipped(reason) => out.notice(&reason.to_string())?,
        PushOutcome::Pushed(result) => {
            out.set_output(COMMIT_OUTPUT_ID, &result.commit)?;
            out.set_output(COMMIT_URL_OUTPUT_ID, &identity.commit_url(&result.commit))?;
        }
    }
    Ok(())
}
