//! Subcommand execution against one web session.

use crate::cli::{Cli, Command};
use crate::config::{self, Settings};
use crate::output;
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};
use vboxweb_api::VboxService;

/// Result of a machine control command in `--json` mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionReport<'a> {
    vm: &'a str,
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot_id: Option<String>,
}

/// Resolve settings, log on, run the command and log off again.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = config::resolve(&cli)?;
    debug!(?settings, "resolved settings");
    let text = execute(&cli, settings).await?;
    print!("{text}");
    Ok(())
}

/// Run the command and return what should be printed.
pub async fn execute(cli: &Cli, settings: Settings) -> Result<String> {
    let endpoint = settings.connection.client.endpoint.clone();
    let mut service = VboxService::with_config(settings.service);
    let session = service
        .connect(settings.connection)
        .await
        .with_context(|| format!("Failed to log on to {endpoint}"))?;
    info!(%endpoint, "logged on");

    let result = dispatch(&mut service, &session, cli).await;

    if let Err(e) = service.disconnect(&session).await {
        warn!("logoff failed: {e}");
    }
    result
}

async fn dispatch(service: &mut VboxService, session: &str, cli: &Cli) -> Result<String> {
    let json = cli.json;
    let text = match &cli.command {
        Command::Version => {
            let info = service.server_info(session).await?;
            if json {
                output::json(&info)?
            } else {
                output::server_info(&info)
            }
        }
        Command::List => {
            let machines = service.list_machines(session).await?;
            if json {
                output::json(&machines)?
            } else {
                output::machine_table(&machines)
            }
        }
        Command::Info { vm } => {
            let machine = service
                .machine_info(session, vm)
                .await
                .with_context(|| format!("Failed to query '{vm}'"))?;
            if json {
                output::json(&machine)?
            } else {
                output::machine_details(&machine)
            }
        }
        Command::Snapshots { vm } => {
            let snapshots = service
                .list_snapshots(session, vm)
                .await
                .with_context(|| format!("Failed to list snapshots of '{vm}'"))?;
            if json {
                output::json(&snapshots)?
            } else {
                output::snapshot_tree(&snapshots)
            }
        }
        Command::Start { vm, front_end } => {
            service
                .start_machine(session, vm, front_end.map(Into::into))
                .await
                .with_context(|| format!("Failed to start '{vm}'"))?;
            report(json, vm, "start", None)?
        }
        Command::Poweroff { vm } => {
            service
                .power_off(session, vm)
                .await
                .with_context(|| format!("Failed to power off '{vm}'"))?;
            report(json, vm, "poweroff", None)?
        }
        Command::Acpi { vm } => {
            service
                .acpi_shutdown(session, vm)
                .await
                .with_context(|| format!("Failed to send ACPI shutdown to '{vm}'"))?;
            report(json, vm, "acpi", None)?
        }
        Command::Pause { vm } => {
            service
                .pause(session, vm)
                .await
                .with_context(|| format!("Failed to pause '{vm}'"))?;
            report(json, vm, "pause", None)?
        }
        Command::Resume { vm } => {
            service
                .resume(session, vm)
                .await
                .with_context(|| format!("Failed to resume '{vm}'"))?;
            report(json, vm, "resume", None)?
        }
        Command::Reset { vm } => {
            service
                .reset(session, vm)
                .await
                .with_context(|| format!("Failed to reset '{vm}'"))?;
            report(json, vm, "reset", None)?
        }
        Command::Snapshot { vm, name, description } => {
            let id = service
                .take_snapshot(session, vm, name, description)
                .await
                .with_context(|| format!("Failed to snapshot '{vm}'"))?;
            report(json, vm, "snapshot", Some(id))?
        }
    };
    Ok(text)
}

fn report(json: bool, vm: &str, action: &str, snapshot_id: Option<String>) -> Result<String> {
    if json {
        return output::json(&ActionReport { vm, action, snapshot_id });
    }
    Ok(match snapshot_id {
        Some(id) => format!("{vm}: {action} ok (snapshot {id})\n"),
        None => format!("{vm}: {action} ok\n"),
    })
}
