//! Human-readable and JSON rendering of command results.

use anyhow::Result;
use serde::Serialize;
use vboxweb_api::{MachineSummary, ServerInfo, SnapshotInfo};

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

pub fn server_info(info: &ServerInfo) -> String {
    let host = &info.host;
    format!(
        "VirtualBox:    {} (r{}, API {})\n\
         Settings:      {}\n\
         Host OS:       {} {}\n\
         Host CPUs:     {}\n\
         Host memory:   {} MB ({} MB free)\n",
        info.version,
        info.revision,
        info.api_version,
        info.settings_file_path,
        host.operating_system,
        host.os_version,
        host.processor_count,
        host.memory_size_mb,
        host.memory_available_mb,
    )
}

pub fn machine_table(machines: &[MachineSummary]) -> String {
    if machines.is_empty() {
        return "No machines registered.\n".to_string();
    }
    let width = machines
        .iter()
        .map(|m| display_name(m).chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let row = |name: &str, id: &str, state: &str, memory: &str, cpus: &str| {
        format!("{name:<width$}  {id:<36}  {state:<20}  {memory:>6}  {cpus:>4}\n")
    };
    let mut out = row("NAME", "UUID", "STATE", "MEMORY", "CPUS");
    for m in machines {
        out.push_str(&row(
            display_name(m),
            &m.id,
            m.state.as_str(),
            &m.memory_mb.to_string(),
            &m.cpu_count.to_string(),
        ));
    }
    out
}

fn display_name(m: &MachineSummary) -> &str {
    if m.name.is_empty() && !m.is_accessible() {
        "<inaccessible>"
    } else {
        &m.name
    }
}

pub fn machine_details(m: &MachineSummary) -> String {
    let mut out = format!(
        "Name:          {}\n\
         UUID:          {}\n\
         State:         {}\n\
         Session:       {}\n\
         Guest OS:      {}\n\
         Memory:        {} MB\n\
         CPUs:          {}\n\
         Snapshots:     {}\n",
        display_name(m),
        m.id,
        m.state,
        m.session_state,
        m.os_type_id,
        m.memory_mb,
        m.cpu_count,
        m.snapshot_count,
    );
    if !m.description.is_empty() {
        out.push_str(&format!("Description:   {}\n", m.description));
    }
    out
}

/// Indented snapshot tree; the current snapshot is marked with `*`.
pub fn snapshot_tree(snapshots: &[SnapshotInfo]) -> String {
    if snapshots.is_empty() {
        return "No snapshots.\n".to_string();
    }
    snapshots
        .iter()
        .map(|s| {
            let marker = if s.current { " *" } else { "" };
            format!("{}{} ({}){}\n", "  ".repeat(s.depth), s.name, s.id, marker)
        })
        .collect()
}
