//! Handlers for the `add`, `end`, `change` and `list` subcommands
//!
//! Handlers print their results to `out` and return an [`Outcome`]. Exiting the
//! process is left to the caller. `Err` is reserved for transport and decoding
//! failures.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::api::{ApiResponse, MaintenanceApi};
use crate::lookup::{find_windows, LookupOutcome, WindowQuery};
use crate::models::{
    CreateWindowRequest, MaintenanceWindow, UpdateWindowRequest, WindowEnvelope, WindowSpan,
};

/// Source of the current time
pub type Clock = fn() -> DateTime<Utc>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

/// Creates a window for `service_id` lasting `minutes` from now
pub async fn create(
    api: &impl MaintenanceApi,
    description: &str,
    service_id: &str,
    minutes: u32,
    clock: Clock,
    out: &mut impl Write,
) -> Result<Outcome> {
    let span = WindowSpan::starting_at(clock(), minutes);
    writeln!(
        out,
        "Creating a {} minute maintenance window starting at {}",
        minutes, span.start
    )?;

    let request = CreateWindowRequest::new(span, description, service_id);
    let response = api.create_window(&request).await?;

    if response.status != 201 {
        report_failure(out, "maintenance window creation failed!", &response)?;
        return Ok(Outcome::Failure);
    }

    let created: WindowEnvelope = serde_json::from_str(&response.body)
        .context("Failed to parse created maintenance window")?;
    info!(id = %created.maintenance_window.id, service_id, "maintenance window created");
    writeln!(
        out,
        "Maintenance window with ID {} was successfully created",
        created.maintenance_window.id
    )?;
    Ok(Outcome::Success)
}

/// Deletes every matching window for `service_id`.
///
/// A failed delete does not stop the remaining ones, but makes the outcome a failure.
pub async fn end(
    api: &impl MaintenanceApi,
    query: &WindowQuery,
    service_id: &str,
    out: &mut impl Write,
) -> Result<Outcome> {
    let windows = match lookup(api, query, service_id, out).await? {
        Some(windows) => windows,
        None => return Ok(Outcome::Failure),
    };

    let mut outcome = Outcome::Success;
    for window in &windows {
        let response = api.delete_window(&window.id).await?;
        if response.status == 204 {
            info!(id = %window.id, "maintenance window deleted");
            writeln!(out, "Maintenance window with ID {} deleted", window.id)?;
        } else {
            let what = format!("deletion of maintenance window {} failed!", window.id);
            report_failure(out, &what, &response)?;
            outcome = Outcome::Failure;
        }
    }

    Ok(outcome)
}

/// Moves the end of every matching window to `minutes` from now.
///
/// The first failed update stops processing.
pub async fn change(
    api: &impl MaintenanceApi,
    query: &WindowQuery,
    service_id: &str,
    minutes: u32,
    clock: Clock,
    out: &mut impl Write,
) -> Result<Outcome> {
    let windows = match lookup(api, query, service_id, out).await? {
        Some(windows) => windows,
        None => return Ok(Outcome::Failure),
    };

    for window in &windows {
        let span = WindowSpan::starting_at(clock(), minutes);
        let response = api
            .update_window(&window.id, &UpdateWindowRequest::new(span.end))
            .await?;

        if response.status != 200 {
            let what = format!("update of maintenance window {} failed!", window.id);
            report_failure(out, &what, &response)?;
            return Ok(Outcome::Failure);
        }

        // Prefer the end time the server settled on
        let end_time = match serde_json::from_str::<WindowEnvelope>(&response.body) {
            Ok(updated) => updated.maintenance_window.end_time.unwrap_or(span.end),
            Err(e) => {
                warn!(
                    id = %window.id,
                    error = %e,
                    "unreadable update response, using requested end time"
                );
                span.end
            }
        };
        info!(id = %window.id, %end_time, "maintenance window updated");
        writeln!(
            out,
            "Maintenance window with ID {} now ends at {}",
            window.id,
            end_time.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;
    }

    Ok(Outcome::Success)
}

/// Prints the matching windows for `service_id` without touching them
pub async fn list(
    api: &impl MaintenanceApi,
    query: &WindowQuery,
    service_id: &str,
    out: &mut impl Write,
) -> Result<Outcome> {
    match find_windows(api, service_id, query).await? {
        LookupOutcome::Found(windows) => {
            for window in &windows {
                writeln!(out, "{}", format_window(window))?;
            }
            Ok(Outcome::Success)
        }
        LookupOutcome::NotFound => {
            writeln!(out, "{}", not_found_message(service_id))?;
            Ok(Outcome::Success)
        }
        LookupOutcome::RequestFailed { status, body } => {
            report_lookup_failure(out, service_id, status, &body)?;
            Ok(Outcome::Failure)
        }
    }
}

/// Runs the lookup and reports the two empty-handed cases.
///
/// Returns `None` when there is nothing to act on.
async fn lookup(
    api: &impl MaintenanceApi,
    query: &WindowQuery,
    service_id: &str,
    out: &mut impl Write,
) -> Result<Option<Vec<MaintenanceWindow>>> {
    match find_windows(api, service_id, query).await? {
        LookupOutcome::Found(windows) => Ok(Some(windows)),
        LookupOutcome::NotFound => {
            writeln!(out, "{}", not_found_message(service_id))?;
            Ok(None)
        }
        LookupOutcome::RequestFailed { status, body } => {
            report_lookup_failure(out, service_id, status, &body)?;
            Ok(None)
        }
    }
}

fn not_found_message(service_id: &str) -> String {
    format!("Can't find any maintenance window for service: {}", service_id)
}

fn report_lookup_failure(
    out: &mut impl Write,
    service_id: &str,
    status: u16,
    body: &str,
) -> Result<()> {
    let what = format!("listing maintenance windows for service {} failed!", service_id);
    report_failure(out, &what, &ApiResponse::new(status, body))
}

fn report_failure(out: &mut impl Write, what: &str, response: &ApiResponse) -> Result<()> {
    writeln!(
        out,
        "Error: {}\nStatus code: {}\nResponse: {}",
        what, response.status, response.body
    )?;
    Ok(())
}

fn format_window(window: &MaintenanceWindow) -> String {
    let time = |t: Option<DateTime<Utc>>| {
        t.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "?".to_string())
    };
    format!(
        "{}  {} -> {}  {}",
        window.id,
        time(window.start_time),
        time(window.end_time),
        window.description.as_deref().unwrap_or("")
    )
}
