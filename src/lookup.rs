//! Discovery of tool-managed windows
//!
//! Window ids are never stored between runs, so every command that acts on an
//! existing window starts here.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::api::MaintenanceApi;
use crate::config::WindowsConfig;
use crate::models::{MaintenanceWindow, WindowList};

/// Filter and description tag that select the windows this tool manages
#[derive(Debug, Clone)]
pub struct WindowQuery {
    pub filter: String,
    pub description: String,
}

impl From<&WindowsConfig> for WindowQuery {
    fn from(config: &WindowsConfig) -> Self {
        Self {
            filter: config.filter.clone(),
            description: config.description.clone(),
        }
    }
}

impl Default for WindowQuery {
    fn default() -> Self {
        Self::from(&WindowsConfig::default())
    }
}

/// Result of looking up windows for a service
#[derive(Debug)]
pub enum LookupOutcome {
    Found(Vec<MaintenanceWindow>),
    NotFound,
    /// The list endpoint answered with something other than 200
    RequestFailed { status: u16, body: String },
}

/// Lists the windows for `service_id` matching `query`
pub async fn find_windows(
    api: &impl MaintenanceApi,
    service_id: &str,
    query: &WindowQuery,
) -> Result<LookupOutcome> {
    let response = api
        .list_windows(service_id, &query.filter, &query.description)
        .await?;

    if response.status != 200 {
        warn!(status = response.status, service_id, "listing maintenance windows failed");
        return Ok(LookupOutcome::RequestFailed {
            status: response.status,
            body: response.body,
        });
    }

    let list: WindowList = serde_json::from_str(&response.body)
        .context("Failed to parse maintenance window list")?;
    debug!(count = list.maintenance_windows.len(), service_id, "windows found");

    if list.maintenance_windows.is_empty() {
        Ok(LookupOutcome::NotFound)
    } else {
        Ok(LookupOutcome::Found(list.maintenance_windows))
    }
}
