//! Typed request and response bodies for the maintenance window endpoints
//!
//! JSON only exists at the HTTP boundary; everything else works on these types.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

const WINDOW_TYPE: &str = "maintenance_window";
const SERVICE_REFERENCE_TYPE: &str = "service_reference";

/// Typed pointer to a PagerDuty service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReference {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ServiceReference {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: SERVICE_REFERENCE_TYPE.to_string(),
        }
    }
}

/// A maintenance window as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub services: Vec<ServiceReference>,
}

/// Response of `GET /maintenance_windows`
#[derive(Debug, Deserialize)]
pub struct WindowList {
    #[serde(default)]
    pub maintenance_windows: Vec<MaintenanceWindow>,
}

/// Response of create and update calls
#[derive(Debug, Deserialize)]
pub struct WindowEnvelope {
    pub maintenance_window: MaintenanceWindow,
}

/// Body of `POST /maintenance_windows`
#[derive(Debug, Serialize)]
pub struct CreateWindowRequest {
    pub maintenance_window: NewWindow,
}

#[derive(Debug, Serialize)]
pub struct NewWindow {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: String,
    pub services: Vec<ServiceReference>,
}

impl CreateWindowRequest {
    pub fn new(span: WindowSpan, description: &str, service_id: &str) -> Self {
        Self {
            maintenance_window: NewWindow {
                kind: WINDOW_TYPE,
                start_time: span.start,
                end_time: span.end,
                description: description.to_string(),
                services: vec![ServiceReference::new(service_id)],
            },
        }
    }
}

/// Body of `PUT /maintenance_windows/{id}`; only the end time moves
#[derive(Debug, Serialize)]
pub struct UpdateWindowRequest {
    pub maintenance_window: WindowEndTime,
}

#[derive(Debug, Serialize)]
pub struct WindowEndTime {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub end_time: DateTime<Utc>,
}

impl UpdateWindowRequest {
    pub fn new(end_time: DateTime<Utc>) -> Self {
        Self {
            maintenance_window: WindowEndTime {
                kind: WINDOW_TYPE,
                end_time,
            },
        }
    }
}

/// Start and end of a window that begins now and lasts a number of minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WindowSpan {
    /// Sub-second precision is dropped so the wire format round-trips exactly.
    pub fn starting_at(now: DateTime<Utc>, minutes: u32) -> Self {
        let start = now.trunc_subsecs(0);
        Self {
            start,
            end: start + Duration::minutes(i64::from(minutes)),
        }
    }
}
