//! The maintenance window endpoints as a trait, so handlers can run against a fake.

use anyhow::Result;

use crate::models::{CreateWindowRequest, UpdateWindowRequest};

/// Status code and raw body of an API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// One method per endpoint.
///
/// Implementations return `Err` only for transport failures. Any HTTP status,
/// including 4xx and 5xx, comes back as an `ApiResponse` for the caller to judge.
pub trait MaintenanceApi {
    /// `GET /maintenance_windows?service_ids[]=..&filter=..&query=..`
    async fn list_windows(&self, service_id: &str, filter: &str, query: &str)
        -> Result<ApiResponse>;

    /// `POST /maintenance_windows`
    async fn create_window(&self, request: &CreateWindowRequest) -> Result<ApiResponse>;

    /// `PUT /maintenance_windows/{id}`
    async fn update_window(&self, id: &str, request: &UpdateWindowRequest)
        -> Result<ApiResponse>;

    /// `DELETE /maintenance_windows/{id}`
    async fn delete_window(&self, id: &str) -> Result<ApiResponse>;
}
