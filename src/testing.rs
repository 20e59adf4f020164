//! Scripted `MaintenanceApi` for handler tests.

use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::VecDeque;

use crate::api::{ApiResponse, MaintenanceApi};
use crate::models::{CreateWindowRequest, UpdateWindowRequest};

/// A request the fake received
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List {
        service_id: String,
        filter: String,
        query: String,
    },
    Create {
        body: serde_json::Value,
    },
    Update {
        id: String,
        body: serde_json::Value,
    },
    Delete {
        id: String,
    },
}

/// Returns queued responses per endpoint and records every call
#[derive(Default)]
pub struct FakeApi {
    list: RefCell<VecDeque<ApiResponse>>,
    create: RefCell<VecDeque<ApiResponse>>,
    update: RefCell<VecDeque<ApiResponse>>,
    delete: RefCell<VecDeque<ApiResponse>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(self, status: u16, body: impl Into<String>) -> Self {
        self.list
            .borrow_mut()
            .push_back(ApiResponse::new(status, body));
        self
    }

    pub fn create(self, status: u16, body: impl Into<String>) -> Self {
        self.create
            .borrow_mut()
            .push_back(ApiResponse::new(status, body));
        self
    }

    pub fn update(self, status: u16, body: impl Into<String>) -> Self {
        self.update
            .borrow_mut()
            .push_back(ApiResponse::new(status, body));
        self
    }

    pub fn delete(self, status: u16, body: impl Into<String>) -> Self {
        self.delete
            .borrow_mut()
            .push_back(ApiResponse::new(status, body));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// A list body containing bare windows with the given ids
    pub fn window_list(ids: &[&str]) -> String {
        let windows: Vec<_> = ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "type": "maintenance_window",
                    "start_time": "2024-03-01T12:00:00Z",
                    "end_time": "2024-03-01T13:00:00Z",
                    "description": "Automatic Maintenance",
                    "services": [{"id": "PSVC1", "type": "service_reference"}],
                })
            })
            .collect();
        serde_json::json!({ "maintenance_windows": windows }).to_string()
    }

    fn next(&self, queue: &RefCell<VecDeque<ApiResponse>>, what: &str) -> Result<ApiResponse> {
        queue
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("unexpected {} call", what))
    }
}

impl MaintenanceApi for FakeApi {
    async fn list_windows(
        &self,
        service_id: &str,
        filter: &str,
        query: &str,
    ) -> Result<ApiResponse> {
        self.calls.borrow_mut().push(Call::List {
            service_id: service_id.to_string(),
            filter: filter.to_string(),
            query: query.to_string(),
        });
        self.next(&self.list, "list")
    }

    async fn create_window(&self, request: &CreateWindowRequest) -> Result<ApiResponse> {
        self.calls.borrow_mut().push(Call::Create {
            body: serde_json::to_value(request)?,
        });
        self.next(&self.create, "create")
    }

    async fn update_window(&self, id: &str, request: &UpdateWindowRequest) -> Result<ApiResponse> {
        self.calls.borrow_mut().push(Call::Update {
            id: id.to_string(),
            body: serde_json::to_value(request)?,
        });
        self.next(&self.update, "update")
    }

    async fn delete_window(&self, id: &str) -> Result<ApiResponse> {
        self.calls.borrow_mut().push(Call::Delete { id: id.to_string() });
        self.next(&self.delete, "delete")
    }
}
