use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, FROM};
use reqwest::{Client, RequestBuilder};
use tracing::debug;

use crate::api::{ApiResponse, MaintenanceApi};
use crate::config::ApiConfig;
use crate::models::{CreateWindowRequest, UpdateWindowRequest};

const ACCEPT_V2: &str = "application/vnd.pagerduty+json;version=2";

/// API key and acting-user email, supplied fresh on every invocation
pub struct Credentials {
    pub api_key: String,
    pub email: String,
}

/// Builds the four headers sent with every request
pub fn build_headers(credentials: &Credentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Token token={}", credentials.api_key))
        .context("API key contains characters not allowed in an HTTP header")?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V2));
    headers.insert(
        FROM,
        HeaderValue::from_str(&credentials.email)
            .context("Email contains characters not allowed in an HTTP header")?,
    );

    Ok(headers)
}

/// reqwest-backed client for the maintenance window endpoints
pub struct PagerDutyClient {
    http: Client,
    base_url: String,
}

impl PagerDutyClient {
    pub fn new(credentials: &Credentials, config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .default_headers(build_headers(credentials)?)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/maintenance_windows", self.base_url)
    }

    fn window_url(&self, id: &str) -> String {
        format!("{}/maintenance_windows/{}", self.base_url, id)
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request
            .send()
            .await
            .context("Failed to connect to the PagerDuty API (check network connection)")?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "received response");

        let body = response
            .text()
            .await
            .context("Failed to read PagerDuty API response body")?;

        Ok(ApiResponse::new(status.as_u16(), body))
    }
}

impl MaintenanceApi for PagerDutyClient {
    async fn list_windows(
        &self,
        service_id: &str,
        filter: &str,
        query: &str,
    ) -> Result<ApiResponse> {
        debug!(service_id, filter, query, "GET maintenance windows");
        let request = self.http.get(self.collection_url()).query(&[
            ("service_ids[]", service_id),
            ("filter", filter),
            ("query", query),
        ]);
        self.send(request).await
    }

    async fn create_window(&self, request: &CreateWindowRequest) -> Result<ApiResponse> {
        debug!("POST maintenance window");
        self.send(self.http.post(self.collection_url()).json(request))
            .await
    }

    async fn update_window(&self, id: &str, request: &UpdateWindowRequest) -> Result<ApiResponse> {
        debug!(id, "PUT maintenance window");
        self.send(self.http.put(self.window_url(id)).json(request))
            .await
    }

    async fn delete_window(&self, id: &str) -> Result<ApiResponse> {
        debug!(id, "DELETE maintenance window");
        self.send(self.http.delete(self.window_url(id))).await
    }
}
