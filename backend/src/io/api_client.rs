//! HTTP client for the expense, guest-session and receipt services.

use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    AnalyzeReceiptResponse, CreateExpenseRequest, CreateExpenseResponse, CreateGuestSessionResponse,
    GuestListResponse, ReceiptOperationResponse,
};

use crate::config::SplitterConfig;
use crate::domain::{ApiError, ExpenseSubmitter, GuestSessionClient, ReceiptAnalyzer};

/// API client for communicating with the backend services
#[derive(Clone)]
pub struct SplitApiClient {
    http: Client,
    base_url: String,
}

impl SplitApiClient {
    pub fn new(config: &SplitterConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self::with_client(http, config.api_base_url.clone()))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Fail on non-success status, keeping the response body for the message
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    error!("{} returned {}: {}", url, status, body);
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl ExpenseSubmitter for SplitApiClient {
    async fn create_expense(
        &self,
        request: &CreateExpenseRequest,
    ) -> Result<CreateExpenseResponse, ApiError> {
        debug!("POST /expenses - request: {}", request.request_id);
        let response = self.http.post(self.url("/expenses")).json(request).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl GuestSessionClient for SplitApiClient {
    async fn create_guest_session(&self) -> Result<CreateGuestSessionResponse, ApiError> {
        debug!("POST /guest-sessions");
        let response = self.http.post(self.url("/guest-sessions")).send().await?;
        decode(response).await
    }

    async fn list_guests(&self, session_id: &str) -> Result<GuestListResponse, ApiError> {
        let url = self.url(&format!("/guest-sessions/{}/guests", session_id));
        let response = self.http.get(url).send().await?;
        decode(response).await
    }

    async fn delete_guest_session(&self, session_id: &str) -> Result<(), ApiError> {
        debug!("DELETE /guest-sessions/{}", session_id);
        let url = self.url(&format!("/guest-sessions/{}", session_id));
        let response = self.http.delete(url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ReceiptAnalyzer for SplitApiClient {
    async fn submit_receipt(
        &self,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<AnalyzeReceiptResponse, ApiError> {
        debug!("POST /receipts - {} bytes", image.len());
        let response = self
            .http
            .post(self.url("/receipts"))
            .header(CONTENT_TYPE, content_type)
            .body(image)
            .send()
            .await?;
        decode(response).await
    }

    async fn receipt_status(
        &self,
        operation_id: &str,
    ) -> Result<ReceiptOperationResponse, ApiError> {
        let url = self.url(&format!("/receipts/{}", operation_id));
        let response = self.http.get(url).send().await?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalised() {
        let client = SplitApiClient::with_client(Client::new(), "http://localhost:3000/api/");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.url("/expenses"), "http://localhost:3000/api/expenses");
    }

    #[test]
    fn test_new_uses_config_base_url() {
        let config = SplitterConfig {
            api_base_url: "https://split.example/api".to_string(),
            ..SplitterConfig::default()
        };
        let client = SplitApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://split.example/api");
    }
}
