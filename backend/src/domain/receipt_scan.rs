//! Receipt scanning.
//!
//! The analysis service works asynchronously: an uploaded image yields an
//! operation handle that is polled until it succeeds or fails. The extracted
//! text is returned as-is; it is not turned into split inputs.

use async_trait::async_trait;
use log::{debug, info, warn};
use shared::{AnalyzeReceiptResponse, ReceiptOperationResponse, ReceiptOperationStatus};
use std::path::Path;
use std::time::Duration;

use super::errors::{ApiError, ReceiptScanError};

#[async_trait]
pub trait ReceiptAnalyzer: Send + Sync {
    async fn submit_receipt(
        &self,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<AnalyzeReceiptResponse, ApiError>;

    async fn receipt_status(
        &self,
        operation_id: &str,
    ) -> Result<ReceiptOperationResponse, ApiError>;
}

/// Content type to upload a receipt image with, from its file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[derive(Clone)]
pub struct ReceiptScanService<A> {
    analyzer: A,
    poll_interval: Duration,
    max_polls: u32,
}

impl<A: ReceiptAnalyzer> ReceiptScanService<A> {
    pub fn new(analyzer: A, poll_interval: Duration, max_polls: u32) -> Self {
        Self {
            analyzer,
            poll_interval,
            max_polls,
        }
    }

    /// Upload an image and wait for its text
    pub async fn scan(
        &self,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ReceiptScanError> {
        info!("Uploading receipt ({} bytes, {})", image.len(), content_type);
        let operation = self.analyzer.submit_receipt(image, content_type).await?;
        self.wait_for_text(&operation.operation_id).await
    }

    /// Poll an operation until it reaches a terminal status
    pub async fn wait_for_text(&self, operation_id: &str) -> Result<String, ReceiptScanError> {
        for attempt in 1..=self.max_polls {
            let status = self.analyzer.receipt_status(operation_id).await?;

            match status.status {
                ReceiptOperationStatus::Succeeded => {
                    info!("Receipt {} analysed after {} checks", operation_id, attempt);
                    return Ok(status.text.unwrap_or_default());
                }
                ReceiptOperationStatus::Failed => {
                    let reason = status.error.unwrap_or_else(|| "unknown error".to_string());
                    warn!("Receipt {} analysis failed: {}", operation_id, reason);
                    return Err(ReceiptScanError::AnalysisFailed(reason));
                }
                ReceiptOperationStatus::Running => {
                    debug!("Receipt {} still running (check {})", operation_id, attempt);
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        Err(ReceiptScanError::TimedOut {
            attempts: self.max_polls,
        })
    }
}
