//! Submission of a finished draft to the expense backend.

use async_trait::async_trait;
use log::{error, info};
use shared::{CreateExpenseRequest, CreateExpenseResponse};
use thiserror::Error;

use super::errors::{ApiError, FlowError};
use super::expense_flow::ExpenseFlow;

/// Remote service that records expenses
#[async_trait]
pub trait ExpenseSubmitter: Send + Sync {
    async fn create_expense(
        &self,
        request: &CreateExpenseRequest,
    ) -> Result<CreateExpenseResponse, ApiError>;
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The flow refused to submit; nothing was sent
    #[error(transparent)]
    Rejected(#[from] FlowError),

    /// The backend call failed; the draft is back in editing
    #[error("Could not save the expense: {0}")]
    Failed(#[source] ApiError),
}

/// Drives the submit step of an [`ExpenseFlow`] against a submitter
#[derive(Clone)]
pub struct ExpenseService<S> {
    submitter: S,
}

impl<S: ExpenseSubmitter> ExpenseService<S> {
    pub fn new(submitter: S) -> Self {
        Self { submitter }
    }

    /// Validate, send and settle the flow according to the backend's answer
    pub async fn submit(
        &self,
        flow: &mut ExpenseFlow,
    ) -> Result<CreateExpenseResponse, SubmitError> {
        let request = flow.request_submission()?;

        match self.submitter.create_expense(&request).await {
            Ok(response) => {
                info!("Backend accepted expense {}", response.expense_id);
                flow.confirm_submitted(response.clone())?;
                Ok(response)
            }
            Err(e) => {
                error!("Failed to create expense {}: {}", request.request_id, e);
                flow.submission_failed(&e.to_string())?;
                Err(SubmitError::Failed(e))
            }
        }
    }
}
