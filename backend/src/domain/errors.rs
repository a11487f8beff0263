//! Error types for the expense-creation flow and its collaborators.

use rust_decimal::Decimal;
use thiserror::Error;

use super::expense_flow::FlowState;

/// Reasons a flow transition is refused.
///
/// None of these are fatal: the flow stays in the state it was in and the
/// caller surfaces the message to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    #[error("Please enter a total amount greater than 0")]
    InvalidTotal,

    #[error("Please enter a description")]
    EmptyDescription,

    #[error("Amounts must add up to the total: {remaining} remaining")]
    AmountsIncomplete { remaining: Decimal },

    #[error("Percentages must add up to 100%: {remaining}% remaining")]
    PercentagesIncomplete { remaining: Decimal },

    #[error("Select at least one person to split with")]
    NoParticipantsSelected,

    #[error("Assign at least one share")]
    NoSharesAssigned,

    #[error("Unknown participant index {0}")]
    UnknownParticipant(usize),

    #[error("Cannot {action} while {state:?}")]
    InvalidTransition {
        state: FlowState,
        action: &'static str,
    },
}

/// Failure talking to one of the remote services.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ReceiptScanError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Receipt analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Receipt analysis did not finish after {attempts} checks")]
    TimedOut { attempts: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_shortfall_is_named_in_message() {
        let error = FlowError::AmountsIncomplete { remaining: dec!(1.00) };
        assert_eq!(error.to_string(), "Amounts must add up to the total: 1.00 remaining");

        let error = FlowError::PercentagesIncomplete { remaining: dec!(10) };
        assert_eq!(error.to_string(), "Percentages must add up to 100%: 10% remaining");
    }
}
