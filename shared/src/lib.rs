use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Someone who takes part in an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    /// True when the participant joined through a guest session
    #[serde(default)]
    pub is_guest: bool,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_guest: false,
        }
    }

    pub fn guest(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_guest: true,
        }
    }
}

/// How an expense is divided between its participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    /// Everyone included pays the same
    Equal,
    /// Exact amounts per participant
    Amount,
    /// Percentages of the total, summing to 100
    Percentage,
    /// Relative weights
    Share,
}

impl SplitType {
    pub const ALL: [SplitType; 4] = [
        SplitType::Equal,
        SplitType::Amount,
        SplitType::Percentage,
        SplitType::Share,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::Equal => "equal",
            SplitType::Amount => "amount",
            SplitType::Percentage => "percentage",
            SplitType::Share => "share",
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(SplitType::Equal),
            "amount" => Ok(SplitType::Amount),
            "percentage" | "percent" => Ok(SplitType::Percentage),
            "share" | "shares" => Ok(SplitType::Share),
            other => Err(format!("Unknown split type: {}", other)),
        }
    }
}

/// Amount owed by one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitDetail {
    pub participant_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Request for creating an expense on the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    /// Client-generated id so a retried submission can be recognised
    pub request_id: String,
    pub description: String,
    /// Participant id of whoever paid
    pub paid_by: String,
    /// RFC 3339 timestamp
    pub date: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub split_type: SplitType,
    pub details: Vec<SplitDetail>,
}

/// Response after creating an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseResponse {
    pub expense_id: String,
}

/// Response after opening a guest session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuestSessionResponse {
    pub session_id: String,
}

/// A guest that joined a session by scanning its QR code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    pub name: String,
}

impl From<Guest> for Participant {
    fn from(guest: Guest) -> Self {
        Participant::guest(guest.id, guest.name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestListResponse {
    pub guests: Vec<Guest>,
}

/// Handle returned when a receipt image is accepted for analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeReceiptResponse {
    pub operation_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptOperationStatus {
    Running,
    Succeeded,
    Failed,
}

/// Current state of a receipt analysis operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptOperationResponse {
    pub status: ReceiptOperationStatus,
    /// Extracted text, present once the operation succeeded
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
