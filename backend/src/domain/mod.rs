//! # Domain Module
//!
//! Business logic for creating an expense on the client side.
//!
//! ## Module Organization
//!
//! - **split_calculator**: equal / amount / percentage / share split arithmetic
//! - **expense_flow**: the draft and the step-by-step creation state machine
//! - **expense_service**: sends a finished draft to the expense backend
//! - **guest_session**: QR guest sessions and the polling watcher
//! - **receipt_scan**: receipt upload and analysis polling
//! - **amount_input**: parsing of typed values
//! - **models**: per-mode split inputs and the user context
//!
//! ## Business Rules
//!
//! - A total must be positive before a split mode can be chosen
//! - Amounts may never exceed the total, percentages never exceed 100
//! - A split is only submitted once it allocates the whole total
//! - Switching split mode starts the new mode from scratch
//!
//! Remote collaborators are reached through traits so the flow can be driven
//! by the HTTP client in `io` or by in-process fakes.

pub mod amount_input;
pub mod errors;
pub mod expense_flow;
pub mod expense_service;
pub mod guest_session;
pub mod models;
pub mod receipt_scan;
pub mod split_calculator;

pub use amount_input::*;
pub use errors::*;
pub use expense_flow::*;
pub use expense_service::*;
pub use guest_session::*;
pub use models::*;
pub use receipt_scan::*;
pub use split_calculator::*;
