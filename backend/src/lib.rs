//! # Expense Splitter
//!
//! Client-side core of the expense splitter: everything a UI needs to create
//! an expense except the widgets.
//!
//! - **Domain**: split calculation, the expense-creation flow, guest sessions
//!   and receipt scanning, written against collaborator traits
//! - **IO**: the HTTP implementation of those collaborators
//! - **Config**: where the backend lives and how often to poll it
//!
//! ## Architecture
//!
//! ```text
//! UI / CLI
//!     ↓
//! Domain (ExpenseFlow, split calculator, services)
//!     ↓
//! IO (SplitApiClient over HTTP)
//!     ↓
//! Remote backend (expenses, guest sessions, receipt analysis)
//! ```
//!
//! Balances, persistence and authentication belong to the backend; nothing in
//! this crate stores data.

pub mod config;
pub mod domain;
pub mod io;

pub use config::SplitterConfig;
pub use domain::*;
pub use io::*;
