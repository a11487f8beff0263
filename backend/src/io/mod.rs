//! # IO Module
//!
//! Talks to the remote services the domain depends on. Everything here
//! implements one of the collaborator traits from `domain`, so swapping the
//! transport never touches the flow itself.

pub mod api_client;

pub use api_client::*;
