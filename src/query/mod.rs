//! Query module
//!
//! Read-only access to committed ledger state.

mod service;

pub use service::QueryService;
