//! Domain module
//!
//! Core domain types shared by every layer of the engine.

pub mod amount;
pub mod context;
pub mod error;
pub mod ids;

pub use amount::Amount;
pub use context::OperationContext;
pub use error::ValidationError;
pub use ids::{AccountId, EntryId, Namespace, TransferId};
