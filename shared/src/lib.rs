//! Shared types for the city asset console
//!
//! Domain records exchanged with the asset management backend, list and
//! report envelopes, role capabilities and client-side validation rules.
//! Nothing in this crate performs I/O.

pub mod capability;
pub mod models;
pub mod response;
pub mod validation;

// Re-exports
pub use capability::{Action, Denied};
pub use response::{CategoryCount, Paged};
pub use serde::{Deserialize, Serialize};
pub use validation::FieldError;
