//! Data models
//!
//! Mirrors of the backend's JSON records. The backend owns every entity;
//! these are transient copies held for rendering and reshaping.
//! Wire names are camelCase.

pub mod asset;
pub mod inventory;
pub mod issue;
pub mod maintenance;
pub mod serde_helpers;
pub mod user;

// Re-exports
pub use asset::*;
pub use inventory::*;
pub use issue::*;
pub use maintenance::*;
pub use user::*;
