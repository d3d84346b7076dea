//! # EveryOrg Domain
//!
//! Domain types for the every.org partner API client.
//!
//! This crate contains:
//! - Client settings and wire constants
//! - The cause allow-list and its validator
//! - Request/response models and the donation request field table
//! - Error types and the `Result` alias
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - No I/O

pub mod causes;
pub mod constants;
pub mod errors;
pub mod settings;
pub mod types;

// Re-export commonly used items
pub use causes::{is_allowed_cause, is_allowed_causes, is_allowed_causes_slice, ALLOWED_CAUSES};
pub use errors::*;
pub use settings::{Settings, SettingsBuilder};
pub use types::*;
