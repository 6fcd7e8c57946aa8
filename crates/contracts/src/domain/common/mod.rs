//! Common types and traits shared by every resource

pub mod resource;
pub mod validation;

// Re-exports
pub use resource::Resource;
pub use validation::{require_non_blank, require_non_negative, require_positive, ValidationError};
