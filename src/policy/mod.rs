pub mod approval;

// Re-export main types
pub use approval::{ApprovalPolicy, DEFAULT_APPROVED_CATEGORIES};
