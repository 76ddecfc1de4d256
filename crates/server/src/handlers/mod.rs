//! # API Route Handlers
//!
//! The Axum handlers for `tenderlens-server`, split by endpoint family.

pub mod general;
pub mod search;
pub mod tender;

// Re-export all handlers so the router can reach them under `handlers::`.
pub use general::*;
pub use search::*;
pub use tender::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};
