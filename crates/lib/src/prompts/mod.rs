//! # Prompt Templates
//!
//! All prompt text sent to the LLM lives here so it can be reviewed in one place.

pub mod tender;
