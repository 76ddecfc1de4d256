//! # Providers
//!
//! Clients for the external services the analysis pipeline depends on:
//! the LLM and embedding APIs (`ai`) and the vector index (`db`).

pub mod ai;
pub mod db;
