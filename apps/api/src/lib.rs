//! CV processing pipeline: loads a résumé, splits it into sections, scores it,
//! matches it against a role or job description and proposes improvements.
//!
//! [`pipeline::Pipeline`] is the entry point; the HTTP surface in [`routes`]
//! is a thin layer over it.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod generation;
pub mod llm_client;
pub mod loader;
pub mod matching;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod state;
