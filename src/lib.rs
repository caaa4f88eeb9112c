//! BWIC Win Probability Analysis Agent
//!
//! Library crate exposing the request/response contract layer: typed
//! request entities, prompt construction, provider adapters, response
//! parsing, and error classification. The binary entry point and
//! integration tests build on these modules.

pub mod agent;
pub mod classify;
pub mod cli;
pub mod config;
pub mod input;
pub mod llm;
pub mod parse;
pub mod prompt;
pub mod report;
pub mod types;
