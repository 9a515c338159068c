//! AI Integration Module
//!
//! Strategic insight over a backlog snapshot: summary, recommendations,
//! risks and synergy clusters, produced by an external LLM CLI.

pub mod client;
pub mod prompts;
pub mod responses;
pub mod runner;

pub use client::{AiClient, AiError, AiMode, InsightProvider};
pub use responses::{AiInsight, SynergyGroup};
pub use runner::{AnalysisStatus, InsightRunner};
