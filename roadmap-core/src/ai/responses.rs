//! Response Parsing Module
//!
//! Parses the JSON insight record returned by the AI into structured data.

use crate::ai::client::AiError;
use serde::{Deserialize, Serialize};

/// Requests the AI considers related enough to deliver together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyGroup {
    pub cluster_title: String,
    pub request_ids: Vec<String>,
    pub reasoning: String,
}

/// Strategic insight over a backlog snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiInsight {
    pub summary: String,
    pub recommendations: Vec<String>,
    pub risks: Vec<String>,
    pub synergies: Vec<SynergyGroup>,
}

/// Extract JSON from a response that may contain markdown code blocks
fn extract_json(response: &str) -> &str {
    if let Some(start) = response.find("```json") {
        let json_start = start + 7;
        if let Some(end) = response[json_start..].find("```") {
            return response[json_start..json_start + end].trim();
        }
    }

    // Generic code block, skipping a language identifier if present
    if let Some(start) = response.find("```") {
        let code_start = start + 3;
        let json_start = match response[code_start..].find('\n') {
            Some(newline) => code_start + newline + 1,
            None => code_start,
        };
        if let Some(end) = response[json_start..].find("```") {
            return response[json_start..json_start + end].trim();
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return &response[start..=end];
            }
        }
    }

    response.trim()
}

/// Parse the insight record from an AI response
pub fn parse_insight_response(response: &str) -> Result<AiInsight, AiError> {
    let json_str = extract_json(response);
    serde_json::from_str(json_str).map_err(|e| {
        let preview: String = json_str.chars().take(200).collect();
        AiError::InvalidResponse(format!(
            "Failed to parse insight response: {}. JSON: {}",
            e, preview
        ))
    })
}
