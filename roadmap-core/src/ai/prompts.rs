//! Prompt Templates for AI Operations

use crate::models::RequestItem;

/// Build the strategic analysis prompt for a backlog snapshot
pub fn build_insight_prompt(requests: &[RequestItem]) -> Result<String, serde_json::Error> {
    let requests_json = serde_json::to_string_pretty(requests)?;

    Ok(format!(
        r#"As a senior product strategy consultant for a global data platform, analyze these backlog requests.

## Requests Data
{}

## Tasks
1. Strategic Summary: Evaluate roadmap health and alignment.
2. Recommendations: Top 3 prioritized actions.
3. Risk Analysis: Identify bottlenecks or capacity issues.
4. Synergy/Duplicate Detection: Identify requests that are similar, duplicates, or semantically related.
   Group them into clusters that should be delivered together to save effort.

## Response Format
Respond with a single JSON object and nothing else:
{{
  "summary": "string",
  "recommendations": ["string"],
  "risks": ["string"],
  "synergies": [
    {{ "clusterTitle": "string", "requestIds": ["request id"], "reasoning": "string" }}
  ]
}}"#,
        requests_json
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    #[test]
    fn test_prompt_embeds_snapshot() {
        let backlog = defaults::sample_backlog();
        let prompt = build_insight_prompt(&backlog).unwrap();
        assert!(prompt.contains("Real-time Stock Accuracy API"));
        assert!(prompt.contains("\"clusterTitle\""));
        assert!(prompt.contains("Top 3 prioritized actions"));
    }

    #[test]
    fn test_prompt_for_empty_backlog() {
        let prompt = build_insight_prompt(&[]).unwrap();
        assert!(prompt.contains("[]"));
    }
}
