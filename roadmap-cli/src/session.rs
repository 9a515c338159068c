use log::info;
use std::sync::Arc;

use roadmap_core::{
    AiClient, InsightRunner, OrgRegistry, RequestRepository, RoadmapConfig, Workspace,
};

/// Everything a planning session holds in memory
pub struct Session {
    pub workspace: Workspace,
    pub registry: OrgRegistry,
    pub planner: String,
    pub insights: InsightRunner,
    pub ai_description: String,
}

impl Session {
    pub fn from_config(config: &RoadmapConfig, planner: Option<String>, empty: bool) -> Self {
        let live = if empty {
            RequestRepository::new()
        } else {
            config.initial_backlog()
        };
        let client = AiClient::from_settings(&config.ai);
        let ai_description = client.mode_description();
        info!(
            "Session seeded with {} requests, AI mode: {}",
            live.len(),
            ai_description
        );

        Self {
            workspace: Workspace::new(live),
            registry: config.registry(),
            planner: planner.unwrap_or_else(|| config.planner_name.clone()),
            insights: InsightRunner::new(Arc::new(client)),
            ai_description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_seeding() {
        let config = RoadmapConfig::default();

        let seeded = Session::from_config(&config, None, false);
        assert_eq!(seeded.workspace.active().len(), 1);
        assert_eq!(seeded.planner, "Planner");

        let empty = Session::from_config(&config, Some("Dana".to_string()), true);
        assert!(empty.workspace.active().is_empty());
        assert_eq!(empty.planner, "Dana");
        assert_eq!(empty.registry.teams().len(), 5);
    }
}
