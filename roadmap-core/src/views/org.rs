use crate::registry::OrgRegistry;

/// One project row of the assignment matrix
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRow {
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub platform_dependent: bool,
    /// Aligned with `OrgOverview::team_names`
    pub assigned: Vec<bool>,
    /// Names of every assigned team id, "Unknown" for dangling ones
    pub team_names: Vec<String>,
}

/// The "big picture" of projects against teams
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgOverview {
    pub team_names: Vec<String>,
    pub rows: Vec<ProjectRow>,
    pub platform_dependent_projects: usize,
    pub total_projects: usize,
    /// Share of teams assigned to at least one project, 0..=100
    pub team_coverage_pct: f64,
}

pub fn org_overview(registry: &OrgRegistry) -> OrgOverview {
    let teams = registry.teams();
    let projects = registry.projects();

    let rows = projects
        .iter()
        .map(|project| ProjectRow {
            project_id: project.id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            platform_dependent: project.has_data_platform_dependency,
            assigned: teams
                .iter()
                .map(|team| project.assigned_team_ids.contains(&team.id))
                .collect(),
            team_names: project
                .assigned_team_ids
                .iter()
                .map(|id| registry.team_name(id).to_string())
                .collect(),
        })
        .collect();

    let covered = teams
        .iter()
        .filter(|team| {
            projects
                .iter()
                .any(|p| p.assigned_team_ids.contains(&team.id))
        })
        .count();
    let team_coverage_pct = if teams.is_empty() {
        0.0
    } else {
        covered as f64 * 100.0 / teams.len() as f64
    };

    OrgOverview {
        team_names: teams.iter().map(|t| t.name.clone()).collect(),
        rows,
        platform_dependent_projects: projects
            .iter()
            .filter(|p| p.has_data_platform_dependency)
            .count(),
        total_projects: projects.len(),
        team_coverage_pct,
    }
}
