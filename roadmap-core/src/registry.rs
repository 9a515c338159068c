use log::debug;
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::models::{new_id, OrgProject, OrgTeam, ProjectDraft};

/// Display name for a team id that no longer resolves
pub const UNKNOWN_TEAM: &str = "Unknown";

/// A configurable list of names. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameList(Vec<String>);

impl NameList {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Appends a trimmed name; blank input is ignored
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.0.push(name.to_string());
        true
    }

    /// Removes the entry at `index`; out of range is a no-op
    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Organizational taxonomies: stakeholders, locations, processes, teams and projects.
///
/// No referential integrity is kept between teams and projects; removing a
/// team leaves any project references dangling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRegistry {
    pub stakeholders: NameList,
    pub locations: NameList,
    pub business_processes: NameList,
    teams: Vec<OrgTeam>,
    projects: Vec<OrgProject>,
}

impl Default for OrgRegistry {
    fn default() -> Self {
        Self {
            stakeholders: NameList::new(defaults::STAKEHOLDERS),
            locations: NameList::new(defaults::LOCATIONS),
            business_processes: NameList::new(defaults::BUSINESS_PROCESSES),
            teams: defaults::teams(),
            projects: defaults::org_projects(),
        }
    }
}

impl OrgRegistry {
    /// A registry with no entries at all
    pub fn empty() -> Self {
        Self {
            stakeholders: NameList::default(),
            locations: NameList::default(),
            business_processes: NameList::default(),
            teams: Vec::new(),
            projects: Vec::new(),
        }
    }

    pub fn with_entries(
        stakeholders: NameList,
        locations: NameList,
        business_processes: NameList,
        teams: Vec<OrgTeam>,
        projects: Vec<OrgProject>,
    ) -> Self {
        Self {
            stakeholders,
            locations,
            business_processes,
            teams,
            projects,
        }
    }

    // =========================================================================
    // Teams
    // =========================================================================

    pub fn teams(&self) -> &[OrgTeam] {
        &self.teams
    }

    pub fn team(&self, id: &str) -> Option<&OrgTeam> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Resolves a team id to its name, falling back to "Unknown"
    pub fn team_name(&self, id: &str) -> &str {
        self.team(id).map(|t| t.name.as_str()).unwrap_or(UNKNOWN_TEAM)
    }

    pub fn add_team(&mut self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = new_id();
        self.teams.push(OrgTeam {
            id: id.clone(),
            name: name.to_string(),
        });
        Some(id)
    }

    pub fn rename_team(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.teams.iter_mut().find(|t| t.id == id) {
            Some(team) => {
                team.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Removes a team. Project assignments referencing it are left in place.
    pub fn remove_team(&mut self, id: &str) -> bool {
        let before = self.teams.len();
        self.teams.retain(|t| t.id != id);
        let removed = before != self.teams.len();
        if !removed {
            debug!("Team {} not found, nothing removed", id);
        }
        removed
    }

    // =========================================================================
    // Projects
    // =========================================================================

    pub fn projects(&self) -> &[OrgProject] {
        &self.projects
    }

    pub fn project(&self, id: &str) -> Option<&OrgProject> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn add_project(&mut self, draft: ProjectDraft) -> Option<String> {
        if draft.name.trim().is_empty() {
            return None;
        }
        let id = new_id();
        self.projects.push(project_from_draft(id.clone(), draft));
        Some(id)
    }

    /// Replaces every editable field of a project, keeping its id
    pub fn update_project(&mut self, id: &str, draft: ProjectDraft) -> bool {
        if draft.name.trim().is_empty() {
            return false;
        }
        match self.projects.iter_mut().find(|p| p.id == id) {
            Some(project) => {
                *project = project_from_draft(id.to_string(), draft);
                true
            }
            None => {
                debug!("Project {} not found, update skipped", id);
                false
            }
        }
    }

    pub fn remove_project(&mut self, id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        before != self.projects.len()
    }
}

fn project_from_draft(id: String, draft: ProjectDraft) -> OrgProject {
    OrgProject {
        id,
        name: draft.name.trim().to_string(),
        description: draft.description,
        assigned_team_ids: draft.assigned_team_ids,
        has_data_platform_dependency: draft.has_data_platform_dependency,
    }
}
