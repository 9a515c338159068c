use anyhow::Result;
use inquire::{Confirm, MultiSelect, Select, Text};
use std::collections::{BTreeMap, BTreeSet};

use roadmap_core::views::{tier_label, STANDARD_TIERS};
use roadmap_core::{
    coerce_number, ConfirmationGate, ImpactLevel, NameList, OrgRegistry, Phase, ProjectDraft,
    Quarter, RequestItem, RequestPatch, RoleProfile, CONFIDENCE_LEVELS,
};

/// Confirmation gate backed by an interactive yes/no prompt
pub struct InquireConfirm;

impl ConfirmationGate for InquireConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        // An aborted prompt counts as "no"
        Confirm::new(prompt)
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    }
}

/// Prompts the user to pick a request; `None` when the backlog is empty
pub fn prompt_select_request(requests: &[RequestItem], message: &str) -> Result<Option<String>> {
    if requests.is_empty() {
        return Ok(None);
    }

    let options: Vec<String> = requests
        .iter()
        .map(|r| format!("{} [{:.0}]", r.title, r.score))
        .collect();
    let choice = Select::new(message, options).raw_prompt()?;
    Ok(Some(requests[choice.index].id.clone()))
}

/// Reads a number the way the request form does: anything unparseable is zero
fn prompt_number(message: &str, current: f64) -> Result<f64> {
    let input = Text::new(message)
        .with_initial_value(&current.to_string())
        .prompt()?;
    Ok(coerce_number(&input))
}

/// Multi-select over registry entries, keeping values no longer in the registry
fn prompt_names(message: &str, list: &NameList, current: &BTreeSet<String>) -> Result<BTreeSet<String>> {
    let mut options: Vec<String> = Vec::new();
    for name in list.iter().map(str::to_string).chain(current.iter().cloned()) {
        if !options.contains(&name) {
            options.push(name);
        }
    }
    if options.is_empty() {
        return Ok(BTreeSet::new());
    }

    let defaults: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, name)| current.contains(*name))
        .map(|(i, _)| i)
        .collect();

    let chosen = MultiSelect::new(message, options)
        .with_default(&defaults)
        .prompt()?;
    Ok(chosen.into_iter().collect())
}

/// Confidence preset labels; each already carries its percentage
fn confidence_labels() -> Vec<String> {
    CONFIDENCE_LEVELS
        .iter()
        .map(|(label, _)| label.to_string())
        .collect()
}

fn prompt_quarter(message: &str, current: Quarter) -> Result<Quarter> {
    let start = Quarter::ALL.iter().position(|q| *q == current).unwrap_or(0);
    Ok(Select::new(message, Quarter::ALL.to_vec())
        .with_starting_cursor(start)
        .prompt()?)
}

fn tier_options(current: u32) -> Vec<u32> {
    let mut tiers = STANDARD_TIERS.to_vec();
    if !tiers.contains(&current) {
        tiers.insert(0, current);
    }
    tiers
}

fn prompt_tier(current: u32) -> Result<u32> {
    let tiers = tier_options(current);
    let labels: Vec<String> = tiers.iter().map(|t| tier_label(*t)).collect();
    let start = tiers.iter().position(|t| *t == current).unwrap_or(0);
    let choice = Select::new("Priority tier:", labels)
        .with_starting_cursor(start)
        .raw_prompt()?;
    Ok(tiers[choice.index])
}

/// Role estimates, one prompt per profile (business roles first)
pub fn prompt_role_efforts(current: &RequestItem) -> Result<BTreeMap<RoleProfile, f64>> {
    let mut efforts = BTreeMap::new();
    for role in RoleProfile::all() {
        let md = prompt_number(&format!("{} (MD):", role), current.effort_for(role))?;
        efforts.insert(role, md);
    }
    Ok(efforts)
}

/// Full request form. `current` supplies the initial values.
pub fn prompt_request_form(current: &RequestItem, registry: &OrgRegistry) -> Result<RequestPatch> {
    let title = Text::new("Title:")
        .with_initial_value(&current.title)
        .prompt()?;
    let description = Text::new("Description:")
        .with_initial_value(&current.description)
        .prompt()?;

    let stakeholders = prompt_names("Stakeholders:", &registry.stakeholders, &current.stakeholders)?;
    let locations = prompt_names("Locations:", &registry.locations, &current.locations)?;
    let business_processes = prompt_names(
        "Business processes:",
        &registry.business_processes,
        &current.business_processes,
    )?;

    let reach = prompt_number("Reach:", current.metrics.reach)?;

    let impact_start = ImpactLevel::ALL
        .iter()
        .position(|i| *i == current.metrics.impact)
        .unwrap_or(0);
    let impact = Select::new("Impact:", ImpactLevel::ALL.to_vec())
        .with_starting_cursor(impact_start)
        .prompt()?;

    let confidence_labels = confidence_labels();
    let confidence_start = CONFIDENCE_LEVELS
        .iter()
        .position(|(_, value)| *value == current.metrics.confidence)
        .unwrap_or(0);
    let confidence = Select::new("Confidence:", confidence_labels)
        .with_starting_cursor(confidence_start)
        .raw_prompt()?;

    let analysis_quarter = prompt_quarter("Analysis quarter:", current.analysis_quarter)?;
    let dev_quarter = prompt_quarter("Development quarter:", current.dev_quarter)?;
    let priority_tier = prompt_tier(current.priority_tier)?;

    let dependencies = Text::new("Dependent on (comma-separated):")
        .with_initial_value(&current.dependencies)
        .prompt()?;

    let role_efforts = prompt_role_efforts(current)?;

    let roles: Vec<RoleProfile> = RoleProfile::all().collect();
    let needed_defaults: Vec<usize> = roles
        .iter()
        .enumerate()
        .filter(|(_, role)| current.needed_roles.contains(*role))
        .map(|(i, _)| i)
        .collect();
    let needed_roles: BTreeSet<RoleProfile> = MultiSelect::new("Needed roles:", roles)
        .with_default(&needed_defaults)
        .prompt()?
        .into_iter()
        .collect();

    Ok(RequestPatch {
        title: Some(title),
        description: Some(description),
        stakeholders: Some(stakeholders),
        locations: Some(locations),
        business_processes: Some(business_processes),
        dependencies: Some(dependencies),
        role_efforts: Some(role_efforts),
        needed_roles: Some(needed_roles),
        reach: Some(reach),
        impact: Some(impact),
        confidence: Some(CONFIDENCE_LEVELS[confidence.index].1),
        analysis_quarter: Some(analysis_quarter),
        dev_quarter: Some(dev_quarter),
        priority_tier: Some(priority_tier),
    })
}

/// Phase, quarter and tier for a timeline move
pub fn prompt_reschedule(current: &RequestItem) -> Result<(Phase, Quarter, u32)> {
    let phase = Select::new("Phase:", vec![Phase::Analysis, Phase::Development]).prompt()?;
    let start = match phase {
        Phase::Analysis => current.analysis_quarter,
        Phase::Development => current.dev_quarter,
    };
    let quarter = prompt_quarter("Quarter:", start)?;
    let tier = prompt_tier(current.priority_tier)?;
    Ok((phase, quarter, tier))
}

/// Project form: name, description, team assignment and platform flag
pub fn prompt_project(registry: &OrgRegistry, current: ProjectDraft) -> Result<ProjectDraft> {
    let name = Text::new("Project name:")
        .with_initial_value(&current.name)
        .prompt()?;
    let description = Text::new("Description:")
        .with_initial_value(&current.description)
        .prompt()?;

    let mut draft = ProjectDraft {
        name,
        description,
        ..current
    };

    if !registry.teams().is_empty() {
        let names: Vec<String> = registry.teams().iter().map(|t| t.name.clone()).collect();
        let defaults: Vec<usize> = registry
            .teams()
            .iter()
            .enumerate()
            .filter(|(_, t)| draft.assigned_team_ids.contains(&t.id))
            .map(|(i, _)| i)
            .collect();
        let chosen = MultiSelect::new("Assigned teams:", names)
            .with_default(&defaults)
            .raw_prompt()?;

        // Toggle only known teams so dangling ids survive the edit
        for (i, team) in registry.teams().iter().enumerate() {
            let selected = chosen.iter().any(|opt| opt.index == i);
            if selected != draft.assigned_team_ids.contains(&team.id) {
                draft.toggle_team(&team.id);
            }
        }
    }

    draft.has_data_platform_dependency = Confirm::new("Depends on the data platform?")
        .with_default(draft.has_data_platform_dependency)
        .prompt()?;

    Ok(draft)
}

/// Picks an index from a list of labels; `None` when the list is empty
pub fn prompt_select_index(message: &str, labels: Vec<String>) -> Result<Option<usize>> {
    if labels.is_empty() {
        return Ok(None);
    }
    Ok(Some(Select::new(message, labels).raw_prompt()?.index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_options_keep_extra_tier() {
        assert_eq!(tier_options(1), vec![3, 2, 1, 0]);
        assert_eq!(tier_options(7), vec![7, 3, 2, 1, 0]);
    }

    #[test]
    fn test_confidence_labels_show_one_percentage() {
        let labels = confidence_labels();
        assert_eq!(labels[0], "High (100%)");
        assert!(labels.iter().all(|l| l.matches('%').count() == 1));
    }
}
