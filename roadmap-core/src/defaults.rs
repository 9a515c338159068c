//! Built-in taxonomies and the sample backlog used when no config overrides them.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    ImpactLevel, OrgProject, OrgTeam, Quarter, RequestItem, RequestPatch, RoleProfile,
};

pub const STAKEHOLDERS: [&str; 7] = [
    "Warehouse",
    "Global Planning",
    "Service Center",
    "Business Control",
    "HR",
    "IT Ops",
    "Product",
];

pub const LOCATIONS: [&str; 9] = [
    "Ghent",
    "Lyon",
    "Byhalia",
    "RDS NA",
    "Curitiba",
    "SDC Europe",
    "RDC APAC",
    "AfterMarket Technology",
    "Global",
];

pub const BUSINESS_PROCESSES: [&str; 7] = [
    "Inbound",
    "Delivery Schedule",
    "Stock",
    "Planning",
    "Outbound Delivery",
    "Transport",
    "General",
];

pub fn teams() -> Vec<OrgTeam> {
    [
        ("t1", "Digital Sales"),
        ("t2", "Supply Chain Ops"),
        ("t3", "Customer Experience"),
        ("t4", "Finance & Control"),
        ("t5", "Infrastructure"),
    ]
    .into_iter()
    .map(|(id, name)| OrgTeam {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect()
}

pub fn org_projects() -> Vec<OrgProject> {
    vec![
        OrgProject {
            id: "p1".to_string(),
            name: "Omnichannel Expansion".to_string(),
            description: "Scaling digital sales across 15 new regions.".to_string(),
            assigned_team_ids: vec!["t1".to_string(), "t3".to_string()],
            has_data_platform_dependency: true,
        },
        OrgProject {
            id: "p2".to_string(),
            name: "Smart Warehouse 2.0".to_string(),
            description: "IOT implementation for automated picking.".to_string(),
            assigned_team_ids: vec!["t2".to_string(), "t5".to_string()],
            has_data_platform_dependency: true,
        },
    ]
}

fn names(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// The starter backlog: a single stock-accuracy request
pub fn sample_backlog() -> Vec<RequestItem> {
    let mut req = RequestItem::new("Real-time Stock Accuracy API");
    req.id = "1".to_string();
    req.apply(RequestPatch {
        description: Some(
            "Provide live stock levels from Warehouse hubs to global planning.".to_string(),
        ),
        stakeholders: Some(names(&["Warehouse", "Global Planning"])),
        locations: Some(names(&["Ghent", "Lyon"])),
        business_processes: Some(names(&["Stock"])),
        dependencies: Some("SAP WMS 2.0 Integration".to_string()),
        role_efforts: Some(BTreeMap::from([
            (RoleProfile::DataEngineer, 40.0),
            (RoleProfile::Tester, 10.0),
        ])),
        needed_roles: Some(BTreeSet::from([RoleProfile::SubjectMatterExpert])),
        reach: Some(150.0),
        impact: Some(ImpactLevel::Massive),
        confidence: Some(1.0),
        analysis_quarter: Some(Quarter::Q1),
        dev_quarter: Some(Quarter::Q2),
        priority_tier: Some(3),
        ..Default::default()
    });
    vec![req]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_backlog() {
        let backlog = sample_backlog();
        assert_eq!(backlog.len(), 1);

        let req = &backlog[0];
        assert_eq!(req.id, "1");
        assert_eq!(req.metrics.effort, 50.0);
        assert_eq!(req.score, 9.0);
        assert_eq!(
            req.needed_roles,
            BTreeSet::from([
                RoleProfile::SubjectMatterExpert,
                RoleProfile::Tester,
                RoleProfile::DataEngineer,
            ])
        );
    }

    #[test]
    fn test_default_projects_reference_default_teams() {
        let team_ids: Vec<String> = teams().into_iter().map(|t| t.id).collect();
        for project in org_projects() {
            for id in &project.assigned_team_ids {
                assert!(team_ids.contains(id));
            }
        }
    }
}
