use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::input::{sanitize_amount, sanitize_confidence};
use crate::scoring;

/// Generates a fresh opaque identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Role profiles that can be staffed on a request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleProfile {
    SubjectMatterExpert,
    BusinessAnalyst,
    Tester,
    Dpo,
    DomainArchitect,
    TechLead,
    DataEngineer,
    DataAnalyst,
}

impl RoleProfile {
    /// Business-side profiles
    pub const BUSINESS: [RoleProfile; 3] = [
        RoleProfile::SubjectMatterExpert,
        RoleProfile::BusinessAnalyst,
        RoleProfile::Tester,
    ];

    /// IT-side profiles
    pub const IT: [RoleProfile; 5] = [
        RoleProfile::Dpo,
        RoleProfile::DomainArchitect,
        RoleProfile::TechLead,
        RoleProfile::DataEngineer,
        RoleProfile::DataAnalyst,
    ];

    /// All profiles, business first
    pub fn all() -> impl Iterator<Item = RoleProfile> {
        Self::BUSINESS.into_iter().chain(Self::IT)
    }

    pub fn is_business(&self) -> bool {
        Self::BUSINESS.contains(self)
    }
}

impl fmt::Display for RoleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleProfile::SubjectMatterExpert => write!(f, "Subject Matter Expert"),
            RoleProfile::BusinessAnalyst => write!(f, "Business Analyst"),
            RoleProfile::Tester => write!(f, "Tester"),
            RoleProfile::Dpo => write!(f, "DPO"),
            RoleProfile::DomainArchitect => write!(f, "Domain Architect"),
            RoleProfile::TechLead => write!(f, "Tech Lead"),
            RoleProfile::DataEngineer => write!(f, "Data Engineer"),
            RoleProfile::DataAnalyst => write!(f, "Data Analyst"),
        }
    }
}

/// The fixed RICE impact multiplier scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ImpactLevel {
    Massive,
    High,
    Medium,
    Low,
    Minimal,
}

impl ImpactLevel {
    pub const ALL: [ImpactLevel; 5] = [
        ImpactLevel::Massive,
        ImpactLevel::High,
        ImpactLevel::Medium,
        ImpactLevel::Low,
        ImpactLevel::Minimal,
    ];

    /// Multiplier applied in the score
    pub fn multiplier(&self) -> f64 {
        match self {
            ImpactLevel::Massive => 3.0,
            ImpactLevel::High => 2.0,
            ImpactLevel::Medium => 1.0,
            ImpactLevel::Low => 0.5,
            ImpactLevel::Minimal => 0.25,
        }
    }

    /// Maps a raw multiplier back onto the scale, if it is one of the fixed values
    pub fn from_multiplier(value: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.multiplier() == value)
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactLevel::Massive => write!(f, "Massive (3x)"),
            ImpactLevel::High => write!(f, "High (2x)"),
            ImpactLevel::Medium => write!(f, "Medium (1x)"),
            ImpactLevel::Low => write!(f, "Low (0.5x)"),
            ImpactLevel::Minimal => write!(f, "Minimal (0.25x)"),
        }
    }
}

/// Confidence presets offered when editing a request: (label, fraction)
pub const CONFIDENCE_LEVELS: [(&str, f64); 3] = [
    ("High (100%)", 1.0),
    ("Medium (80%)", 0.8),
    ("Low (50%)", 0.5),
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Quarter must be between 1 and 4, got {0}")]
pub struct QuarterError(pub u8);

/// Calendar quarter, always within 1..=4
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quarter(u8);

impl Quarter {
    pub const Q1: Quarter = Quarter(1);
    pub const Q2: Quarter = Quarter(2);
    pub const Q3: Quarter = Quarter(3);
    pub const Q4: Quarter = Quarter(4);

    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn new(value: u8) -> Result<Self, QuarterError> {
        if (1..=4).contains(&value) {
            Ok(Quarter(value))
        } else {
            Err(QuarterError(value))
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Quarter {
    type Error = QuarterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quarter::new(value)
    }
}

impl From<Quarter> for u8 {
    fn from(quarter: Quarter) -> Self {
        quarter.0
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// Delivery phase a quarter refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Analysis,
    Development,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Analysis => write!(f, "Analysis"),
            Phase::Development => write!(f, "Dev"),
        }
    }
}

/// RICE inputs plus the derived effort
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiceMetrics {
    /// Expected monthly users/events
    pub reach: f64,
    pub impact: ImpactLevel,
    /// Fraction in (0, 1]
    pub confidence: f64,
    /// Sum of role efforts, floored at 1
    pub effort: f64,
}

/// A single comment in a request's conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            author: author.into(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A backlog work item scored with RICE
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub stakeholders: BTreeSet<String>,
    pub locations: BTreeSet<String>,
    pub business_processes: BTreeSet<String>,

    /// Free-text, comma-separated blocker list
    pub dependencies: String,

    /// Estimated mandays per role. Absent means zero.
    pub role_efforts: BTreeMap<RoleProfile, f64>,

    /// Roles flagged as required, even without an estimate
    pub needed_roles: BTreeSet<RoleProfile>,

    pub metrics: RiceMetrics,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub analysis_quarter: Quarter,
    pub dev_quarter: Quarter,
    pub priority_tier: u32,

    /// Append-only conversation
    pub messages: Vec<ChatMessage>,
}

impl RequestItem {
    /// Creates a request with the default form values and a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        let mut item = Self {
            id: new_id(),
            title: title.into(),
            description: String::new(),
            stakeholders: BTreeSet::new(),
            locations: BTreeSet::new(),
            business_processes: BTreeSet::from(["General".to_string()]),
            dependencies: String::new(),
            role_efforts: BTreeMap::new(),
            needed_roles: BTreeSet::new(),
            metrics: RiceMetrics {
                reach: 50.0,
                impact: ImpactLevel::Medium,
                confidence: 0.8,
                effort: 1.0,
            },
            score: 0.0,
            created_at: Utc::now(),
            analysis_quarter: Quarter::Q1,
            dev_quarter: Quarter::Q1,
            priority_tier: 1,
            messages: Vec::new(),
        };
        item.refresh_metrics();
        item
    }

    /// Merges the set fields of a patch over this request
    pub fn apply(&mut self, patch: RequestPatch) {
        let RequestPatch {
            title,
            description,
            stakeholders,
            locations,
            business_processes,
            dependencies,
            role_efforts,
            needed_roles,
            reach,
            impact,
            confidence,
            analysis_quarter,
            dev_quarter,
            priority_tier,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(stakeholders) = stakeholders {
            self.stakeholders = stakeholders;
        }
        if let Some(locations) = locations {
            self.locations = locations;
        }
        if let Some(processes) = business_processes {
            self.business_processes = processes;
        }
        if let Some(dependencies) = dependencies {
            self.dependencies = dependencies;
        }
        if let Some(needed) = needed_roles {
            self.needed_roles = needed;
        }
        if let Some(efforts) = role_efforts {
            self.role_efforts.clear();
            for (role, md) in efforts {
                self.insert_effort(role, md);
            }
        }
        if let Some(reach) = reach {
            self.metrics.reach = sanitize_amount(reach);
        }
        if let Some(impact) = impact {
            self.metrics.impact = impact;
        }
        if let Some(confidence) = confidence {
            self.metrics.confidence = sanitize_confidence(confidence);
        }
        if let Some(quarter) = analysis_quarter {
            self.analysis_quarter = quarter;
        }
        if let Some(quarter) = dev_quarter {
            self.dev_quarter = quarter;
        }
        if let Some(tier) = priority_tier {
            self.priority_tier = tier;
        }

        self.refresh_metrics();
    }

    /// Sets the estimate for one role; zero removes it from the effort map
    pub fn set_role_effort(&mut self, role: RoleProfile, mandays: f64) {
        self.insert_effort(role, mandays);
        self.refresh_metrics();
    }

    /// Flags or un-flags a role as needed.
    ///
    /// Returns `false` when un-flagging is refused because the role still
    /// carries a positive estimate.
    pub fn set_role_needed(&mut self, role: RoleProfile, needed: bool) -> bool {
        if needed {
            self.needed_roles.insert(role);
            return true;
        }
        if self.effort_for(role) > 0.0 {
            return false;
        }
        self.needed_roles.remove(&role);
        true
    }

    pub fn effort_for(&self, role: RoleProfile) -> f64 {
        self.role_efforts.get(&role).copied().unwrap_or(0.0)
    }

    /// Sum of all role estimates, before the floor is applied
    pub fn declared_effort(&self) -> f64 {
        scoring::total_effort(&self.role_efforts)
    }

    /// Individual blocker labels from the dependency note
    pub fn blockers(&self) -> Vec<&str> {
        self.dependencies
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .collect()
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.trim().is_empty()
    }

    /// Recomputes derived effort and score from the current inputs
    pub fn refresh_metrics(&mut self) {
        for (role, md) in &self.role_efforts {
            if *md > 0.0 {
                self.needed_roles.insert(*role);
            }
        }
        self.metrics.effort = scoring::effort_floor(self.declared_effort());
        self.score = scoring::score(
            self.metrics.reach,
            self.metrics.impact.multiplier(),
            self.metrics.confidence,
            self.metrics.effort,
        );
    }

    fn insert_effort(&mut self, role: RoleProfile, mandays: f64) {
        let mandays = sanitize_amount(mandays);
        if mandays > 0.0 {
            self.role_efforts.insert(role, mandays);
        } else {
            self.role_efforts.remove(&role);
        }
    }
}

/// Partial update for a request. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub stakeholders: Option<BTreeSet<String>>,
    pub locations: Option<BTreeSet<String>>,
    pub business_processes: Option<BTreeSet<String>>,
    pub dependencies: Option<String>,
    pub role_efforts: Option<BTreeMap<RoleProfile, f64>>,
    pub needed_roles: Option<BTreeSet<RoleProfile>>,
    pub reach: Option<f64>,
    pub impact: Option<ImpactLevel>,
    pub confidence: Option<f64>,
    pub analysis_quarter: Option<Quarter>,
    pub dev_quarter: Option<Quarter>,
    pub priority_tier: Option<u32>,
}

impl RequestPatch {
    pub fn is_empty(&self) -> bool {
        *self == RequestPatch::default()
    }
}

/// An organizational team
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrgTeam {
    pub id: String,
    pub name: String,
}

/// An org-level strategic project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrgProject {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Team ids; may dangle after a team is removed
    pub assigned_team_ids: Vec<String>,
    pub has_data_platform_dependency: bool,
}

/// Editable fields of a project, used for both add and update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub assigned_team_ids: Vec<String>,
    pub has_data_platform_dependency: bool,
}

impl ProjectDraft {
    /// Adds the team if absent, removes it otherwise
    pub fn toggle_team(&mut self, team_id: &str) {
        if let Some(pos) = self.assigned_team_ids.iter().position(|id| id == team_id) {
            self.assigned_team_ids.remove(pos);
        } else {
            self.assigned_team_ids.push(team_id.to_string());
        }
    }
}

impl From<&OrgProject> for ProjectDraft {
    fn from(project: &OrgProject) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            assigned_team_ids: project.assigned_team_ids.clone(),
            has_data_platform_dependency: project.has_data_platform_dependency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_defaults() {
        let req = RequestItem::new("Stock feed");
        assert_eq!(req.metrics.reach, 50.0);
        assert_eq!(req.metrics.impact, ImpactLevel::Medium);
        assert_eq!(req.metrics.confidence, 0.8);
        assert_eq!(req.metrics.effort, 1.0);
        assert!((req.score - 40.0).abs() < 1e-9);
        assert!(req.business_processes.contains("General"));
        assert_eq!(req.analysis_quarter, Quarter::Q1);
        assert_eq!(req.priority_tier, 1);
        assert!(req.messages.is_empty());
    }

    #[test]
    fn test_role_efforts_sum_and_needed_roles() {
        let mut req = RequestItem::new("Stock API");
        req.set_role_effort(RoleProfile::Tester, 10.0);
        req.set_role_effort(RoleProfile::DataEngineer, 40.0);

        assert_eq!(req.declared_effort(), 50.0);
        assert_eq!(req.metrics.effort, 50.0);
        assert!(req.needed_roles.contains(&RoleProfile::Tester));
        assert!(req.needed_roles.contains(&RoleProfile::DataEngineer));
    }

    #[test]
    fn test_zero_effort_keeps_needed_role() {
        let mut req = RequestItem::new("Stock API");
        req.set_role_effort(RoleProfile::Tester, 10.0);
        req.set_role_effort(RoleProfile::Tester, 0.0);

        assert!(!req.role_efforts.contains_key(&RoleProfile::Tester));
        assert!(req.needed_roles.contains(&RoleProfile::Tester));
        assert_eq!(req.metrics.effort, 1.0);
    }

    #[test]
    fn test_unflag_refused_while_effort_positive() {
        let mut req = RequestItem::new("Stock API");
        req.set_role_effort(RoleProfile::TechLead, 5.0);
        assert!(!req.set_role_needed(RoleProfile::TechLead, false));
        assert!(req.needed_roles.contains(&RoleProfile::TechLead));

        assert!(req.set_role_needed(RoleProfile::Dpo, true));
        assert!(req.set_role_needed(RoleProfile::Dpo, false));
        assert!(!req.needed_roles.contains(&RoleProfile::Dpo));
    }

    #[test]
    fn test_patch_restores_needed_role_invariant() {
        let mut req = RequestItem::new("Stock API");
        req.apply(RequestPatch {
            role_efforts: Some(BTreeMap::from([(RoleProfile::DataAnalyst, 8.0)])),
            needed_roles: Some(BTreeSet::new()),
            ..Default::default()
        });
        assert!(req.needed_roles.contains(&RoleProfile::DataAnalyst));
    }

    #[test]
    fn test_patch_merges_and_rescores() {
        let mut req = RequestItem::new("Original");
        req.apply(RequestPatch {
            reach: Some(150.0),
            impact: Some(ImpactLevel::Massive),
            confidence: Some(1.0),
            role_efforts: Some(BTreeMap::from([
                (RoleProfile::DataEngineer, 40.0),
                (RoleProfile::Tester, 10.0),
            ])),
            ..Default::default()
        });

        assert_eq!(req.title, "Original");
        assert_eq!(req.score, 9.0);
    }

    #[test]
    fn test_confidence_out_of_range_keeps_score_finite() {
        let mut req = RequestItem::new("Bad confidence");
        req.apply(RequestPatch {
            confidence: Some(f64::NAN),
            ..Default::default()
        });
        assert_eq!(req.metrics.confidence, 0.0);
        assert_eq!(req.score, 0.0);

        req.apply(RequestPatch {
            confidence: Some(-2.0),
            ..Default::default()
        });
        assert_eq!(req.score, 0.0);

        req.apply(RequestPatch {
            confidence: Some(7.0),
            ..Default::default()
        });
        assert_eq!(req.metrics.confidence, 1.0);
        assert_eq!(req.score, 50.0);
    }

    #[test]
    fn test_negative_effort_is_dropped() {
        let mut req = RequestItem::new("Bad input");
        req.set_role_effort(RoleProfile::Tester, -3.0);
        req.set_role_effort(RoleProfile::TechLead, f64::NAN);
        assert!(req.role_efforts.is_empty());
        assert!(req.needed_roles.is_empty());
    }

    #[test]
    fn test_blockers_split_and_trim() {
        let mut req = RequestItem::new("Blocked");
        req.dependencies = "SAP WMS 2.0, , Network upgrade ".to_string();
        assert_eq!(req.blockers(), vec!["SAP WMS 2.0", "Network upgrade"]);
        assert!(req.has_dependencies());

        req.dependencies = "   ".to_string();
        assert!(!req.has_dependencies());
        assert!(req.blockers().is_empty());
    }

    #[test]
    fn test_quarter_bounds() {
        assert!(Quarter::new(0).is_err());
        assert!(Quarter::new(5).is_err());
        assert_eq!(Quarter::new(3).unwrap().to_string(), "Q3");
        let parsed: Result<Quarter, _> = serde_json::from_str("7");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_impact_from_multiplier() {
        assert_eq!(ImpactLevel::from_multiplier(0.5), Some(ImpactLevel::Low));
        assert_eq!(ImpactLevel::from_multiplier(1.5), None);
    }

    #[test]
    fn test_project_draft_toggle_team() {
        let mut draft = ProjectDraft::default();
        draft.toggle_team("t1");
        draft.toggle_team("t2");
        draft.toggle_team("t1");
        assert_eq!(draft.assigned_team_ids, vec!["t2".to_string()]);
    }

    #[test]
    fn test_role_profile_order() {
        let roles: Vec<RoleProfile> = RoleProfile::all().collect();
        assert_eq!(roles.len(), 8);
        assert_eq!(roles[0], RoleProfile::SubjectMatterExpert);
        assert!(roles[2].is_business());
        assert!(!roles[3].is_business());
    }
}
