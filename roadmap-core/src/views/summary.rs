use serde::Serialize;

use crate::models::{RequestItem, RoleProfile};
use crate::repository::RequestRepository;

/// Scores above this are highlighted on the balance chart
pub const HIGHLIGHT_SCORE: f64 = 40.0;

/// Headline figures for the backlog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacklogSummary {
    pub strategic_value: f64,
    pub initiatives: usize,
    /// Total effort in mandays
    pub resource_burden: f64,
    pub node_presence: usize,
    pub stakeholder_reach: usize,
}

pub fn backlog_summary(repo: &RequestRepository) -> BacklogSummary {
    let stats = repo.stats();
    BacklogSummary {
        strategic_value: stats.total_score,
        initiatives: stats.count,
        resource_burden: stats.total_effort,
        node_presence: stats.location_count,
        stakeholder_reach: stats.stakeholder_count,
    }
}

/// Total assigned mandays for one role profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoleLoad {
    pub role: RoleProfile,
    pub mandays: f64,
}

/// Assigned effort per role, every profile listed (business first)
pub fn role_workload(requests: &[RequestItem]) -> Vec<RoleLoad> {
    RoleProfile::all()
        .map(|role| RoleLoad {
            role,
            mandays: requests.iter().map(|r| r.effort_for(role)).sum(),
        })
        .collect()
}

/// A request plotted as effort against value potential
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancePoint {
    pub request_id: String,
    pub title: String,
    pub effort: f64,
    /// reach * impact * confidence, scaled down by 100
    pub value_potential: f64,
    pub score: f64,
    pub highlighted: bool,
}

pub fn strategic_balance(requests: &[RequestItem]) -> Vec<BalancePoint> {
    requests
        .iter()
        .map(|r| BalancePoint {
            request_id: r.id.clone(),
            title: r.title.clone(),
            effort: r.metrics.effort,
            value_potential: r.metrics.reach * r.metrics.impact.multiplier() * r.metrics.confidence
                / 100.0,
            score: r.score,
            highlighted: r.score > HIGHLIGHT_SCORE,
        })
        .collect()
}
