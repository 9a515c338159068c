//! In-memory collection of backlog requests
//!
//! Mutations targeting an unknown id are silent no-ops: they return `false`
//! and log at debug level instead of surfacing an error.

use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::{ChatMessage, Phase, Quarter, RequestItem, RequestPatch};

/// Reductions over the current collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryStats {
    pub total_score: f64,
    pub total_effort: f64,
    pub count: usize,
    pub location_count: usize,
    pub stakeholder_count: usize,
}

/// Ordered collection of requests with unique ids
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestRepository {
    requests: Vec<RequestItem>,
}

impl RequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from existing records, keeping the first of any duplicate id
    pub fn from_requests(requests: impl IntoIterator<Item = RequestItem>) -> Self {
        let mut seen = BTreeSet::new();
        let mut repo = Self::new();
        for req in requests {
            if !seen.insert(req.id.clone()) {
                warn!("Skipping request with duplicate id {}", req.id);
                continue;
            }
            repo.requests.push(req);
        }
        repo
    }

    /// Creates a request with a fresh id, merging the patch over the defaults
    pub fn create(&mut self, fields: RequestPatch) -> &RequestItem {
        let mut req = RequestItem::new(String::new());
        req.apply(fields);
        debug!("Created request {} ({})", req.id, req.title);
        self.requests.push(req);
        &self.requests[self.requests.len() - 1]
    }

    /// Merges the patch over an existing request
    pub fn update(&mut self, id: &str, fields: RequestPatch) -> bool {
        match self.get_mut(id) {
            Some(req) => {
                req.apply(fields);
                true
            }
            None => {
                debug!("Update skipped, request {} not found", id);
                false
            }
        }
    }

    /// Runs an arbitrary edit against one request, then recomputes its score
    pub fn edit<F>(&mut self, id: &str, edit_fn: F) -> bool
    where
        F: FnOnce(&mut RequestItem),
    {
        match self.get_mut(id) {
            Some(req) => {
                edit_fn(req);
                req.refresh_metrics();
                true
            }
            None => {
                debug!("Edit skipped, request {} not found", id);
                false
            }
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.requests.len();
        self.requests.retain(|r| r.id != id);
        let removed = self.requests.len() != before;
        if !removed {
            debug!("Delete skipped, request {} not found", id);
        }
        removed
    }

    /// Appends to a request's conversation, preserving arrival order
    pub fn append_message(&mut self, id: &str, message: ChatMessage) -> bool {
        match self.get_mut(id) {
            Some(req) => {
                req.messages.push(message);
                true
            }
            None => {
                debug!("Message dropped, request {} not found", id);
                false
            }
        }
    }

    /// Moves one phase of a request to another quarter and sets its tier
    pub fn reschedule(&mut self, id: &str, phase: Phase, quarter: Quarter, tier: u32) -> bool {
        let mut patch = RequestPatch {
            priority_tier: Some(tier),
            ..Default::default()
        };
        match phase {
            Phase::Analysis => patch.analysis_quarter = Some(quarter),
            Phase::Development => patch.dev_quarter = Some(quarter),
        }
        self.update(id, patch)
    }

    pub fn get(&self, id: &str) -> Option<&RequestItem> {
        self.requests.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut RequestItem> {
        self.requests.iter_mut().find(|r| r.id == id)
    }

    pub fn requests(&self) -> &[RequestItem] {
        &self.requests
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestItem> {
        self.requests.iter()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn total_score(&self) -> f64 {
        self.requests.iter().map(|r| r.score).sum()
    }

    pub fn total_effort(&self) -> f64 {
        self.requests.iter().map(|r| r.metrics.effort).sum()
    }

    pub fn distinct_locations(&self) -> BTreeSet<&str> {
        self.requests
            .iter()
            .flat_map(|r| r.locations.iter().map(String::as_str))
            .collect()
    }

    pub fn distinct_stakeholders(&self) -> BTreeSet<&str> {
        self.requests
            .iter()
            .flat_map(|r| r.stakeholders.iter().map(String::as_str))
            .collect()
    }

    pub fn stats(&self) -> RepositoryStats {
        RepositoryStats {
            total_score: self.total_score(),
            total_effort: self.total_effort(),
            count: self.len(),
            location_count: self.distinct_locations().len(),
            stakeholder_count: self.distinct_stakeholders().len(),
        }
    }

    /// Value copy of every request
    pub fn snapshot(&self) -> Vec<RequestItem> {
        self.requests.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImpactLevel, RoleProfile};
    use std::collections::BTreeMap;

    fn titled(title: &str) -> RequestPatch {
        RequestPatch {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let mut repo = RequestRepository::new();
        let a = repo.create(titled("A")).id.clone();
        let b = repo.create(titled("B")).id.clone();

        assert_ne!(a, b);
        assert_eq!(repo.len(), 2);
        assert!(repo.get(&a).unwrap().messages.is_empty());
    }

    #[test]
    fn test_update_merges_fields() {
        let mut repo = RequestRepository::new();
        let id = repo.create(titled("Stock API")).id.clone();

        assert!(repo.update(
            &id,
            RequestPatch {
                description: Some("Live stock levels".to_string()),
                impact: Some(ImpactLevel::High),
                ..Default::default()
            }
        ));

        let req = repo.get(&id).unwrap();
        assert_eq!(req.title, "Stock API");
        assert_eq!(req.description, "Live stock levels");
        assert_eq!(req.metrics.impact, ImpactLevel::High);
        assert_eq!(req.score, 50.0 * 2.0 * 0.8);
    }

    #[test]
    fn test_missing_id_is_noop() {
        let mut repo = RequestRepository::new();
        repo.create(titled("Only"));
        let before = repo.clone();

        assert!(!repo.update("nope", titled("X")));
        assert!(!repo.delete("nope"));
        assert!(!repo.append_message("nope", ChatMessage::new("Planner", "hi")));
        assert!(!repo.reschedule("nope", Phase::Analysis, Quarter::Q2, 2));
        assert_eq!(repo, before);
    }

    #[test]
    fn test_delete_removes_from_aggregates() {
        let mut repo = RequestRepository::new();
        let id = repo
            .create(RequestPatch {
                locations: Some(["Ghent".to_string()].into()),
                stakeholders: Some(["Warehouse".to_string()].into()),
                ..Default::default()
            })
            .id
            .clone();
        assert_eq!(repo.stats().location_count, 1);

        assert!(repo.delete(&id));
        let stats = repo.stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.location_count, 0);
        assert_eq!(stats.total_score, 0.0);
    }

    #[test]
    fn test_messages_keep_arrival_order() {
        let mut repo = RequestRepository::new();
        let id = repo.create(titled("Chatty")).id.clone();
        repo.append_message(&id, ChatMessage::new("Planner", "first"));
        repo.append_message(&id, ChatMessage::new("Analyst", "second"));

        let texts: Vec<&str> = repo
            .get(&id)
            .unwrap()
            .messages
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_stats() {
        let mut repo = RequestRepository::new();
        repo.create(RequestPatch {
            locations: Some(["Ghent".to_string(), "Lyon".to_string()].into()),
            stakeholders: Some(["Warehouse".to_string()].into()),
            role_efforts: Some(BTreeMap::from([(RoleProfile::Tester, 10.0)])),
            ..Default::default()
        });
        repo.create(RequestPatch {
            locations: Some(["Ghent".to_string()].into()),
            stakeholders: Some(["HR".to_string()].into()),
            ..Default::default()
        });

        let stats = repo.stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_effort, 11.0);
        assert_eq!(stats.location_count, 2);
        assert_eq!(stats.stakeholder_count, 2);
    }

    #[test]
    fn test_reschedule_touches_one_phase() {
        let mut repo = RequestRepository::new();
        let id = repo.create(titled("Move me")).id.clone();

        assert!(repo.reschedule(&id, Phase::Development, Quarter::Q3, 2));
        let req = repo.get(&id).unwrap();
        assert_eq!(req.analysis_quarter, Quarter::Q1);
        assert_eq!(req.dev_quarter, Quarter::Q3);
        assert_eq!(req.priority_tier, 2);
    }

    #[test]
    fn test_edit_recomputes_score() {
        let mut repo = RequestRepository::new();
        let id = repo.create(titled("Edit")).id.clone();
        assert!(repo.edit(&id, |req| req.set_role_effort(RoleProfile::TechLead, 4.0)));
        assert!((repo.get(&id).unwrap().score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_confidence_does_not_poison_aggregates() {
        let mut repo = RequestRepository::new();
        for confidence in [f64::NAN, -2.0, 7.0] {
            repo.create(RequestPatch {
                confidence: Some(confidence),
                locations: Some(["Ghent".to_string()].into()),
                stakeholders: Some(["Warehouse".to_string()].into()),
                ..Default::default()
            });
        }

        let stats = repo.stats();
        assert!(stats.total_score.is_finite());
        assert_eq!(stats.total_score, 50.0);
        assert!(repo.iter().all(|r| r.score >= 0.0));
    }

    #[test]
    fn test_from_requests_drops_duplicate_ids() {
        let mut a = RequestItem::new("A");
        a.id = "1".to_string();
        let mut b = RequestItem::new("B");
        b.id = "1".to_string();

        let repo = RequestRepository::from_requests(vec![a, b]);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get("1").unwrap().title, "A");
    }
}
