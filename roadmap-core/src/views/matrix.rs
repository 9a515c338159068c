use std::collections::BTreeMap;

use crate::models::RequestItem;

/// Summed scores per (location, stakeholder) pair.
///
/// Axes hold only the names that occur in the current requests, sorted.
/// Cells exist only for pairs with at least one contributing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMatrix {
    pub locations: Vec<String>,
    pub stakeholders: Vec<String>,
    cells: BTreeMap<(String, String), f64>,
}

impl ValueMatrix {
    pub fn cell(&self, location: &str, stakeholder: &str) -> Option<f64> {
        self.cells
            .get(&(location.to_string(), stakeholder.to_string()))
            .copied()
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.cells
            .iter()
            .map(|((loc, stake), value)| (loc.as_str(), stake.as_str(), *value))
    }

    /// Largest cell value, at least 1 so intensities stay within [0, 1]
    pub fn max_value(&self) -> f64 {
        self.cells.values().copied().fold(1.0, f64::max)
    }

    /// Relative weight of a cell against the largest one
    pub fn intensity(&self, location: &str, stakeholder: &str) -> f64 {
        self.cell(location, stakeholder)
            .map(|value| value / self.max_value())
            .unwrap_or(0.0)
    }

    /// Requests contributing to a cell, highest score first
    pub fn drill_down<'a>(
        requests: &'a [RequestItem],
        location: &str,
        stakeholder: &str,
    ) -> Vec<&'a RequestItem> {
        let mut hits: Vec<&RequestItem> = requests
            .iter()
            .filter(|r| r.locations.contains(location) && r.stakeholders.contains(stakeholder))
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

pub fn value_matrix(requests: &[RequestItem]) -> ValueMatrix {
    let mut cells: BTreeMap<(String, String), f64> = BTreeMap::new();
    let mut locations: Vec<String> = Vec::new();
    let mut stakeholders: Vec<String> = Vec::new();

    for req in requests {
        locations.extend(req.locations.iter().cloned());
        stakeholders.extend(req.stakeholders.iter().cloned());
        for loc in &req.locations {
            for stake in &req.stakeholders {
                *cells.entry((loc.clone(), stake.clone())).or_insert(0.0) += req.score;
            }
        }
    }

    locations.sort();
    locations.dedup();
    stakeholders.sort();
    stakeholders.dedup();

    ValueMatrix {
        locations,
        stakeholders,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestPatch;
    use crate::repository::RequestRepository;

    fn scoped(repo: &mut RequestRepository, reach: f64, locs: &[&str], stakes: &[&str]) {
        repo.create(RequestPatch {
            reach: Some(reach),
            confidence: Some(1.0),
            locations: Some(locs.iter().map(|s| s.to_string()).collect()),
            stakeholders: Some(stakes.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        });
    }

    #[test]
    fn test_cell_sums_shared_scores() {
        // Medium impact, confidence 1, effort 1: score == reach
        let mut repo = RequestRepository::new();
        scoped(&mut repo, 10.0, &["Ghent"], &["Warehouse"]);
        scoped(&mut repo, 20.0, &["Ghent", "Lyon"], &["Warehouse"]);
        scoped(&mut repo, 5.0, &["Lyon"], &["HR"]);

        let matrix = value_matrix(repo.requests());
        assert_eq!(matrix.cell("Ghent", "Warehouse"), Some(30.0));
        assert_eq!(matrix.cell("Lyon", "Warehouse"), Some(20.0));
        assert_eq!(matrix.cell("Lyon", "HR"), Some(5.0));
        assert_eq!(matrix.cell("Ghent", "HR"), None);
        assert_eq!(matrix.locations, vec!["Ghent", "Lyon"]);
        assert_eq!(matrix.stakeholders, vec!["HR", "Warehouse"]);
    }

    #[test]
    fn test_axes_follow_data_only() {
        let mut repo = RequestRepository::new();
        scoped(&mut repo, 10.0, &["Ghent"], &[]);

        let matrix = value_matrix(repo.requests());
        assert_eq!(matrix.locations, vec!["Ghent"]);
        assert!(matrix.stakeholders.is_empty());
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_drill_down_sorted_by_score() {
        let mut repo = RequestRepository::new();
        scoped(&mut repo, 10.0, &["Ghent"], &["Warehouse"]);
        scoped(&mut repo, 20.0, &["Ghent"], &["Warehouse"]);
        scoped(&mut repo, 99.0, &["Lyon"], &["Warehouse"]);

        let hits = ValueMatrix::drill_down(repo.requests(), "Ghent", "Warehouse");
        let scores: Vec<f64> = hits.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![20.0, 10.0]);
    }

    #[test]
    fn test_intensity() {
        let mut repo = RequestRepository::new();
        scoped(&mut repo, 40.0, &["Ghent"], &["Warehouse"]);
        scoped(&mut repo, 10.0, &["Lyon"], &["Warehouse"]);

        let matrix = value_matrix(repo.requests());
        assert_eq!(matrix.max_value(), 40.0);
        assert_eq!(matrix.intensity("Lyon", "Warehouse"), 0.25);
        assert_eq!(matrix.intensity("Lyon", "HR"), 0.0);
    }

    #[test]
    fn test_deleted_request_leaves_matrix() {
        let mut repo = RequestRepository::new();
        scoped(&mut repo, 10.0, &["Ghent"], &["Warehouse"]);
        let id = repo.requests()[0].id.clone();
        repo.delete(&id);

        let matrix = value_matrix(repo.requests());
        assert!(matrix.locations.is_empty());
        assert_eq!(matrix.cell("Ghent", "Warehouse"), None);
    }
}
