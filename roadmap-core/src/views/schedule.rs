use std::collections::BTreeMap;

use crate::models::{Phase, Quarter, RequestItem};

/// Tier rows shown top to bottom even when empty
pub const STANDARD_TIERS: [u32; 4] = [3, 2, 1, 0];

pub fn tier_label(tier: u32) -> String {
    match tier {
        3 => "Critical".to_string(),
        2 => "High".to_string(),
        1 => "Medium".to_string(),
        0 => "Low".to_string(),
        other => format!("Tier {}", other),
    }
}

/// One card in a grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct GridEntry {
    pub request_id: String,
    pub title: String,
    pub phase: Phase,
    pub score: f64,
}

/// Requests laid out by (tier, quarter).
///
/// A request sits in its analysis-quarter cell tagged `Analysis` and in its
/// dev-quarter cell tagged `Development`, both on its tier row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleGrid {
    tiers: Vec<u32>,
    cells: BTreeMap<(u32, Quarter), Vec<GridEntry>>,
}

impl ScheduleGrid {
    /// Row order: any non-standard tier in use (highest first), then the standard tiers
    pub fn tiers(&self) -> &[u32] {
        &self.tiers
    }

    pub fn cell(&self, tier: u32, quarter: Quarter) -> &[GridEntry] {
        self.cells
            .get(&(tier, quarter))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn rows(&self) -> impl Iterator<Item = (u32, [&[GridEntry]; 4])> + '_ {
        self.tiers.iter().map(move |&tier| {
            (
                tier,
                Quarter::ALL.map(|quarter| self.cell(tier, quarter)),
            )
        })
    }
}

pub fn scheduling_grid(requests: &[RequestItem]) -> ScheduleGrid {
    let mut cells: BTreeMap<(u32, Quarter), Vec<GridEntry>> = BTreeMap::new();

    for req in requests {
        for (phase, quarter) in [
            (Phase::Analysis, req.analysis_quarter),
            (Phase::Development, req.dev_quarter),
        ] {
            cells
                .entry((req.priority_tier, quarter))
                .or_default()
                .push(GridEntry {
                    request_id: req.id.clone(),
                    title: req.title.clone(),
                    phase,
                    score: req.score,
                });
        }
    }

    // Standard tiers cover 0..=3, so any other tier ranks above Critical
    let mut tiers: Vec<u32> = requests
        .iter()
        .map(|r| r.priority_tier)
        .filter(|tier| !STANDARD_TIERS.contains(tier))
        .collect();
    tiers.sort_unstable_by(|a, b| b.cmp(a));
    tiers.dedup();
    tiers.extend(STANDARD_TIERS);

    ScheduleGrid { tiers, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestPatch;
    use crate::repository::RequestRepository;

    fn scheduled(repo: &mut RequestRepository, title: &str, a: u8, d: u8, tier: u32) -> String {
        repo.create(RequestPatch {
            title: Some(title.to_string()),
            analysis_quarter: Some(Quarter::new(a).unwrap()),
            dev_quarter: Some(Quarter::new(d).unwrap()),
            priority_tier: Some(tier),
            ..Default::default()
        })
        .id
        .clone()
    }

    #[test]
    fn test_request_occupies_two_cells() {
        let mut repo = RequestRepository::new();
        let id = scheduled(&mut repo, "Split", 1, 3, 2);

        let grid = scheduling_grid(repo.requests());
        let analysis = grid.cell(2, Quarter::Q1);
        let dev = grid.cell(2, Quarter::Q3);

        assert_eq!(analysis.len(), 1);
        assert_eq!(analysis[0].request_id, id);
        assert_eq!(analysis[0].phase, Phase::Analysis);
        assert_eq!(dev.len(), 1);
        assert_eq!(dev[0].phase, Phase::Development);
        assert!(grid.cell(2, Quarter::Q2).is_empty());
    }

    #[test]
    fn test_same_quarter_shows_both_phases() {
        let mut repo = RequestRepository::new();
        scheduled(&mut repo, "Compact", 2, 2, 1);

        let grid = scheduling_grid(repo.requests());
        let phases: Vec<Phase> = grid.cell(1, Quarter::Q2).iter().map(|e| e.phase).collect();
        assert_eq!(phases, vec![Phase::Analysis, Phase::Development]);
    }

    #[test]
    fn test_tier_rows() {
        let mut repo = RequestRepository::new();
        scheduled(&mut repo, "Urgent", 1, 1, 7);

        let grid = scheduling_grid(repo.requests());
        assert_eq!(grid.tiers(), &[7, 3, 2, 1, 0]);
        assert_eq!(tier_label(7), "Tier 7");
        assert_eq!(tier_label(3), "Critical");

        let rows: Vec<u32> = grid.rows().map(|(tier, _)| tier).collect();
        assert_eq!(rows, vec![7, 3, 2, 1, 0]);
    }

    #[test]
    fn test_reschedule_moves_card() {
        let mut repo = RequestRepository::new();
        let id = scheduled(&mut repo, "Mover", 1, 2, 1);
        repo.reschedule(&id, Phase::Analysis, Quarter::Q4, 3);

        let grid = scheduling_grid(repo.requests());
        assert_eq!(grid.cell(3, Quarter::Q4)[0].phase, Phase::Analysis);
        assert_eq!(grid.cell(3, Quarter::Q2)[0].phase, Phase::Development);
        assert!(grid.cell(1, Quarter::Q1).is_empty());
    }
}
