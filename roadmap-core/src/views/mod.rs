//! Derived views
//!
//! Pure functions recomputed on every read from the active repository and the
//! organizational registry. Nothing here is cached.

mod dependencies;
mod matrix;
mod org;
mod schedule;
mod summary;

pub use dependencies::{dependency_report, DependencyEntry, DependencyReport};
pub use matrix::{value_matrix, ValueMatrix};
pub use org::{org_overview, OrgOverview, ProjectRow};
pub use schedule::{scheduling_grid, tier_label, GridEntry, ScheduleGrid, STANDARD_TIERS};
pub use summary::{
    backlog_summary, role_workload, strategic_balance, BacklogSummary, BalancePoint, RoleLoad,
    HIGHLIGHT_SCORE,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use crate::models::Quarter;
    use crate::repository::RequestRepository;

    #[test]
    fn test_deleted_request_leaves_every_view() {
        let mut repo = RequestRepository::from_requests(defaults::sample_backlog());
        assert_eq!(scheduling_grid(repo.requests()).cell(3, Quarter::Q1).len(), 1);
        assert_eq!(dependency_report(repo.requests()).blocked_count(), 1);

        assert!(repo.delete("1"));
        let requests = repo.requests();

        let grid = scheduling_grid(requests);
        for tier in STANDARD_TIERS {
            for quarter in Quarter::ALL {
                assert!(grid.cell(tier, quarter).is_empty());
            }
        }

        let report = dependency_report(requests);
        assert!(report.entries.is_empty());
        assert_eq!(report.total_links, 0);
        assert_eq!(report.unblocked_value, 0.0);

        assert!(role_workload(requests).iter().all(|load| load.mandays == 0.0));
        assert!(strategic_balance(requests).is_empty());
        assert!(value_matrix(requests).is_empty());
        assert_eq!(backlog_summary(&repo).initiatives, 0);
    }
}
