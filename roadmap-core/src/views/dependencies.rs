use crate::models::RequestItem;

/// A request that declares at least one blocker
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyEntry {
    pub request_id: String,
    pub title: String,
    pub locations: Vec<String>,
    pub blockers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyReport {
    pub entries: Vec<DependencyEntry>,
    /// Blocker labels summed over all blocked requests
    pub total_links: usize,
    /// Score held by requests with no dependency note
    pub unblocked_value: f64,
}

impl DependencyReport {
    pub fn blocked_count(&self) -> usize {
        self.entries.len()
    }
}

/// Lists requests with a non-blank dependency note, split into blocker labels
pub fn dependency_report(requests: &[RequestItem]) -> DependencyReport {
    let mut report = DependencyReport::default();

    for req in requests {
        if !req.has_dependencies() {
            report.unblocked_value += req.score;
            continue;
        }
        let blockers: Vec<String> = req.blockers().into_iter().map(str::to_string).collect();
        report.total_links += blockers.len();
        report.entries.push(DependencyEntry {
            request_id: req.id.clone(),
            title: req.title.clone(),
            locations: req.locations.iter().cloned().collect(),
            blockers,
        });
    }

    report
}
