//! Live/Draft workspace management
//!
//! Two independent repositories are held side by side. The mode tag decides
//! which one reads and writes go to. Publishing replaces live wholesale with
//! the draft; discarding resynchronizes the draft from live.

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::RequestItem;
use crate::repository::RequestRepository;

pub const PUBLISH_PROMPT: &str = "Overwrite saved roadmap with your draft version?";
pub const DISCARD_PROMPT: &str = "Discard all draft changes and sync with saved roadmap?";

/// Yes/no gate consulted before destructive transitions
pub trait ConfirmationGate {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> ConfirmationGate for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum WorkspaceMode {
    #[default]
    Live,
    Draft,
}

impl fmt::Display for WorkspaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceMode::Live => write!(f, "Live"),
            WorkspaceMode::Draft => write!(f, "Draft"),
        }
    }
}

/// Result of a confirmed transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    live: RequestRepository,
    draft: RequestRepository,
    mode: WorkspaceMode,
}

impl Workspace {
    /// Starts in Live mode with the draft as a one-time copy of live
    pub fn new(live: RequestRepository) -> Self {
        let draft = live.clone();
        Self {
            live,
            draft,
            mode: WorkspaceMode::Live,
        }
    }

    pub fn mode(&self) -> WorkspaceMode {
        self.mode
    }

    pub fn is_draft(&self) -> bool {
        self.mode == WorkspaceMode::Draft
    }

    /// Switches to Draft; draft content is kept as-is
    pub fn enter_draft(&mut self) {
        self.mode = WorkspaceMode::Draft;
    }

    /// Switches to Live without touching either repository
    pub fn enter_live(&mut self) {
        self.mode = WorkspaceMode::Live;
    }

    /// The repository reads and writes currently target
    pub fn active(&self) -> &RequestRepository {
        match self.mode {
            WorkspaceMode::Live => &self.live,
            WorkspaceMode::Draft => &self.draft,
        }
    }

    pub fn active_mut(&mut self) -> &mut RequestRepository {
        match self.mode {
            WorkspaceMode::Live => &mut self.live,
            WorkspaceMode::Draft => &mut self.draft,
        }
    }

    pub fn live(&self) -> &RequestRepository {
        &self.live
    }

    pub fn draft(&self) -> &RequestRepository {
        &self.draft
    }

    /// Replaces live with the draft and returns to Live mode
    pub fn publish(&mut self, gate: &dyn ConfirmationGate) -> Transition {
        if !gate.confirm(PUBLISH_PROMPT) {
            return Transition::Cancelled;
        }
        self.live = self.draft.clone();
        self.mode = WorkspaceMode::Live;
        info!("Published draft roadmap ({} requests)", self.live.len());
        Transition::Applied
    }

    /// Replaces the draft with a fresh copy of live; mode stays Draft
    pub fn discard_draft(&mut self, gate: &dyn ConfirmationGate) -> Transition {
        if !gate.confirm(DISCARD_PROMPT) {
            return Transition::Cancelled;
        }
        self.draft = self.live.clone();
        self.mode = WorkspaceMode::Draft;
        info!("Draft resynchronized from live ({} requests)", self.draft.len());
        Transition::Applied
    }

    /// Value copy of the active requests, detached from later edits
    pub fn snapshot(&self) -> Vec<RequestItem> {
        self.active().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestPatch;

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    fn titled(title: &str) -> RequestPatch {
        RequestPatch {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    fn seeded() -> Workspace {
        let mut live = RequestRepository::new();
        live.create(titled("Seed"));
        Workspace::new(live)
    }

    #[test]
    fn test_initial_draft_copies_live() {
        let ws = seeded();
        assert_eq!(ws.mode(), WorkspaceMode::Live);
        assert_eq!(ws.live(), ws.draft());
    }

    #[test]
    fn test_draft_edits_do_not_leak_into_live() {
        let mut ws = seeded();
        ws.enter_draft();
        ws.active_mut().create(titled("Draft only"));

        assert_eq!(ws.draft().len(), 2);
        assert_eq!(ws.live().len(), 1);

        ws.enter_live();
        assert_eq!(ws.active().len(), 1);
        ws.enter_draft();
        assert_eq!(ws.active().len(), 2);
    }

    #[test]
    fn test_publish_replaces_live() {
        let mut ws = seeded();
        ws.enter_draft();
        ws.active_mut().create(titled("New"));
        let seed_id = ws.active().requests()[0].id.clone();
        ws.active_mut().delete(&seed_id);
        let expected = ws.draft().clone();

        assert_eq!(ws.publish(&yes), Transition::Applied);
        assert_eq!(ws.mode(), WorkspaceMode::Live);
        assert_eq!(ws.live(), &expected);
        assert_eq!(ws.active(), &expected);
    }

    #[test]
    fn test_publish_cancelled() {
        let mut ws = seeded();
        ws.enter_draft();
        ws.active_mut().create(titled("New"));

        assert_eq!(ws.publish(&no), Transition::Cancelled);
        assert_eq!(ws.mode(), WorkspaceMode::Draft);
        assert_eq!(ws.live().len(), 1);
    }

    #[test]
    fn test_discard_resyncs_draft() {
        let mut ws = seeded();
        ws.enter_draft();
        ws.active_mut().create(titled("Throwaway"));

        assert_eq!(ws.discard_draft(&yes), Transition::Applied);
        assert_eq!(ws.mode(), WorkspaceMode::Draft);
        assert_eq!(ws.draft(), ws.live());
    }

    #[test]
    fn test_discard_cancelled() {
        let mut ws = seeded();
        ws.enter_draft();
        ws.active_mut().create(titled("Keep"));

        assert_eq!(ws.discard_draft(&no), Transition::Cancelled);
        assert_eq!(ws.draft().len(), 2);
    }

    #[test]
    fn test_gate_sees_prompt_text() {
        let mut ws = seeded();
        let gate = |message: &str| message == PUBLISH_PROMPT;
        assert_eq!(ws.publish(&gate), Transition::Applied);
        assert_eq!(ws.discard_draft(&gate), Transition::Cancelled);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut ws = seeded();
        let snapshot = ws.snapshot();
        let id = snapshot[0].id.clone();
        ws.active_mut().delete(&id);

        assert_eq!(snapshot.len(), 1);
        assert!(ws.active().is_empty());
    }
}
