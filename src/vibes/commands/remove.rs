//! # Numbered Removal
//!
//! Removing a vibe is a short conversation, modelled here as an explicit state
//! machine so it can be driven (and tested) without a terminal:
//!
//! ```text
//! Listing ─► Selecting ─► Previewing ─► Confirming ─► Deleting ─► Done
//!               │  ▲                        │
//!               │  └── invalid input        └── "no" ──► Cancelled
//!               └── "cancel" ─────────────────────────► Cancelled
//! ```
//!
//! `Listing` and `Deleting` are transient: they happen inside [`RemoveFlow::start`]
//! and [`RemoveFlow::confirm`]. An empty collection goes straight to
//! `Done(NothingToRemove)`.
//!
//! ## Snapshot Stability
//!
//! The list fetched by `start` is held for the whole flow. Ordinals resolve against
//! it, never against a re-fetch, so "2" means the second row the user saw.
//!
//! The store is shared, so another session may delete the chosen vibe between the
//! snapshot and the confirmation. That is not prevented; the delete then reports
//! `NotFound`, and the flow ends in `Done(AlreadyGone)` rather than claiming success.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, VibesError};
use crate::index::{index_vibes, resolve_ordinal, IndexedVibe, Selection};
use crate::model::Vibe;
use crate::store::VibeStore;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelPoint {
    /// The user picked the cancel sentinel.
    Selection,
    /// The user declined the final confirmation.
    Confirmation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    NothingToRemove,
    Removed(Vibe),
    /// Deleted by someone else after the snapshot was taken.
    AlreadyGone(Vibe),
    Failed {
        vibe: Vibe,
        reason: String,
        /// The store could not be reached, as opposed to refusing the delete.
        unavailable: bool,
    },
}

impl RemoveOutcome {
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            RemoveOutcome::Failed {
                unavailable: true,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveState {
    Selecting,
    /// Holds the 1-based ordinal of the chosen vibe.
    Previewing(usize),
    Confirming(usize),
    Done(RemoveOutcome),
    Cancelled(CancelPoint),
}

#[derive(Debug, Clone)]
pub struct RemoveFlow {
    snapshot: Vec<IndexedVibe>,
    state: RemoveState,
}

impl RemoveFlow {
    /// Listing: fetches the snapshot the rest of the flow works against.
    pub fn start<S: VibeStore>(store: &S) -> Result<Self> {
        Ok(Self::from_snapshot(store.list()?))
    }

    pub fn from_snapshot(vibes: Vec<Vibe>) -> Self {
        let snapshot = index_vibes(vibes);
        let state = if snapshot.is_empty() {
            RemoveState::Done(RemoveOutcome::NothingToRemove)
        } else {
            RemoveState::Selecting
        };
        Self { snapshot, state }
    }

    pub fn state(&self) -> &RemoveState {
        &self.state
    }

    pub fn snapshot(&self) -> &[IndexedVibe] {
        &self.snapshot
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, RemoveState::Done(_) | RemoveState::Cancelled(_))
    }

    /// The chosen vibe, once a valid ordinal has been entered.
    pub fn selected(&self) -> Option<&Vibe> {
        match self.state {
            RemoveState::Previewing(n) | RemoveState::Confirming(n) => {
                resolve_ordinal(&self.snapshot, n).map(|iv| &iv.vibe)
            }
            _ => None,
        }
    }

    /// Selecting: accepts an ordinal in `1..=len` or the cancel sentinel.
    ///
    /// Invalid input returns `VibesError::Validation` and leaves the flow in
    /// `Selecting`, ready for another attempt.
    pub fn select(&mut self, input: &str) -> Result<()> {
        if self.state != RemoveState::Selecting {
            return Err(self.out_of_order("select"));
        }

        let count = self.snapshot.len();
        let invalid = || {
            VibesError::Validation(format!(
                "Please enter a number between 1 and {} or 'cancel'",
                count
            ))
        };
        match input.parse::<Selection>().map_err(|_| invalid())? {
            Selection::Cancel => self.state = RemoveState::Cancelled(CancelPoint::Selection),
            Selection::Ordinal(n) => {
                if resolve_ordinal(&self.snapshot, n).is_none() {
                    return Err(invalid());
                }
                self.state = RemoveState::Previewing(n);
            }
        }
        Ok(())
    }

    /// Previewing: hands out the chosen vibe for display and moves on to `Confirming`.
    pub fn preview(&mut self) -> Result<&Vibe> {
        let n = match self.state {
            RemoveState::Previewing(n) => n,
            _ => return Err(self.out_of_order("preview")),
        };
        self.state = RemoveState::Confirming(n);
        resolve_ordinal(&self.snapshot, n)
            .map(|iv| &iv.vibe)
            .ok_or_else(|| VibesError::Api(format!("ordinal {} missing from snapshot", n)))
    }

    /// Confirming: deletes on `true`, cancels on `false`.
    ///
    /// Store failures do not escape; they become the flow's outcome.
    pub fn confirm<S: VibeStore>(&mut self, store: &mut S, confirmed: bool) -> Result<()> {
        let n = match self.state {
            RemoveState::Confirming(n) => n,
            _ => return Err(self.out_of_order("confirm")),
        };
        if !confirmed {
            self.state = RemoveState::Cancelled(CancelPoint::Confirmation);
            return Ok(());
        }

        let vibe = resolve_ordinal(&self.snapshot, n)
            .map(|iv| iv.vibe.clone())
            .ok_or_else(|| VibesError::Api(format!("ordinal {} missing from snapshot", n)))?;

        let outcome = match store.delete(&vibe.id) {
            Ok(()) => RemoveOutcome::Removed(vibe),
            Err(VibesError::NotFound(_)) => RemoveOutcome::AlreadyGone(vibe),
            Err(e) => {
                warn!(id = %vibe.id, error = %e, "failed to delete vibe");
                RemoveOutcome::Failed {
                    vibe,
                    reason: e.to_string(),
                    unavailable: e.is_unavailable(),
                }
            }
        };
        self.state = RemoveState::Done(outcome);
        Ok(())
    }

    /// Messages describing where the flow ended up.
    pub fn report(&self) -> CmdResult {
        let mut result = CmdResult::default();
        let message = match &self.state {
            RemoveState::Done(RemoveOutcome::NothingToRemove) => {
                CmdMessage::warning("No vibes available to remove")
            }
            RemoveState::Done(RemoveOutcome::Removed(vibe)) => {
                result.affected_vibes.push(vibe.clone());
                CmdMessage::success(format!("Successfully removed '{}'", vibe.title))
            }
            RemoveState::Done(RemoveOutcome::AlreadyGone(vibe)) => CmdMessage::warning(format!(
                "'{}' was already removed by someone else",
                vibe.title
            )),
            RemoveState::Done(RemoveOutcome::Failed { vibe, reason, .. }) => {
                CmdMessage::error(format!("Failed to remove '{}': {}", vibe.title, reason))
            }
            RemoveState::Cancelled(CancelPoint::Selection) => {
                CmdMessage::info("Operation cancelled.")
            }
            RemoveState::Cancelled(CancelPoint::Confirmation) => {
                CmdMessage::info("Deletion cancelled.")
            }
            RemoveState::Selecting | RemoveState::Previewing(_) | RemoveState::Confirming(_) => {
                return result;
            }
        };
        result.add_message(message);
        result
    }

    fn out_of_order(&self, step: &str) -> VibesError {
        VibesError::Api(format!("cannot {} while in state {:?}", step, self.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn scenario_store() -> InMemoryStore {
        StoreFixture::new()
            .with_vibe("Coffee Time", "general")
            .with_vibe("Beach Sunset", "nature")
            .store
    }

    #[test]
    fn empty_store_has_nothing_to_remove() {
        let store = InMemoryStore::new();
        let flow = RemoveFlow::start(&store).unwrap();

        assert_eq!(flow.state(), &RemoveState::Done(RemoveOutcome::NothingToRemove));
        assert!(flow.is_finished());
        assert_eq!(flow.report().messages[0].level, MessageLevel::Warning);
    }

    #[test]
    fn full_flow_removes_selected_vibe() {
        let mut store = scenario_store();
        let mut flow = RemoveFlow::start(&store).unwrap();
        assert_eq!(flow.state(), &RemoveState::Selecting);

        flow.select("1").unwrap();
        assert_eq!(flow.state(), &RemoveState::Previewing(1));
        assert_eq!(flow.preview().unwrap().title, "Beach Sunset");
        assert_eq!(flow.state(), &RemoveState::Confirming(1));

        flow.confirm(&mut store, true).unwrap();
        assert!(matches!(
            flow.state(),
            RemoveState::Done(RemoveOutcome::Removed(v)) if v.title == "Beach Sunset"
        ));

        let remaining = store.list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Coffee Time");
        assert_eq!(
            flow.report().messages[0].content,
            "Successfully removed 'Beach Sunset'"
        );
    }

    #[test]
    fn invalid_ordinals_reprompt_without_side_effects() {
        let store = scenario_store();
        let mut flow = RemoveFlow::start(&store).unwrap();

        for input in ["0", "3", "abc", "", "-1", "1x"] {
            let err = flow.select(input).unwrap_err();
            assert!(matches!(err, VibesError::Validation(_)), "input {:?}", input);
            assert_eq!(flow.state(), &RemoveState::Selecting);
        }
        assert_eq!(store.len(), 2);

        flow.select("2").unwrap();
        assert_eq!(flow.selected().unwrap().title, "Coffee Time");
    }

    #[test]
    fn cancel_sentinel_leaves_store_unchanged() {
        let store = scenario_store();
        let mut flow = RemoveFlow::start(&store).unwrap();

        flow.select("cancel").unwrap();
        assert_eq!(flow.state(), &RemoveState::Cancelled(CancelPoint::Selection));
        assert_eq!(flow.report().messages[0].content, "Operation cancelled.");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn declining_confirmation_leaves_store_unchanged() {
        let mut store = scenario_store();
        let mut flow = RemoveFlow::start(&store).unwrap();
        flow.select("1").unwrap();
        flow.preview().unwrap();

        flow.confirm(&mut store, false).unwrap();
        assert_eq!(
            flow.state(),
            &RemoveState::Cancelled(CancelPoint::Confirmation)
        );
        assert_eq!(flow.report().messages[0].content, "Deletion cancelled.");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ordinal_resolves_against_snapshot_after_store_changes() {
        let mut store = scenario_store();
        let mut flow = RemoveFlow::start(&store).unwrap();

        // A newer vibe appears after the snapshot; a fresh listing would shift ordinals.
        let mut newer = Vibe::new("Late Night".into(), "".into(), None);
        newer.created_at = crate::store::memory::fixtures::base_time() + chrono::Duration::days(1);
        store.create(&newer).unwrap();

        flow.select("1").unwrap();
        assert_eq!(flow.preview().unwrap().title, "Beach Sunset");
        flow.confirm(&mut store, true).unwrap();

        let titles: Vec<_> = store.list().unwrap().into_iter().map(|v| v.title).collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"Late Night".to_string()));
        assert!(titles.contains(&"Coffee Time".to_string()));
    }

    #[test]
    fn concurrent_delete_is_reported_as_already_gone() {
        let mut store = scenario_store();
        let mut flow = RemoveFlow::start(&store).unwrap();
        flow.select("1").unwrap();
        let id = flow.preview().unwrap().id;

        // Another session gets there first.
        store.delete(&id).unwrap();

        flow.confirm(&mut store, true).unwrap();
        assert!(matches!(
            flow.state(),
            RemoveState::Done(RemoveOutcome::AlreadyGone(v)) if v.id == id
        ));
        let report = flow.report();
        assert_eq!(report.messages[0].level, MessageLevel::Warning);
        assert!(report.messages[0].content.contains("already removed"));
        assert!(report.affected_vibes.is_empty());
    }

    #[test]
    fn store_failure_becomes_outcome() {
        let mut store = scenario_store();
        let mut flow = RemoveFlow::start(&store).unwrap();
        flow.select("2").unwrap();
        flow.preview().unwrap();

        store.set_simulate_outage(true);
        flow.confirm(&mut store, true).unwrap();

        match flow.state() {
            RemoveState::Done(outcome @ RemoveOutcome::Failed { .. }) => {
                assert!(outcome.is_unavailable());
            }
            other => panic!("Expected Failed outcome, got {:?}", other),
        }
        assert_eq!(flow.report().messages[0].level, MessageLevel::Error);

        store.set_simulate_outage(false);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn out_of_order_steps_are_rejected() {
        let mut store = scenario_store();
        let mut flow = RemoveFlow::start(&store).unwrap();

        assert!(matches!(flow.preview(), Err(VibesError::Api(_))));
        assert!(matches!(flow.confirm(&mut store, true), Err(VibesError::Api(_))));

        flow.select("1").unwrap();
        assert!(matches!(flow.select("2"), Err(VibesError::Api(_))));
        assert!(matches!(flow.confirm(&mut store, true), Err(VibesError::Api(_))));
        assert_eq!(store.len(), 2);
    }
}
