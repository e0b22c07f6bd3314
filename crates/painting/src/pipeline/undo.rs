//! Undo/redo for the painting pipeline
//!
//! History works on whole tiers: before each stroke both surfaces of the
//! target tier are copied into an entry. Copies are full snapshots, never
//! deltas or aliases of the live surfaces.

use std::collections::VecDeque;

use tracing::debug;

use crate::geometry::{Tier, TierStack};
use crate::surface::PaintSurface;
use crate::types::Region;

use super::PaintSession;

/// Saved paint of one tier
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Index of the tier the surfaces belong to
    pub tier: usize,
    pub top: PaintSurface,
    pub side: PaintSurface,
}

impl HistoryEntry {
    /// Copy both surfaces of `tier`
    pub fn capture(index: usize, tier: &Tier) -> Self {
        Self {
            tier: index,
            top: tier.surface(Region::Top).clone(),
            side: tier.surface(Region::Side).clone(),
        }
    }

    /// Write the saved surfaces back onto `tier` in place
    fn restore(&self, tier: &mut Tier) {
        tier.surface_mut(Region::Top).copy_from(&self.top);
        tier.surface_mut(Region::Side).copy_from(&self.side);
    }
}

/// Bounded undo stack plus redo stack
#[derive(Debug, Clone)]
pub struct HistoryManager {
    /// Oldest entry at the front
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    /// Maximum undo entries kept
    depth: usize,
}

impl HistoryManager {
    pub fn new(depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(depth.min(64)),
            redo_stack: Vec::new(),
            depth,
        }
    }

    /// Record the state of `stack[tier_index]` before an edit
    ///
    /// Evicts the oldest entry past the depth bound and clears redo.
    /// Returns false if the tier does not exist.
    pub fn begin_edit(&mut self, stack: &TierStack, tier_index: usize) -> bool {
        let Some(tier) = stack.tier(tier_index) else {
            debug!("HistoryManager::begin_edit: no tier {}", tier_index);
            return false;
        };

        self.undo_stack.push_back(HistoryEntry::capture(tier_index, tier));
        while self.undo_stack.len() > self.depth {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();

        debug!(
            "HistoryManager::begin_edit: tier {}, {} undo levels",
            tier_index,
            self.undo_stack.len()
        );
        true
    }

    /// Restore the most recent entry, saving the current state for redo
    ///
    /// Returns the tier index that changed, or None if nothing to undo.
    pub fn undo(&mut self, stack: &mut TierStack) -> Option<usize> {
        let entry = self.undo_stack.pop_back()?;
        let Some(tier) = stack.tier_mut(entry.tier) else {
            return None;
        };

        self.redo_stack.push(HistoryEntry::capture(entry.tier, tier));
        entry.restore(tier);
        debug!("Undo: restored tier {}", entry.tier);
        Some(entry.tier)
    }

    /// Re-apply the most recently undone entry, saving the current state for undo
    ///
    /// Returns the tier index that changed, or None if nothing to redo.
    pub fn redo(&mut self, stack: &mut TierStack) -> Option<usize> {
        let entry = self.redo_stack.pop()?;
        let Some(tier) = stack.tier_mut(entry.tier) else {
            return None;
        };

        // Redo does not clear the redo stack, but the bound still applies
        self.undo_stack.push_back(HistoryEntry::capture(entry.tier, tier));
        while self.undo_stack.len() > self.depth {
            self.undo_stack.pop_front();
        }
        entry.restore(tier);
        debug!("Redo: restored tier {}", entry.tier);
        Some(entry.tier)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl PaintSession {
    /// Undo the last edit
    ///
    /// Returns true if an undo was performed, false if no undo available.
    /// An unfinished stroke is completed first.
    pub fn undo(&mut self) -> bool {
        self.finish_stroke();
        self.history.undo(&mut self.stack).is_some()
    }

    /// Redo the last undone edit
    ///
    /// Returns true if a redo was performed, false if no redo available.
    pub fn redo(&mut self) -> bool {
        self.finish_stroke();
        self.history.redo(&mut self.stack).is_some()
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TierGeometry;
    use glam::Vec2;
    use layercake_config::CanvasConfig;

    fn stack() -> TierStack {
        let canvas = CanvasConfig::new(64, 64);
        TierStack::from_geometries(
            vec![
                TierGeometry::new(Vec2::new(32.0, 40.0), 30.0, 20.0, 8.0).unwrap(),
                TierGeometry::new(Vec2::new(32.0, 24.0), 20.0, 16.0, 6.0).unwrap(),
            ],
            canvas,
        )
    }

    /// Tag a tier's top surface so states can be told apart
    fn mark(stack: &mut TierStack, tier: usize, value: f32) {
        stack
            .tier_mut(tier)
            .unwrap()
            .surface_mut(Region::Top)
            .set_pixel(0, 0, [value, 0.0, 0.0, 1.0]);
    }

    fn marker(stack: &TierStack, tier: usize) -> f32 {
        stack.tier(tier).unwrap().surface(Region::Top).get_pixel(0, 0).unwrap()[0]
    }

    #[test]
    fn test_undo_redo_empty_is_noop() {
        let mut stack = stack();
        let before = stack.tier(0).unwrap().surface(Region::Top).clone();
        let mut history = HistoryManager::new(4);

        assert_eq!(history.undo(&mut stack), None);
        assert_eq!(history.redo(&mut stack), None);
        assert_eq!(stack.tier(0).unwrap().surface(Region::Top), &before);
    }

    #[test]
    fn test_undo_then_redo_restores_both_states() {
        let mut stack = stack();
        let mut history = HistoryManager::new(4);

        mark(&mut stack, 1, 0.25);
        stack
            .tier_mut(1)
            .unwrap()
            .surface_mut(Region::Side)
            .set_pixel(5, 5, [0.0, 1.0, 0.0, 1.0]);
        let before = HistoryEntry::capture(1, stack.tier(1).unwrap());

        assert!(history.begin_edit(&stack, 1));
        mark(&mut stack, 1, 0.75);
        stack.tier_mut(1).unwrap().surface_mut(Region::Side).clear([1.0; 4]);
        let after = HistoryEntry::capture(1, stack.tier(1).unwrap());

        assert_eq!(history.undo(&mut stack), Some(1));
        assert_eq!(HistoryEntry::capture(1, stack.tier(1).unwrap()), before);
        assert!(history.can_redo());

        assert_eq!(history.redo(&mut stack), Some(1));
        assert_eq!(HistoryEntry::capture(1, stack.tier(1).unwrap()), after);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_snapshot_is_independent_of_live_surface() {
        let mut stack = stack();
        let mut history = HistoryManager::new(4);

        history.begin_edit(&stack, 0);
        mark(&mut stack, 0, 0.5);
        history.undo(&mut stack);
        assert_eq!(marker(&stack, 0), 0.0);
    }

    #[test]
    fn test_depth_bound_evicts_oldest_first() {
        let mut stack = stack();
        let mut history = HistoryManager::new(3);

        // States 1..=5 are each saved right before being overwritten
        for state in 1..=5 {
            mark(&mut stack, 0, state as f32);
            history.begin_edit(&stack, 0);
            assert!(history.undo_count() <= 3);
        }
        mark(&mut stack, 0, 6.0);
        assert_eq!(history.undo_count(), 3);

        assert!(history.undo(&mut stack).is_some());
        assert_eq!(marker(&stack, 0), 5.0);
        assert!(history.undo(&mut stack).is_some());
        assert_eq!(marker(&stack, 0), 4.0);
        assert!(history.undo(&mut stack).is_some());
        assert_eq!(marker(&stack, 0), 3.0);
        // States 1 and 2 were evicted
        assert!(history.undo(&mut stack).is_none());
        assert_eq!(marker(&stack, 0), 3.0);
    }

    #[test]
    fn test_begin_edit_clears_redo() {
        let mut stack = stack();
        let mut history = HistoryManager::new(8);

        history.begin_edit(&stack, 0);
        history.begin_edit(&stack, 1);
        history.undo(&mut stack);
        history.undo(&mut stack);
        assert_eq!(history.redo_count(), 2);

        history.begin_edit(&stack, 1);
        assert_eq!(history.redo_count(), 0);
        assert_eq!(history.undo_count(), 1);
    }

    #[test]
    fn test_undo_targets_the_recorded_tier() {
        let mut stack = stack();
        let mut history = HistoryManager::new(8);

        history.begin_edit(&stack, 1);
        mark(&mut stack, 1, 0.5);
        mark(&mut stack, 0, 0.9);

        assert_eq!(history.undo(&mut stack), Some(1));
        assert_eq!(marker(&stack, 1), 0.0);
        // Tier 0 was not part of the entry
        assert_eq!(marker(&stack, 0), 0.9);
    }

    #[test]
    fn test_begin_edit_unknown_tier() {
        let stack = stack();
        let mut history = HistoryManager::new(8);
        assert!(!history.begin_edit(&stack, 7));
        assert!(!history.can_undo());
    }
}
