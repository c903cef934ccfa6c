//! Dependency cascade between nested fixes
//!
//! The two directions are intentionally asymmetric:
//! - activating a fix activates its whole subtree (a parent fix needs all of
//!   its nested sub-fixes applied)
//! - deactivating a fix deactivates only its strictly-decreasing ancestor
//!   chain (an ancestor can no longer be applied without the withdrawn
//!   sub-fix, but sibling subtrees are left alone)
//!
//! Cascades only run in Manual mode.

use super::{ancestors, subtree_end, FixId, FixList, FixRecord};
use crate::session::ReviewMode;

/// Which way a toggle went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Activate,
    Deactivate,
}

impl Direction {
    fn flag(self) -> bool {
        matches!(self, Direction::Activate)
    }
}

/// Toggle `toggled` and return the updated records.
///
/// Returns the input unchanged when `mode` is not Manual or the id is unknown.
pub fn cascade(records: &[FixRecord], toggled: &FixId, mode: ReviewMode) -> Vec<FixRecord> {
    let mut updated = records.to_vec();
    if mode != ReviewMode::Manual {
        return updated;
    }
    if let Some(idx) = updated.iter().position(|r| &r.id == toggled) {
        let direction = if updated[idx].active {
            Direction::Deactivate
        } else {
            Direction::Activate
        };
        apply(&mut updated, idx, direction);
    }
    updated
}

/// Set the record at `idx` per `direction` and propagate.
///
/// Returns the indexes whose `active` flag actually changed.
pub(crate) fn apply(records: &mut [FixRecord], idx: usize, direction: Direction) -> Vec<usize> {
    if idx >= records.len() {
        return Vec::new();
    }
    let affected: Vec<usize> = match direction {
        Direction::Activate => (idx..subtree_end(records, idx)).collect(),
        Direction::Deactivate => std::iter::once(idx)
            .chain(ancestors(records, idx))
            .collect(),
    };

    let flag = direction.flag();
    let mut changed = Vec::new();
    for i in affected {
        if records[i].active != flag {
            records[i].active = flag;
            changed.push(i);
        }
    }
    changed
}

impl FixList {
    /// Flip one record and cascade. Returns ids whose state changed.
    pub fn toggle(&mut self, id: &FixId, mode: ReviewMode) -> Vec<FixId> {
        let Some(idx) = self.position(id) else {
            return Vec::new();
        };
        let direction = if self.records()[idx].active {
            Direction::Deactivate
        } else {
            Direction::Activate
        };
        self.set(idx, direction, mode)
    }

    /// Force a record on or off and cascade. Returns ids whose state changed.
    pub fn set(&mut self, idx: usize, direction: Direction, mode: ReviewMode) -> Vec<FixId> {
        if mode != ReviewMode::Manual {
            return Vec::new();
        }
        let records = self.records_mut();
        apply(records, idx, direction)
            .into_iter()
            .map(|i| records[i].id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::FixMode;

    fn records(spec: &[(&str, usize)]) -> Vec<FixRecord> {
        spec.iter()
            .map(|(id, depth)| FixRecord::new(*id, *depth, FixMode::Cast))
            .collect()
    }

    fn active_ids(records: &[FixRecord]) -> Vec<&str> {
        records
            .iter()
            .filter(|r| r.active)
            .map(|r| r.id.as_str())
            .collect()
    }

    fn scenario() -> Vec<FixRecord> {
        records(&[("A", 0), ("B", 1), ("C", 2), ("D", 1), ("E", 0)])
    }

    #[test]
    fn test_activate_then_deactivate_scenario() {
        let after_a = cascade(&scenario(), &FixId::new("A"), ReviewMode::Manual);
        assert_eq!(active_ids(&after_a), vec!["A", "B", "C", "D"]);

        let after_c = cascade(&after_a, &FixId::new("C"), ReviewMode::Manual);
        assert_eq!(active_ids(&after_c), vec!["D"]);
    }

    #[test]
    fn test_no_cascade_outside_manual_mode() {
        let input = scenario();
        for mode in [ReviewMode::Unset, ReviewMode::Global] {
            assert_eq!(cascade(&input, &FixId::new("A"), mode), input);
        }
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let input = scenario();
        assert_eq!(
            cascade(&input, &FixId::new("missing"), ReviewMode::Manual),
            input
        );
    }

    #[test]
    fn test_deactivate_leaves_sibling_subtree_alone() {
        let mut input = records(&[("A", 0), ("B", 1), ("B1", 2), ("C", 1), ("C1", 2)]);
        for r in &mut input {
            r.active = true;
        }
        let out = cascade(&input, &FixId::new("C1"), ReviewMode::Manual);
        assert_eq!(active_ids(&out), vec!["B", "B1"]);
    }

    #[test]
    fn test_depth_jumps_use_magnitude_only() {
        let mut input = records(&[("A", 0), ("B", 3), ("C", 1), ("D", 4)]);
        for r in &mut input {
            r.active = true;
        }
        // Backward from D (4): C (1) < 4, then A (0) < 1. B (3) is skipped
        // because it is not below the bound once C lowered it.
        let out = cascade(&input, &FixId::new("D"), ReviewMode::Manual);
        assert_eq!(active_ids(&out), vec!["B"]);
    }

    #[test]
    fn test_toggle_reports_changed_ids() {
        let mut fixes = FixList::new("a.c", scenario());
        let changed = fixes.toggle(&FixId::new("B"), ReviewMode::Manual);
        assert_eq!(changed, vec![FixId::new("B"), FixId::new("C")]);

        let changed = fixes.toggle(&FixId::new("C"), ReviewMode::Manual);
        assert_eq!(changed, vec![FixId::new("C"), FixId::new("B")]);
    }

    #[test]
    fn test_set_is_idempotent_from_stable_state() {
        let mut fixes = FixList::new("a.c", scenario());
        assert!(!fixes.set(0, Direction::Activate, ReviewMode::Manual).is_empty());
        assert!(fixes.set(0, Direction::Activate, ReviewMode::Manual).is_empty());
        assert!(!fixes.set(2, Direction::Deactivate, ReviewMode::Manual).is_empty());
        assert!(fixes.set(2, Direction::Deactivate, ReviewMode::Manual).is_empty());
    }

    // ------------------------------------------------------------------
    // Exhaustive checks over every depth sequence of length <= 5 with
    // depths in 0..=3 and every starting activation pattern.
    // ------------------------------------------------------------------

    fn depth_sequences(max_len: usize, max_depth: usize) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new()];
        let mut frontier = vec![Vec::new()];
        for _ in 0..max_len {
            let mut next = Vec::new();
            for seq in &frontier {
                for d in 0..=max_depth {
                    let mut s: Vec<usize> = seq.clone();
                    s.push(d);
                    next.push(s);
                }
            }
            out.extend(next.iter().cloned());
            frontier = next;
        }
        out
    }

    fn build(depths: &[usize], mask: u32) -> Vec<FixRecord> {
        depths
            .iter()
            .enumerate()
            .map(|(i, d)| {
                FixRecord::new(format!("r{}", i), *d, FixMode::Cast)
                    .with_active(mask & (1 << i) != 0)
            })
            .collect()
    }

    #[test]
    fn test_activation_touches_exactly_the_forward_deeper_run() {
        for depths in depth_sequences(5, 3) {
            for mask in 0..(1u32 << depths.len()) {
                for idx in 0..depths.len() {
                    let before = build(&depths, mask);
                    let mut after = before.clone();
                    apply(&mut after, idx, Direction::Activate);

                    let mut run_open = true;
                    for j in 0..depths.len() {
                        let in_run = if j == idx {
                            true
                        } else if j > idx && run_open && depths[j] > depths[idx] {
                            true
                        } else {
                            if j > idx {
                                run_open = false;
                            }
                            false
                        };
                        if in_run {
                            assert!(after[j].active, "{:?} idx={} j={}", depths, idx, j);
                        } else {
                            assert_eq!(
                                after[j].active, before[j].active,
                                "{:?} idx={} j={}",
                                depths, idx, j
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_deactivation_touches_exactly_the_decreasing_chain() {
        for depths in depth_sequences(5, 3) {
            for mask in 0..(1u32 << depths.len()) {
                for idx in 0..depths.len() {
                    let before = build(&depths, mask);
                    let mut after = before.clone();
                    apply(&mut after, idx, Direction::Deactivate);

                    let mut chain = vec![idx];
                    let mut bound = depths[idx];
                    for j in (0..idx).rev() {
                        if bound == 0 {
                            break;
                        }
                        if depths[j] < bound {
                            chain.push(j);
                            bound = depths[j];
                        }
                    }

                    for j in 0..depths.len() {
                        if chain.contains(&j) {
                            assert!(!after[j].active, "{:?} idx={} j={}", depths, idx, j);
                        } else {
                            assert_eq!(
                                after[j].active, before[j].active,
                                "{:?} idx={} j={}",
                                depths, idx, j
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_repeated_cascade_is_idempotent() {
        for depths in depth_sequences(4, 3) {
            for mask in 0..(1u32 << depths.len()) {
                for idx in 0..depths.len() {
                    for direction in [Direction::Activate, Direction::Deactivate] {
                        let mut records = build(&depths, mask);
                        apply(&mut records, idx, direction);
                        let stable = records.clone();
                        assert!(apply(&mut records, idx, direction).is_empty());
                        assert_eq!(records, stable);
                    }
                }
            }
        }
    }
}
