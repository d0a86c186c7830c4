//! Per-frame membership input and an optional set-diff helper to build it.
//!
//! The core only consumes `FrameBatch`. Hosts whose runtime already reports
//! "added this frame" / "removed this frame" fill it directly; hosts that can
//! only list the currently marked entities use `MembershipTracker`.

use std::hash::Hash;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// Entity sets for one frame. Each set is consumed once and not retained.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameBatch<E> {
    /// Entities that just gained the animatable-on-click marker set.
    #[serde(default = "Vec::new")]
    pub entered: Vec<E>,
    /// Entities that just lost it.
    #[serde(default = "Vec::new")]
    pub exited: Vec<E>,
    /// Entities currently holding it.
    #[serde(default = "Vec::new")]
    pub current: Vec<E>,
    /// Entities that just received an interaction.
    #[serde(default = "Vec::new")]
    pub interacted: Vec<E>,
}

impl<E> Default for FrameBatch<E> {
    fn default() -> Self {
        Self {
            entered: Vec::new(),
            exited: Vec::new(),
            current: Vec::new(),
            interacted: Vec::new(),
        }
    }
}

impl<E> FrameBatch<E> {
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty()
            && self.exited.is_empty()
            && self.current.is_empty()
            && self.interacted.is_empty()
    }
}

impl<E: Copy + Eq + Hash> FrameBatch<E> {
    /// Copy of the batch with repeated entries dropped from every set. First
    /// occurrence order is kept.
    pub fn deduplicated(&self) -> Self {
        Self {
            entered: unique(&self.entered),
            exited: unique(&self.exited),
            current: unique(&self.current),
            interacted: unique(&self.interacted),
        }
    }
}

fn unique<E: Copy + Eq + Hash>(list: &[E]) -> Vec<E> {
    let mut seen = HashSet::with_capacity(list.len());
    list.iter().copied().filter(|e| seen.insert(*e)).collect()
}

/// Diffs the marked set against the previous frame's.
#[derive(Debug)]
pub struct MembershipTracker<E> {
    previous: HashSet<E>,
}

impl<E> Default for MembershipTracker<E> {
    fn default() -> Self {
        Self {
            previous: HashSet::new(),
        }
    }
}

impl<E: Copy + Eq + Hash> MembershipTracker<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build this frame's batch from the currently marked entities and the
    /// entities that just received an interaction. Interactions on entities
    /// that are not currently marked are dropped.
    pub fn diff(
        &mut self,
        current: impl IntoIterator<Item = E>,
        interacted: impl IntoIterator<Item = E>,
    ) -> FrameBatch<E> {
        let mut seen = HashSet::new();
        let mut current_list = Vec::new();
        for e in current {
            if seen.insert(e) {
                current_list.push(e);
            }
        }

        let entered = current_list
            .iter()
            .copied()
            .filter(|e| !self.previous.contains(e))
            .collect();
        let exited = self
            .previous
            .iter()
            .copied()
            .filter(|e| !seen.contains(e))
            .collect();
        let interacted = interacted
            .into_iter()
            .filter(|e| seen.contains(e))
            .collect();

        self.previous = seen;
        FrameBatch {
            entered,
            exited,
            current: current_list,
            interacted,
        }
    }

    /// Entities considered marked as of the last diff.
    pub fn tracked(&self) -> impl Iterator<Item = &E> {
        self.previous.iter()
    }

    pub fn clear(&mut self) {
        self.previous.clear();
    }
}
