//! Identifiers and the player id allocator.

use serde::{Deserialize, Serialize};

/// Identifies a clip within the host's clip library. Assigned by the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(pub u32);

/// Identifies a dedicated player created by the registry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Monotonic allocator for PlayerId.
/// Ids are never reused within one allocator, so a re-created player is
/// distinguishable from the one it replaced.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_player: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_player(&mut self) -> PlayerId {
        let id = PlayerId(self.next_player);
        self.next_player = self.next_player.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_player(), PlayerId(0));
        assert_eq!(alloc.alloc_player(), PlayerId(1));
        assert_eq!(alloc.alloc_player(), PlayerId(2));
    }
}
