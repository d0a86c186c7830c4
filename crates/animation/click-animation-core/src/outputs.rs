//! Output contracts from the per-frame step.
//!
//! Outputs carry the semantic events of one frame. Adapters forward them to
//! their own event channels; nothing in the core reads them back.

use serde::{Deserialize, Serialize};

use crate::ids::{ClipId, PlayerId};

/// Discrete signals emitted while stepping a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FrameEvent<E, H> {
    PlayerCreated {
        entity: E,
        player: PlayerId,
    },
    /// The entity was marked but no ancestor owns clips. Not retried.
    ResolutionFailed {
        entity: E,
    },
    NodeMissing {
        entity: E,
    },
    /// A host-bound or foreign player was stopped while creating `entity`'s player.
    Suppressed {
        entity: E,
        handle: H,
    },
    PlayerReleased {
        entity: E,
        player: PlayerId,
    },
    PlaybackStarted {
        entity: E,
        player: PlayerId,
        clips: usize,
    },
    ActionFinished {
        entity: E,
        player: PlayerId,
        clip: ClipId,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Outputs<E, H> {
    pub events: Vec<FrameEvent<E, H>>,
}

impl<E, H> Default for Outputs<E, H> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E, H> Outputs<E, H> {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push(&mut self, ev: FrameEvent<E, H>) {
        self.events.push(ev);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
