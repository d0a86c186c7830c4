//! Host-facing traits: scene-graph access, player suppression and marker attachment.
//!
//! Adapters (Bevy, tests) implement these over whatever scene representation the
//! host keeps. The core never mutates the scene graph; the only side effects it
//! asks of the host are stopping foreign players and attaching markers.

use serde::{Deserialize, Serialize};

use crate::ids::ClipId;

/// One animation clip owned by a scene node. Keyframe data stays with the host;
/// the core only needs identity and length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
}

impl Clip {
    pub fn new(id: ClipId, name: impl Into<String>, duration: f32) -> Self {
        Self {
            id,
            name: name.into(),
            duration,
        }
    }
}

/// Read-only view of the host scene graph.
pub trait SceneGraph {
    type Entity: Copy + Eq + std::hash::Hash;
    type Node: Copy + Eq;
    /// Handle to a player driven by some other system.
    type Handle: Clone;

    fn node_of(&self, entity: Self::Entity) -> Option<Self::Node>;
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node>;
    /// Ordered clip list; empty when the node owns no clips.
    fn clips_of(&self, node: Self::Node) -> &[Clip];
    /// Player attached to the node by an external, independently driven system.
    fn foreign_player_of(&self, node: Self::Node) -> Option<Self::Handle>;
    /// Host-side player already bound to the node as a clip root.
    fn host_bound_player_of(&self, node: Self::Node) -> Option<Self::Handle>;
    fn display_name(&self, node: Self::Node) -> Option<&str>;
}

/// Stops players the core does not own.
pub trait PlayerHost<H> {
    fn stop_all_actions(&mut self, handle: &H);
}

/// Markers the auto-tag scanner attaches to opted-in entities.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Marker {
    AnimationOnClick,
    CursorRaycastable,
    RemoteHoverTarget,
    SingleActionButton,
}

/// The full marker set attached by naming convention.
pub const CLICK_ANIMATION_MARKERS: [Marker; 4] = [
    Marker::AnimationOnClick,
    Marker::CursorRaycastable,
    Marker::RemoteHoverTarget,
    Marker::SingleActionButton,
];

/// Receives marker attachments from the auto-tag scanner.
pub trait MarkerSink<E> {
    fn attach(&mut self, entity: E, markers: &[Marker]);
}
