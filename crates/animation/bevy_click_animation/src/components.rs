use bevy::prelude::*;
use click_animation_core::{Clip, ClipPlayer};

/// Marks an entity whose clips play when it is clicked.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct AnimationOnClick;

/// The entity can be hit by the cursor raycast.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct CursorRaycastable;

/// Remote users' cursors can hover the entity.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct RemoteHoverTarget;

/// The entity reacts to a single click rather than a held grab.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct SingleActionButton;

/// Inserted by the interaction layer on the frame an entity is clicked.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Interacted;

/// Ordered clip list owned by a scene node.
#[derive(Component, Debug, Default, Clone)]
pub struct AnimationClips(pub Vec<Clip>);

/// Player attached to a node by an external, independently driven system.
#[derive(Component, Debug, Clone)]
pub struct ForeignPlayer(pub ClipPlayer);

/// Host-side player bound to a clip root.
#[derive(Component, Debug, Clone)]
pub struct HostBoundPlayer(pub ClipPlayer);
