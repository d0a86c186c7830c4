use bevy::prelude::*;
use click_animation_core::{ClickAnimator, FrameEvent, MembershipTracker};

/// Which external player a suppression request targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlayerHandle {
    Foreign(Entity),
    HostBound(Entity),
}

/// The core animator. Entities double as scene nodes.
#[derive(Resource)]
pub struct ClickAnimationEngine(pub ClickAnimator<Entity, Entity, PlayerHandle>);

/// Entities seen holding the marker set last frame.
#[derive(Resource, Default)]
pub struct MarkedEntities(pub MembershipTracker<Entity>);

/// Stop requests staged by the lifecycle pass and applied right after it
/// (keeps ordering explicit: Compute -> Apply).
#[derive(Resource, Default)]
pub struct PendingSuppressions(pub Vec<PlayerHandle>);

/// Core frame events forwarded into Bevy.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ClickAnimationEvent(pub FrameEvent<Entity, PlayerHandle>);
