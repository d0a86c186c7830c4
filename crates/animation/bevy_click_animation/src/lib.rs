//! Bevy adapter for `click-animation-core`.
//!
//! Entities in the Bevy hierarchy are the scene nodes: clips live in
//! [`AnimationClips`], externally driven players in [`ForeignPlayer`] and
//! [`HostBoundPlayer`]. Naming a node `*_interactive_animation` (or inserting
//! the markers by hand) is enough to make it play its clips on click.

pub mod components;
pub mod resources;
pub mod systems;

use bevy::log::warn;
use bevy::prelude::*;
use click_animation_core::{ClickAnimator, Config};

pub use components::{
    AnimationClips, AnimationOnClick, CursorRaycastable, ForeignPlayer, HostBoundPlayer,
    Interacted, RemoteHoverTarget, SingleActionButton,
};
pub use resources::{
    ClickAnimationEngine, ClickAnimationEvent, MarkedEntities, PendingSuppressions, PlayerHandle,
};

/// Systems of the plugin, in the order they run.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClickAnimationSet {
    AutoTag,
    Step,
    Suppress,
}

#[derive(Default)]
pub struct ClickAnimationPlugin {
    pub config: Config,
}

impl Plugin for ClickAnimationPlugin {
    fn build(&self, app: &mut App) {
        let config = match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(err) => {
                warn!("invalid click-animation config ({err}); using defaults");
                Config::default()
            }
        };

        app.insert_resource(ClickAnimationEngine(ClickAnimator::new(config)))
            .init_resource::<MarkedEntities>()
            .init_resource::<PendingSuppressions>()
            .add_event::<ClickAnimationEvent>()
            .configure_sets(
                Update,
                (
                    ClickAnimationSet::AutoTag,
                    ClickAnimationSet::Step,
                    ClickAnimationSet::Suppress,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    systems::auto_tag_system.in_set(ClickAnimationSet::AutoTag),
                    systems::click_animation_system.in_set(ClickAnimationSet::Step),
                    systems::apply_suppressions_system.in_set(ClickAnimationSet::Suppress),
                ),
            )
            .add_systems(Last, systems::shutdown_on_exit_system);
    }
}
