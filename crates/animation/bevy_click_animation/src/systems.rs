use bevy::ecs::query::Has;
use bevy::log::debug;
use bevy::prelude::*;

use crate::components::{
    AnimationClips, AnimationOnClick, CursorRaycastable, ForeignPlayer, HostBoundPlayer,
    Interacted, RemoteHoverTarget, SingleActionButton,
};
use crate::resources::{
    ClickAnimationEngine, ClickAnimationEvent, MarkedEntities, PendingSuppressions, PlayerHandle,
};
use click_animation_core::{Clip, Marker, MarkerSink, PlayerHost, SceneGraph};

/// Per-node data the scene-graph adapter reads.
pub type NodeData = (
    Option<&'static Parent>,
    Option<&'static AnimationClips>,
    Option<&'static Name>,
    Has<ForeignPlayer>,
    Has<HostBoundPlayer>,
);

/// Exposes the Bevy hierarchy to the core. Every live entity is its own node.
pub struct BevySceneGraph<'a, 'w, 's> {
    nodes: &'a Query<'w, 's, NodeData>,
}

impl<'a, 'w, 's> BevySceneGraph<'a, 'w, 's> {
    pub fn new(nodes: &'a Query<'w, 's, NodeData>) -> Self {
        Self { nodes }
    }
}

impl SceneGraph for BevySceneGraph<'_, '_, '_> {
    type Entity = Entity;
    type Node = Entity;
    type Handle = PlayerHandle;

    fn node_of(&self, entity: Entity) -> Option<Entity> {
        self.nodes.contains(entity).then_some(entity)
    }

    fn parent_of(&self, node: Entity) -> Option<Entity> {
        let (parent, ..) = self.nodes.get(node).ok()?;
        parent.map(Parent::get)
    }

    fn clips_of(&self, node: Entity) -> &[Clip] {
        match self.nodes.get(node) {
            Ok((_, Some(clips), ..)) => clips.0.as_slice(),
            _ => &[],
        }
    }

    fn foreign_player_of(&self, node: Entity) -> Option<PlayerHandle> {
        let (_, _, _, foreign, _) = self.nodes.get(node).ok()?;
        foreign.then_some(PlayerHandle::Foreign(node))
    }

    fn host_bound_player_of(&self, node: Entity) -> Option<PlayerHandle> {
        let (_, _, _, _, bound) = self.nodes.get(node).ok()?;
        bound.then_some(PlayerHandle::HostBound(node))
    }

    fn display_name(&self, node: Entity) -> Option<&str> {
        let (_, _, name, ..) = self.nodes.get(node).ok()?;
        name.map(Name::as_str)
    }
}

/// Queues stop requests for `apply_suppressions_system`.
struct StopQueue<'a>(&'a mut Vec<PlayerHandle>);

impl PlayerHost<PlayerHandle> for StopQueue<'_> {
    fn stop_all_actions(&mut self, handle: &PlayerHandle) {
        self.0.push(*handle);
    }
}

/// Inserts marker components through `Commands`.
struct CommandSink<'a, 'w, 's>(&'a mut Commands<'w, 's>);

impl MarkerSink<Entity> for CommandSink<'_, '_, '_> {
    fn attach(&mut self, entity: Entity, markers: &[Marker]) {
        let mut e = self.0.entity(entity);
        for marker in markers {
            match marker {
                Marker::AnimationOnClick => e.insert(AnimationOnClick),
                Marker::CursorRaycastable => e.insert(CursorRaycastable),
                Marker::RemoteHoverTarget => e.insert(RemoteHoverTarget),
                Marker::SingleActionButton => e.insert(SingleActionButton),
            };
        }
    }
}

/// Tags newly named nodes whose name carries the configured substring.
pub fn auto_tag_system(
    mut commands: Commands,
    engine: Res<ClickAnimationEngine>,
    new_nodes: Query<Entity, Added<Name>>,
    nodes: Query<NodeData>,
) {
    let graph = BevySceneGraph::new(&nodes);
    let mut sink = CommandSink(&mut commands);
    engine.0.scan_new_nodes(new_nodes.iter(), &graph, &mut sink);
}

/// Diffs the marked set, steps the core (enter, exit, update, interaction),
/// and forwards its events.
#[allow(clippy::too_many_arguments)]
pub fn click_animation_system(
    mut engine: ResMut<ClickAnimationEngine>,
    mut marked: ResMut<MarkedEntities>,
    mut pending: ResMut<PendingSuppressions>,
    time: Res<Time>,
    current: Query<Entity, (With<AnimationOnClick>, With<SingleActionButton>)>,
    clicked: Query<
        Entity,
        (
            With<AnimationOnClick>,
            With<SingleActionButton>,
            Added<Interacted>,
        ),
    >,
    nodes: Query<NodeData>,
    mut events: EventWriter<ClickAnimationEvent>,
) {
    let batch = marked.0.diff(current.iter(), clicked.iter());
    if batch.is_empty() {
        engine.0.clear_outputs();
        return;
    }
    let graph = BevySceneGraph::new(&nodes);
    let mut host = StopQueue(&mut pending.0);
    let delta_ms = time.delta_seconds() * 1000.0;

    let out = engine.0.step(&batch, &graph, &mut host, delta_ms);
    for ev in out.events.iter().cloned() {
        events.send(ClickAnimationEvent(ev));
    }
}

/// Stops the foreign and host-bound players queued during this frame.
pub fn apply_suppressions_system(
    mut pending: ResMut<PendingSuppressions>,
    mut foreign: Query<&mut ForeignPlayer>,
    mut bound: Query<&mut HostBoundPlayer>,
) {
    for handle in pending.0.drain(..) {
        match handle {
            PlayerHandle::Foreign(e) => {
                if let Ok(mut p) = foreign.get_mut(e) {
                    p.0.stop_all_actions();
                }
            }
            PlayerHandle::HostBound(e) => {
                if let Ok(mut p) = bound.get_mut(e) {
                    p.0.stop_all_actions();
                }
            }
        }
        debug!("suppressed {handle:?}");
    }
}

/// Releases every dedicated player when the app is exiting.
pub fn shutdown_on_exit_system(
    mut exits: EventReader<AppExit>,
    mut engine: ResMut<ClickAnimationEngine>,
) {
    if exits.read().next().is_some() {
        engine.0.shutdown();
    }
}
