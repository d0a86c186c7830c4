use std::time::Duration;

use bevy::hierarchy::BuildWorldChildren;
use bevy::prelude::*;
use bevy_click_animation::{
    AnimationClips, AnimationOnClick, ClickAnimationEngine, ClickAnimationPlugin,
    CursorRaycastable, ForeignPlayer, HostBoundPlayer, Interacted, RemoteHoverTarget,
    SingleActionButton,
};
use click_animation_core::{ActionState, Clip, ClipId, ClipPlayer, LoopMode, PlayerId};

fn app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>()
        .add_plugins(ClickAnimationPlugin::default());
    app
}

/// Advance the clock by `ms` and run one frame.
fn frame(app: &mut App, ms: u64) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_millis(ms));
    app.update();
}

fn clip1() -> Clip {
    Clip::new(ClipId(1), "clip1", 0.5)
}

/// A player some other system already started.
fn autoplaying(id: u32) -> ClipPlayer {
    let mut p = ClipPlayer::new(PlayerId(1000 + id));
    p.clip_action(&clip1()).play();
    p
}

struct Door {
    wrapper: Entity,
    scene: Entity,
    door: Entity,
}

/// DoorWrapper (foreign player) -> DoorScene (clips, host-bound player) -> Door
fn spawn_door(app: &mut App) -> Door {
    let world = app.world_mut();
    let wrapper = world
        .spawn((Name::new("DoorWrapper"), ForeignPlayer(autoplaying(0))))
        .id();
    let scene = world
        .spawn((
            Name::new("DoorScene"),
            AnimationClips(vec![clip1()]),
            HostBoundPlayer(autoplaying(1)),
        ))
        .id();
    let door = world.spawn(Name::new("Door_interactive_animation")).id();
    world.entity_mut(wrapper).add_child(scene);
    world.entity_mut(scene).add_child(door);
    Door {
        wrapper,
        scene,
        door,
    }
}

#[test]
fn plugin_inserts_engine_resource() {
    let app = app();
    assert!(app.world().get_resource::<ClickAnimationEngine>().is_some());
}

#[test]
fn naming_convention_tags_only_matching_nodes() {
    let mut app = app();
    let d = spawn_door(&mut app);
    let plain = app.world_mut().spawn(Name::new("Door")).id();
    frame(&mut app, 16);

    let world = app.world();
    assert!(world.get::<AnimationOnClick>(d.door).is_some());
    assert!(world.get::<CursorRaycastable>(d.door).is_some());
    assert!(world.get::<RemoteHoverTarget>(d.door).is_some());
    assert!(world.get::<SingleActionButton>(d.door).is_some());

    assert!(world.get::<AnimationOnClick>(plain).is_none());
    assert!(world.get::<SingleActionButton>(plain).is_none());
    assert!(world.get::<AnimationOnClick>(d.scene).is_none());
}

#[test]
fn enter_binds_root_and_stops_existing_players() {
    let mut app = app();
    let d = spawn_door(&mut app);
    frame(&mut app, 16);
    frame(&mut app, 16);

    let world = app.world();
    let engine = world.resource::<ClickAnimationEngine>();
    let (root, _) = engine.0.registry().get(d.door).expect("dedicated player");
    assert_eq!(root, d.scene);

    let foreign = world.get::<ForeignPlayer>(d.wrapper).unwrap();
    let bound = world.get::<HostBoundPlayer>(d.scene).unwrap();
    assert_eq!(foreign.0.running_actions(), 0);
    assert_eq!(bound.0.running_actions(), 0);
}

#[test]
fn click_plays_advance_and_exit_releases() {
    let mut app = app();
    let d = spawn_door(&mut app);
    frame(&mut app, 16);
    frame(&mut app, 16);

    app.world_mut().entity_mut(d.door).insert(Interacted);
    frame(&mut app, 16);
    {
        let engine = app.world().resource::<ClickAnimationEngine>();
        let (_, player) = engine.0.registry().get(d.door).unwrap();
        let action = player.action(ClipId(1)).expect("clip1 action");
        assert_eq!(action.state(), ActionState::Running);
        assert_eq!(action.loop_mode(), LoopMode::Once);
        assert!(!action.clamp_when_finished());
    }

    frame(&mut app, 16);
    {
        let engine = app.world().resource::<ClickAnimationEngine>();
        let (_, player) = engine.0.registry().get(d.door).unwrap();
        let t = player.action(ClipId(1)).unwrap().time();
        assert!((t - 0.016).abs() < 1e-5, "advanced by one frame, got {t}");
    }

    app.world_mut()
        .entity_mut(d.door)
        .remove::<AnimationOnClick>();
    frame(&mut app, 16);
    let engine = app.world().resource::<ClickAnimationEngine>();
    assert!(engine.0.registry().get(d.door).is_none());
    assert!(engine.0.registry().is_empty());
}

#[test]
fn despawned_entity_releases_its_player() {
    let mut app = app();
    let d = spawn_door(&mut app);
    frame(&mut app, 16);
    frame(&mut app, 16);
    assert_eq!(
        app.world().resource::<ClickAnimationEngine>().0.registry().len(),
        1
    );

    app.world_mut().despawn(d.door);
    frame(&mut app, 16);
    assert!(app
        .world()
        .resource::<ClickAnimationEngine>()
        .0
        .registry()
        .is_empty());
}

#[test]
fn idle_frame_clears_previous_events() {
    let mut app = app();
    let d = spawn_door(&mut app);
    frame(&mut app, 16);
    frame(&mut app, 16);

    app.world_mut().despawn(d.door);
    frame(&mut app, 16);
    assert!(!app
        .world()
        .resource::<ClickAnimationEngine>()
        .0
        .outputs()
        .is_empty());

    frame(&mut app, 16);
    assert!(app
        .world()
        .resource::<ClickAnimationEngine>()
        .0
        .outputs()
        .is_empty());
}

#[test]
fn tagged_node_without_clips_stays_unresolved() {
    let mut app = app();
    let lid = app
        .world_mut()
        .spawn(Name::new("Lid_interactive_animation"))
        .id();
    frame(&mut app, 16);
    frame(&mut app, 16);

    assert!(app.world().get::<AnimationOnClick>(lid).is_some());
    assert!(app
        .world()
        .resource::<ClickAnimationEngine>()
        .0
        .registry()
        .is_empty());
}
