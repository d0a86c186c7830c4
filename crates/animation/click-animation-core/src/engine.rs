//! ClickAnimator: subsystem state and the per-frame step.
//!
//! Methods:
//! - scan_new_nodes (auto-tag), enter, exit, advance (frame driver),
//!   trigger (playback on interaction), step (all of the above in frame order)

use std::hash::Hash;

use hashbrown::HashSet;
use log::debug;

use crate::autotag::AutoTagger;
use crate::config::Config;
use crate::membership::FrameBatch;
use crate::outputs::{FrameEvent, Outputs};
use crate::registry::{EnterOutcome, PlayerRegistry, PlayerSlot};
use crate::scene::{MarkerSink, PlayerHost, SceneGraph};

/// Owns the registry for one scene. Created at subsystem init; `shutdown`
/// releases every player.
#[derive(Debug)]
pub struct ClickAnimator<E, N, H> {
    cfg: Config,
    tagger: AutoTagger,
    registry: PlayerRegistry<E, N>,
    outputs: Outputs<E, H>,
}

impl<E, N, H> ClickAnimator<E, N, H>
where
    E: Copy + Eq + Hash + std::fmt::Debug,
    N: Copy + Eq,
    H: Clone,
{
    /// Create a new animator with the given config.
    pub fn new(cfg: Config) -> Self {
        Self {
            tagger: AutoTagger::new(cfg.name_tag.clone()),
            registry: PlayerRegistry::new(cfg.max_ancestor_depth, cfg.playback.time_scale),
            cfg,
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn registry(&self) -> &PlayerRegistry<E, N> {
        &self.registry
    }

    /// Events recorded since the last `step` (or `clear_outputs`).
    pub fn outputs(&self) -> &Outputs<E, H> {
        &self.outputs
    }

    pub fn clear_outputs(&mut self) {
        self.outputs.clear();
    }

    /// Auto-tag newly appeared entities by node name.
    pub fn scan_new_nodes<G, S>(
        &self,
        new_entities: impl IntoIterator<Item = E>,
        graph: &G,
        sink: &mut S,
    ) -> usize
    where
        G: SceneGraph<Entity = E, Node = N, Handle = H>,
        S: MarkerSink<E>,
    {
        self.tagger.scan(new_entities, graph, sink)
    }

    pub fn enter<G, P>(&mut self, entity: E, graph: &G, host: &mut P)
    where
        G: SceneGraph<Entity = E, Node = N, Handle = H>,
        P: PlayerHost<H>,
    {
        let outcome = self.registry.on_enter(entity, graph, host);
        if let Some(old) = outcome.replaced() {
            self.outputs.push(FrameEvent::PlayerReleased {
                entity,
                player: old,
            });
        }
        match outcome {
            EnterOutcome::NodeMissing { .. } => {
                self.outputs.push(FrameEvent::NodeMissing { entity })
            }
            EnterOutcome::Unresolved { .. } => {
                self.outputs.push(FrameEvent::ResolutionFailed { entity })
            }
            EnterOutcome::Created {
                player, suppressed, ..
            } => {
                self.outputs
                    .push(FrameEvent::PlayerCreated { entity, player });
                for handle in suppressed {
                    self.outputs.push(FrameEvent::Suppressed { entity, handle });
                }
            }
        }
    }

    pub fn exit(&mut self, entity: E) -> Option<PlayerSlot<N>> {
        let slot = self.registry.on_exit(entity)?;
        self.outputs.push(FrameEvent::PlayerReleased {
            entity,
            player: slot.player().id(),
        });
        Some(slot)
    }

    /// Advance the players of `current` entities by `delta_ms` milliseconds.
    /// Entities without a player are skipped; an entity listed twice is
    /// still advanced once.
    pub fn advance(&mut self, current: &[E], delta_ms: f32) {
        let dt = delta_ms / 1000.0;
        let mut seen = HashSet::with_capacity(current.len());
        for &entity in current {
            if !seen.insert(entity) {
                continue;
            }
            let Some(slot) = self.registry.get_mut(entity) else {
                continue;
            };
            let player = slot.player().id();
            for clip in slot.player_mut().update(dt) {
                self.outputs.push(FrameEvent::ActionFinished {
                    entity,
                    player,
                    clip,
                });
            }
        }
    }

    /// Stop the entity's player, then restart every clip on its root, once
    /// each, concurrently. Returns false when the entity has no player or its
    /// root has no clips left to play.
    pub fn trigger<G>(&mut self, entity: E, graph: &G) -> bool
    where
        G: SceneGraph<Entity = E, Node = N, Handle = H>,
    {
        let Some(slot) = self.registry.get_mut(entity) else {
            debug!("trigger: {entity:?} has no player; ignoring interaction");
            return false;
        };
        let clips = graph.clips_of(slot.root());
        let player = slot.player_mut();
        player.stop_all_actions();
        if clips.is_empty() {
            debug!("trigger: root of {entity:?} no longer has clips; nothing to play");
            return false;
        }

        let playback = &self.cfg.playback;
        for clip in clips {
            player
                .clip_action(clip)
                .reset()
                .set_loop(playback.loop_mode, playback.repetitions)
                .set_clamp_when_finished(playback.clamp_when_finished)
                .play();
        }
        self.outputs.push(FrameEvent::PlaybackStarted {
            entity,
            player: player.id(),
            clips: clips.len(),
        });
        true
    }

    /// Run one frame: enter, exit, update, interaction.
    pub fn step<G, P>(
        &mut self,
        batch: &FrameBatch<E>,
        graph: &G,
        host: &mut P,
        delta_ms: f32,
    ) -> &Outputs<E, H>
    where
        G: SceneGraph<Entity = E, Node = N, Handle = H>,
        P: PlayerHost<H>,
    {
        self.outputs.clear();
        let batch = batch.deduplicated();

        for &entity in &batch.entered {
            self.enter(entity, graph, host);
        }
        for &entity in &batch.exited {
            self.exit(entity);
        }
        self.advance(&batch.current, delta_ms);
        for &entity in &batch.interacted {
            self.trigger(entity, graph);
        }

        &self.outputs
    }

    /// Stop and release every player.
    pub fn shutdown(&mut self) {
        let released: Vec<E> = self.registry.entities().collect();
        for entity in released {
            self.exit(entity);
        }
        self.registry.clear();
    }
}
