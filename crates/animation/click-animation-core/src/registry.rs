//! Player registry: owns one dedicated player per resolved entity.
//!
//! The root a player targets is stored in the same slot as the player, so the
//! entity → root and entity → player mappings are created and dropped together.

use std::hash::Hash;

use hashbrown::HashMap;
use log::{debug, warn};

use crate::ids::{IdAllocator, PlayerId};
use crate::player::ClipPlayer;
use crate::resolve::resolve_context;
use crate::scene::{PlayerHost, SceneGraph};

/// A dedicated player together with the clip root it was bound to.
#[derive(Clone, Debug)]
pub struct PlayerSlot<N> {
    root: N,
    player: ClipPlayer,
}

impl<N: Copy> PlayerSlot<N> {
    /// The clip root. Fixed for the slot's lifetime.
    pub fn root(&self) -> N {
        self.root
    }

    pub fn player(&self) -> &ClipPlayer {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut ClipPlayer {
        &mut self.player
    }
}

/// What `on_enter` did for an entity.
#[derive(Clone, Debug, PartialEq)]
pub enum EnterOutcome<N, H> {
    /// The entity has no scene node this frame.
    NodeMissing { replaced: Option<PlayerId> },
    /// No node on the ancestor chain owns clips.
    Unresolved { replaced: Option<PlayerId> },
    Created {
        player: PlayerId,
        root: N,
        /// Players stopped during creation, in the order they were stopped.
        suppressed: Vec<H>,
        /// Player released because the entity entered again without an exit.
        replaced: Option<PlayerId>,
    },
}

impl<N, H> EnterOutcome<N, H> {
    /// Player released because the entity entered again without an exit,
    /// whatever happened afterwards.
    pub fn replaced(&self) -> Option<PlayerId> {
        match self {
            Self::NodeMissing { replaced }
            | Self::Unresolved { replaced }
            | Self::Created { replaced, .. } => *replaced,
        }
    }
}

/// Registry state owned by one subsystem instance.
#[derive(Debug)]
pub struct PlayerRegistry<E, N> {
    ids: IdAllocator,
    slots: HashMap<E, PlayerSlot<N>>,
    max_ancestor_depth: usize,
    time_scale: f32,
}

impl<E, N> PlayerRegistry<E, N>
where
    E: Copy + Eq + Hash + std::fmt::Debug,
    N: Copy + Eq,
{
    pub fn new(max_ancestor_depth: usize, time_scale: f32) -> Self {
        Self {
            ids: IdAllocator::new(),
            slots: HashMap::new(),
            max_ancestor_depth,
            time_scale,
        }
    }

    /// Resolve the entity's context, create its player, then stop the root's
    /// host-bound player and the chain's foreign player (in that order).
    pub fn on_enter<G, P>(
        &mut self,
        entity: E,
        graph: &G,
        host: &mut P,
    ) -> EnterOutcome<N, G::Handle>
    where
        G: SceneGraph<Entity = E, Node = N>,
        P: PlayerHost<G::Handle>,
    {
        let replaced = self.on_exit(entity).map(|slot| {
            warn!("on_enter: {entity:?} entered again without exit; replacing its player");
            slot.player.id()
        });

        let Some(node) = graph.node_of(entity) else {
            debug!("on_enter: {entity:?} has no scene node; skipping");
            return EnterOutcome::NodeMissing { replaced };
        };
        let Some(ctx) = resolve_context(graph, node, self.max_ancestor_depth) else {
            warn!("on_enter: no clip root above {entity:?}; it will not animate");
            return EnterOutcome::Unresolved { replaced };
        };

        let mut player = ClipPlayer::new(self.ids.alloc_player());
        player.set_time_scale(self.time_scale);
        let id = player.id();
        self.slots.insert(
            entity,
            PlayerSlot {
                root: ctx.root,
                player,
            },
        );

        let mut suppressed = Vec::with_capacity(2);
        if let Some(bound) = graph.host_bound_player_of(ctx.root) {
            host.stop_all_actions(&bound);
            suppressed.push(bound);
        }
        if let Some(foreign) = ctx.foreign_player {
            host.stop_all_actions(&foreign);
            suppressed.push(foreign);
        }
        debug!(
            "on_enter: {entity:?} -> player {id:?}, suppressed {} player(s)",
            suppressed.len()
        );

        EnterOutcome::Created {
            player: id,
            root: ctx.root,
            suppressed,
            replaced,
        }
    }

    /// Stop the entity's player and release it. Returns the released slot.
    pub fn on_exit(&mut self, entity: E) -> Option<PlayerSlot<N>> {
        let mut slot = self.slots.remove(&entity)?;
        slot.player.stop_all_actions();
        debug!("on_exit: released player {:?} for {entity:?}", slot.player.id());
        Some(slot)
    }

    pub fn get(&self, entity: E) -> Option<(N, &ClipPlayer)> {
        self.slots.get(&entity).map(|s| (s.root, &s.player))
    }

    pub fn get_mut(&mut self, entity: E) -> Option<&mut PlayerSlot<N>> {
        self.slots.get_mut(&entity)
    }

    pub fn contains(&self, entity: E) -> bool {
        self.slots.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = E> + '_ {
        self.slots.keys().copied()
    }

    /// Stop and release every player.
    pub fn clear(&mut self) {
        for slot in self.slots.values_mut() {
            slot.player.stop_all_actions();
        }
        self.slots.clear();
    }
}
