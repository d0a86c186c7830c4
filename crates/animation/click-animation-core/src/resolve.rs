//! Animation-context resolution over the scene ancestry.
//!
//! Clip ownership and externally driven playback frequently live at different
//! levels: an imported model's clips sit on its scene root while the component
//! driving them sits on a wrapper one level higher. The walk therefore tracks
//! both independently.

use log::warn;

use crate::scene::SceneGraph;

/// Result of a successful resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationContext<N, H> {
    /// Nearest node (inclusive) owning a non-empty clip list.
    pub root: N,
    /// Nearest node (inclusive) carrying a foreign player.
    pub foreign_player: Option<H>,
}

/// Walk from `start` through its ancestors and locate the clip root and the
/// nearest foreign player. Returns `None` when no node on the chain owns clips.
///
/// At most `max_depth` nodes are visited, `start` included.
pub fn resolve_context<G: SceneGraph>(
    graph: &G,
    start: G::Node,
    max_depth: usize,
) -> Option<AnimationContext<G::Node, G::Handle>> {
    let mut root: Option<G::Node> = None;
    let mut foreign: Option<G::Handle> = None;
    let mut current = Some(start);
    let mut visited = 0usize;

    while let Some(node) = current {
        if visited == max_depth {
            warn!("resolve_context: ancestor walk exceeded {max_depth} nodes; stopping early");
            break;
        }
        visited += 1;

        if root.is_none() && !graph.clips_of(node).is_empty() {
            root = Some(node);
        }
        if foreign.is_none() {
            foreign = graph.foreign_player_of(node);
        }
        if root.is_some() && foreign.is_some() {
            break;
        }
        current = graph.parent_of(node);
    }

    root.map(|root| AnimationContext {
        root,
        foreign_player: foreign,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ClipId;
    use crate::scene::Clip;

    /// Linear chain: index 0 is the leaf, parent of i is i + 1.
    struct Chain {
        clips: Vec<Vec<Clip>>,
        foreign: Vec<Option<&'static str>>,
        cyclic: bool,
    }

    impl SceneGraph for Chain {
        type Entity = usize;
        type Node = usize;
        type Handle = &'static str;

        fn node_of(&self, entity: usize) -> Option<usize> {
            (entity < self.clips.len()).then_some(entity)
        }
        fn parent_of(&self, node: usize) -> Option<usize> {
            if node + 1 < self.clips.len() {
                Some(node + 1)
            } else if self.cyclic {
                Some(0)
            } else {
                None
            }
        }
        fn clips_of(&self, node: usize) -> &[Clip] {
            &self.clips[node]
        }
        fn foreign_player_of(&self, node: usize) -> Option<&'static str> {
            self.foreign[node]
        }
        fn host_bound_player_of(&self, _node: usize) -> Option<&'static str> {
            None
        }
        fn display_name(&self, _node: usize) -> Option<&str> {
            None
        }
    }

    fn clip(id: u32) -> Vec<Clip> {
        vec![Clip::new(ClipId(id), format!("clip{id}"), 1.0)]
    }

    #[test]
    fn start_node_counts_as_ancestor() {
        let g = Chain {
            clips: vec![clip(1)],
            foreign: vec![Some("self")],
            cyclic: false,
        };
        let ctx = resolve_context(&g, 0, 16).unwrap();
        assert_eq!(ctx.root, 0);
        assert_eq!(ctx.foreign_player, Some("self"));
    }

    #[test]
    fn foreign_found_below_root_is_kept() {
        // Foreign player on the leaf, clips two levels up.
        let g = Chain {
            clips: vec![vec![], vec![], clip(1)],
            foreign: vec![Some("leaf"), None, Some("top")],
            cyclic: false,
        };
        let ctx = resolve_context(&g, 0, 16).unwrap();
        assert_eq!(ctx.root, 2);
        assert_eq!(ctx.foreign_player, Some("leaf"));
    }

    #[test]
    fn cyclic_chain_terminates_at_depth_bound() {
        let g = Chain {
            clips: vec![vec![], clip(1)],
            foreign: vec![None, None],
            cyclic: true,
        };
        // Root is found, foreign never is; the bound stops the loop.
        let ctx = resolve_context(&g, 0, 8).unwrap();
        assert_eq!(ctx.root, 1);
        assert_eq!(ctx.foreign_player, None);
    }

    #[test]
    fn depth_bound_can_hide_a_far_root() {
        let g = Chain {
            clips: vec![vec![], vec![], clip(1)],
            foreign: vec![None, None, None],
            cyclic: false,
        };
        assert!(resolve_context(&g, 0, 2).is_none());
        assert!(resolve_context(&g, 0, 3).is_some());
    }
}
