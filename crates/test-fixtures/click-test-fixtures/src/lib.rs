//! Shared test fixtures: an in-memory scene graph, recording hosts, and JSON
//! scene descriptions listed in `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use click_animation_core::{Clip, Marker, MarkerSink, PlayerHost, SceneGraph};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    scenes: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Node index inside a [`FixtureScene`].
pub type NodeId = usize;
/// Entity ids are plain integers in fixtures.
pub type EntityId = u32;

/// Which kind of external player a handle refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FixtureHandle {
    Foreign(NodeId),
    HostBound(NodeId),
}

#[derive(Clone, Debug, Default)]
struct FixtureNode {
    name: Option<String>,
    parent: Option<NodeId>,
    clips: Vec<Clip>,
    foreign_player: bool,
    host_bound_player: bool,
}

/// In-memory scene graph for tests.
#[derive(Clone, Debug, Default)]
pub struct FixtureScene {
    nodes: Vec<Option<FixtureNode>>,
    bindings: hashbrown::HashMap<EntityId, NodeId>,
}

impl FixtureScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        self.nodes.push(Some(FixtureNode {
            name: Some(name.to_string()),
            parent,
            ..FixtureNode::default()
        }));
        self.nodes.len() - 1
    }

    fn node_mut(&mut self, node: NodeId) -> &mut FixtureNode {
        self.nodes[node]
            .as_mut()
            .expect("fixture node was removed")
    }

    pub fn set_clips(&mut self, node: NodeId, clips: Vec<Clip>) -> &mut Self {
        self.node_mut(node).clips = clips;
        self
    }

    pub fn set_foreign_player(&mut self, node: NodeId) -> &mut Self {
        self.node_mut(node).foreign_player = true;
        self
    }

    pub fn set_host_bound_player(&mut self, node: NodeId) -> &mut Self {
        self.node_mut(node).host_bound_player = true;
        self
    }

    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> &mut Self {
        self.node_mut(node).parent = parent;
        self
    }

    pub fn bind(&mut self, entity: EntityId, node: NodeId) -> &mut Self {
        self.bindings.insert(entity, node);
        self
    }

    /// Destroy a node out of band. Bindings to it stop resolving.
    pub fn remove_node(&mut self, node: NodeId) {
        self.nodes[node] = None;
    }

    fn get(&self, node: NodeId) -> Option<&FixtureNode> {
        self.nodes.get(node).and_then(Option::as_ref)
    }

    /// Build a scene from its JSON description.
    pub fn from_spec(spec: &SceneSpec) -> Result<Self> {
        let mut scene = FixtureScene::new();
        let mut ids: HashMap<&str, NodeId> = HashMap::new();
        for node in &spec.nodes {
            if ids.contains_key(node.name.as_str()) {
                bail!("duplicate fixture node '{}'", node.name);
            }
            let id = scene.add_node(&node.name, None);
            ids.insert(node.name.as_str(), id);
        }
        for node in &spec.nodes {
            let id = ids[node.name.as_str()];
            if let Some(parent) = &node.parent {
                let pid = *ids
                    .get(parent.as_str())
                    .ok_or_else(|| anyhow!("node '{}' has unknown parent '{parent}'", node.name))?;
                scene.set_parent(id, Some(pid));
            }
            scene.set_clips(id, node.clips.clone());
            if node.foreign_player {
                scene.set_foreign_player(id);
            }
            if node.host_bound_player {
                scene.set_host_bound_player(id);
            }
            if let Some(entity) = node.entity {
                scene.bind(entity, id);
            }
        }
        Ok(scene)
    }

    /// Node id for a node name from the JSON description.
    pub fn node_named(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.as_ref().and_then(|n| n.name.as_deref()) == Some(name))
    }
}

impl SceneGraph for FixtureScene {
    type Entity = EntityId;
    type Node = NodeId;
    type Handle = FixtureHandle;

    fn node_of(&self, entity: EntityId) -> Option<NodeId> {
        let node = *self.bindings.get(&entity)?;
        self.get(node).map(|_| node)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent.filter(|p| self.get(*p).is_some())
    }

    fn clips_of(&self, node: NodeId) -> &[Clip] {
        self.get(node).map(|n| n.clips.as_slice()).unwrap_or(&[])
    }

    fn foreign_player_of(&self, node: NodeId) -> Option<FixtureHandle> {
        self.get(node)?
            .foreign_player
            .then_some(FixtureHandle::Foreign(node))
    }

    fn host_bound_player_of(&self, node: NodeId) -> Option<FixtureHandle> {
        self.get(node)?
            .host_bound_player
            .then_some(FixtureHandle::HostBound(node))
    }

    fn display_name(&self, node: NodeId) -> Option<&str> {
        self.get(node)?.name.as_deref()
    }
}

/// Records every stop request in order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub stops: Vec<FixtureHandle>,
}

impl RecordingHost {
    pub fn count(&self, handle: FixtureHandle) -> usize {
        self.stops.iter().filter(|h| **h == handle).count()
    }
}

impl PlayerHost<FixtureHandle> for RecordingHost {
    fn stop_all_actions(&mut self, handle: &FixtureHandle) {
        self.stops.push(*handle);
    }
}

/// Records marker attachments.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub attached: Vec<(EntityId, Vec<Marker>)>,
}

impl RecordingSink {
    pub fn markers_of(&self, entity: EntityId) -> Vec<Marker> {
        self.attached
            .iter()
            .filter(|(e, _)| *e == entity)
            .flat_map(|(_, m)| m.iter().copied())
            .collect()
    }
}

impl MarkerSink<EntityId> for RecordingSink {
    fn attach(&mut self, entity: EntityId, markers: &[Marker]) {
        self.attached.push((entity, markers.to_vec()));
    }
}

/// JSON description of a scene fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneSpec {
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub clips: Vec<Clip>,
    #[serde(default)]
    pub foreign_player: bool,
    #[serde(default)]
    pub host_bound_player: bool,
    #[serde(default)]
    pub entity: Option<EntityId>,
}

pub mod scenes {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.scenes.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.scenes, "scene", name)?;
        read_to_string(rel)
    }

    pub fn spec(name: &str) -> Result<SceneSpec> {
        let rel = lookup(&MANIFEST.scenes, "scene", name)?;
        super::load_json(rel)
    }

    pub fn load(name: &str) -> Result<FixtureScene> {
        FixtureScene::from_spec(&spec(name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.scenes, "scene", name)?;
        Ok(resolve_path(rel))
    }
}
