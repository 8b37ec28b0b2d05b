use crate::device::RenderBackend;
use crate::time::FrameTime;

use super::SceneNode;

/// Index of a node inside its [`Scene`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(usize);

/// Ordered collection of nodes.
///
/// Nodes are never removed, so a `NodeId` stays valid for the scene's lifetime.
/// Lifecycle calls visit nodes in registration order.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Initializes every node; returns the total number of failed components.
    pub fn initialize(&mut self, backend: &mut dyn RenderBackend) -> usize {
        self.nodes.iter_mut().map(|n| n.initialize(backend)).sum()
    }

    pub fn update(&mut self, time: &FrameTime) {
        for n in &mut self.nodes {
            n.update(time);
        }
    }

    pub fn fixed_update(&mut self, time: &FrameTime) {
        for n in &mut self.nodes {
            n.fixed_update(time);
        }
    }

    pub fn draw(&mut self, backend: &mut dyn RenderBackend) {
        for n in &mut self.nodes {
            n.draw(backend);
        }
    }

    pub fn reload(&mut self, backend: &mut dyn RenderBackend) -> usize {
        self.nodes.iter_mut().map(|n| n.reload(backend)).sum()
    }

    pub fn destroy_resources(&mut self, backend: &mut dyn RenderBackend) {
        for n in &mut self.nodes {
            n.destroy_resources(backend);
        }
    }
}
