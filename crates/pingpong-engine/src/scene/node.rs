use crate::coords::Vec4;
use crate::device::RenderBackend;
use crate::time::FrameTime;

use super::{Component, SharedOffset};

/// A positioned container of components.
///
/// Every lifecycle call is forwarded to the components in insertion order. A
/// failing component is logged and the remaining ones still run.
pub struct SceneNode {
    name: String,
    position: SharedOffset,
    components: Vec<Box<dyn Component>>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self::at(name, Vec4::zero())
    }

    pub fn at(name: impl Into<String>, position: Vec4) -> Self {
        Self {
            name: name.into(),
            position: SharedOffset::new(position),
            components: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec4 {
        self.position.get()
    }

    pub fn set_position(&self, position: Vec4) {
        self.position.set(position);
    }

    pub fn translate(&self, delta: Vec4) {
        self.position.translate(delta);
    }

    /// Handle for components that render at this node's position.
    pub fn offset_handle(&self) -> SharedOffset {
        self.position.clone()
    }

    pub fn add_component(&mut self, component: impl Component + 'static) -> &mut Self {
        self.components.push(Box::new(component));
        self
    }

    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    /// Initializes every component; returns how many failed.
    pub fn initialize(&mut self, backend: &mut dyn RenderBackend) -> usize {
        let mut failed = 0;
        for c in &mut self.components {
            if let Err(err) = c.initialize(backend) {
                log::error!("{}/{}: initialize failed: {err}", self.name, c.name());
                failed += 1;
            }
        }
        failed
    }

    pub fn update(&mut self, time: &FrameTime) {
        for c in &mut self.components {
            c.update(time);
        }
    }

    pub fn fixed_update(&mut self, time: &FrameTime) {
        for c in &mut self.components {
            c.fixed_update(time);
        }
    }

    pub fn draw(&mut self, backend: &mut dyn RenderBackend) {
        for c in &mut self.components {
            c.draw(backend);
        }
    }

    /// Reloads every component; returns how many failed.
    pub fn reload(&mut self, backend: &mut dyn RenderBackend) -> usize {
        let mut failed = 0;
        for c in &mut self.components {
            if let Err(err) = c.reload(backend) {
                log::warn!("{}/{}: reload failed: {err}", self.name, c.name());
                failed += 1;
            }
        }
        failed
    }

    pub fn destroy_resources(&mut self, backend: &mut dyn RenderBackend) {
        for c in &mut self.components {
            c.destroy_resources(backend);
        }
    }
}

impl std::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("position", &self.position.get())
            .field("components", &self.components.len())
            .finish()
    }
}
