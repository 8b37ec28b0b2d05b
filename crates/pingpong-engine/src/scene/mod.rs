//! Scene graph.
//!
//! - `Scene` owns nodes in registration order
//! - `SceneNode` owns its components and a shared position
//! - `Component` is the lifecycle contract renderers implement

mod component;
mod graph;
mod node;
mod offset;

pub use component::{Component, ComponentError};
pub use graph::{NodeId, Scene};
pub use node::SceneNode;
pub use offset::SharedOffset;
