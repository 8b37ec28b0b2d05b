//! Ping Pong engine crate.
//!
//! Owns the platform + GPU runtime pieces, the scene graph and the mesh
//! renderer. The game binary supplies a `core::Game`.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod time;
pub mod window;

pub mod coords;
pub mod render;
pub mod scene;
