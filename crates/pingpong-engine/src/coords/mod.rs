//! Small value types shared by the renderer and the scene.
//!
//! Positions live in clip space: x and y in `-1.0..=1.0`, +Y up.

mod color;
mod vec4;
mod viewport;

pub use color::ColorRgba;
pub use vec4::Vec4;
pub use viewport::Viewport;
