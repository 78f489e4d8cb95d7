//! Rendering module
//!
//! Games build a [`Frame`] display list; [`RenderState`] replays it on wgpu.

pub mod canvas;
pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use canvas::Canvas;
pub use frame::{DrawCommand, Frame};
pub use pipeline::RenderState;
pub use vertex::{TexVertex, Vertex, colors, darken, rgb, shade, with_alpha};
