//! Layout computation: layer classification and geometric packing.

mod engine;
pub mod layers;
pub mod packer;
mod types;

pub use engine::LayoutEngine;
pub use packer::LayerCursors;
pub use types::{FullLayout, Position, PositionMatrix};
