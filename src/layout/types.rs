use serde::Serialize;
use std::collections::HashMap;

/// Diagram-space coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };
}

/// Table id -> assigned position.
pub type PositionMatrix = HashMap<String, Position>;

/// Result of the whole-schema one-shot layout.
#[derive(Debug, Clone, Default)]
pub struct FullLayout {
    pub positions: PositionMatrix,
    /// The root the layering was grown from, if the schema was non-empty.
    pub center_id: Option<String>,
}
