//! Diagram assembly: visible tables and their positions become the node and
//! edge lists consumed by the canvas renderer.

use crate::layout::{Position, PositionMatrix};
use crate::schema::{ForeignKeyDescriptor, TableDescriptor};
use serde::Serialize;
use std::collections::HashSet;

pub const NODE_TYPE: &str = "value";
pub const EDGE_TYPE: &str = "custom";
/// Gap `normalize` leaves between the viewport origin and the layout.
pub const VIEWPORT_PADDING: f64 = 200.0;

#[derive(Debug, Clone, Serialize)]
pub struct DiagramNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    pub data: TableDescriptor,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagramEdge {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "sourceHandle")]
    pub source_handle: String,
    #[serde(rename = "targetHandle")]
    pub target_handle: String,
    pub updatable: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

/// Deterministic edge identity derived from the owning table, the referenced
/// table, and the owning column; stable across expand/collapse cycles.
pub fn build_edge_id(owner: &TableDescriptor, fk: &ForeignKeyDescriptor) -> String {
    format!(
        "{}.{}-{}.{}.{}",
        owner.schema, owner.table, fk.reference_schema, fk.reference_table, fk.column
    )
}

/// One node per table, carrying the full descriptor for the renderer. A
/// table with no recorded position falls back to the origin.
pub fn create_nodes(tables: &[&TableDescriptor], positions: &PositionMatrix) -> Vec<DiagramNode> {
    tables
        .iter()
        .map(|table| {
            let id = table.table_id();
            let position = positions.get(&id).copied().unwrap_or(Position::ORIGIN);
            DiagramNode {
                id,
                kind: NODE_TYPE.to_string(),
                position,
                data: (*table).clone(),
            }
        })
        .collect()
}

/// One edge per foreign key of the given tables; the source handle is the
/// owning column, the target handle the referenced column.
pub fn create_edges(tables: &[&TableDescriptor]) -> Vec<DiagramEdge> {
    tables
        .iter()
        .flat_map(|table| {
            table.foreign_keys.iter().map(move |fk| DiagramEdge {
                id: build_edge_id(table, fk),
                kind: EDGE_TYPE.to_string(),
                source: table.table_id(),
                target: fk.reference_id(),
                source_handle: fk.column.clone(),
                target_handle: fk.reference_column.clone(),
                updatable: false,
            })
        })
        .collect()
}

/// Assemble the renderer payload: nodes for every given table, edges
/// restricted to constraints with both endpoints present.
pub fn assemble(tables: &[&TableDescriptor], positions: &PositionMatrix) -> Diagram {
    let present: HashSet<String> = tables.iter().map(|t| t.table_id()).collect();
    let nodes = create_nodes(tables, positions);
    let edges = create_edges(tables)
        .into_iter()
        .filter(|e| present.contains(&e.source) && present.contains(&e.target))
        .collect();
    Diagram { nodes, edges }
}

/// Shift every node so the layout's bounding box starts at
/// `(padding, padding)`.
pub fn normalize(diagram: &mut Diagram, padding: f64) {
    if diagram.nodes.is_empty() {
        return;
    }

    let min_x = diagram
        .nodes
        .iter()
        .map(|n| n.position.x)
        .fold(f64::INFINITY, f64::min);
    let min_y = diagram
        .nodes
        .iter()
        .map(|n| n.position.y)
        .fold(f64::INFINITY, f64::min);

    for node in &mut diagram.nodes {
        node.position.x += padding - min_x;
        node.position.y += padding - min_y;
    }
}
