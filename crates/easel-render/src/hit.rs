//! Hit testing: point → node lookup.
//!
//! Nodes draw in insertion order, so the last-inserted node is visually on
//! top and must win ties. Absence of a hit is `None`, never an error.

use easel_core::{CanvasNode, NodeId};
use kurbo::Point;

/// Find the topmost node whose content box contains `p`.
pub fn topmost_node_at(nodes: &[CanvasNode], p: Point) -> Option<NodeId> {
    nodes.iter().rev().find(|node| node.contains(p)).map(|node| node.id)
}
