//! Turn-by-turn guidance for a node path

use crate::NodeId;

pub const NO_INSTRUCTIONS: &str = "No navigation instructions available";

/// Converts a path into human-readable steps.
///
/// `["Start at A", "Proceed to B", ..., "Arrived at Z"]`: one "Proceed to"
/// per intermediate node. Paths shorter than two nodes yield a single
/// [`NO_INSTRUCTIONS`] entry.
///
/// This is not a per-hop listing: the destination gets only "Arrived at",
/// never a "Proceed to", so steps line up one-to-one with path nodes.
pub fn generate_instructions(path: &[NodeId]) -> Vec<String> {
    let [first, intermediate @ .., last] = path else {
        return vec![NO_INSTRUCTIONS.to_string()];
    };

    let mut instructions = Vec::with_capacity(path.len());
    instructions.push(format!("Start at {first}"));
    instructions.extend(intermediate.iter().map(|node| format!("Proceed to {node}")));
    instructions.push(format!("Arrived at {last}"));
    instructions
}
