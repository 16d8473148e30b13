//! Stand-in simulation for the headless driver.
//!
//! Generates a seeded random graph around the origin and nudges node
//! positions every frame the way a force layout that is almost settled would.

#[cfg(test)]
#[path = "sim_test.rs"]
mod sim_test;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene::graph::{GraphEdge, GraphNode, NodeId};
use scene::viewport::Point;
use uuid::Uuid;

/// World-space spacing between neighbouring nodes.
const NODE_SPACING: f64 = 20.0;

/// Largest per-frame jitter in world units.
const JITTER: f64 = 0.75;

/// Seeded graph generator and position jitter.
pub struct Simulation {
    rng: StdRng,
}

impl Simulation {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Random nodes in a disk sized so density stays constant, plus random
    /// edges between distinct nodes. Ids come from the seeded rng so runs
    /// are reproducible.
    #[allow(clippy::cast_precision_loss)]
    pub fn generate(&mut self, nodes: usize, edges: usize) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        let radius = NODE_SPACING * (nodes as f64).sqrt();
        let graph_nodes: Vec<GraphNode> = (0..nodes)
            .map(|i| {
                // sqrt keeps the disk uniformly filled.
                let r = radius * self.rng.random::<f64>().sqrt();
                let angle = self.rng.random_range(0.0..std::f64::consts::TAU);
                let mut node = GraphNode::new(self.next_id(), r * angle.cos(), r * angle.sin());
                node.label = Some(format!("n{i}"));
                node
            })
            .collect();

        let graph_edges = if nodes < 2 {
            Vec::new()
        } else {
            (0..edges)
                .map(|_| {
                    let source = self.rng.random_range(0..nodes);
                    let offset = self.rng.random_range(1..nodes);
                    let target = (source + offset) % nodes;
                    GraphEdge::new(self.next_id(), graph_nodes[source].id, graph_nodes[target].id)
                })
                .collect()
        };
        (graph_nodes, graph_edges)
    }

    /// Next positions for `nodes`, each moved by a small random step.
    /// Nodes are visited in id order so a seed replays the same motion.
    pub fn jitter<'a>(&mut self, nodes: impl Iterator<Item = &'a GraphNode>) -> Vec<(NodeId, Point)> {
        let mut nodes: Vec<&GraphNode> = nodes.collect();
        nodes.sort_unstable_by_key(|n| n.id);
        nodes
            .into_iter()
            .map(|n| {
                let dx = self.rng.random_range(-JITTER..=JITTER);
                let dy = self.rng.random_range(-JITTER..=JITTER);
                (n.id, Point::new(n.x + dx, n.y + dy))
            })
            .collect()
    }

    /// Uniform index in `0..len`, or `None` for an empty range.
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    fn next_id(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.rng.random()).into_uuid()
    }
}
