//! Nearest-match search.
//!
//! Best-first (Dijkstra) enumeration over outbound edges. Paths leave the
//! frontier in ascending cumulative weight; equal weights leave in the
//! order they were enqueued, so results are deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use hashbrown::HashMap;

use crate::model::*;
use super::Graph;

/// Knobs for [`Graph::closest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Matches closer than this many edges to the entry are not reported.
    pub min_depth: usize,
    /// Stop after this many matches.
    pub count: usize,
}

impl SearchOptions {
    pub fn new(min_depth: usize, count: usize) -> Self {
        Self { min_depth, count }
    }
}

/// One frontier entry; paths are rebuilt by walking `parent`.
struct Step {
    node: NodeId,
    via: Option<EdgeId>,
    parent: Option<usize>,
    distance: u64,
    depth: usize,
}

impl Graph {
    /// The `count` lowest-cost paths from `entry` whose end node satisfies
    /// `predicate` at depth `>= min_depth`, in ascending distance.
    ///
    /// An `entry` that is not in the graph falls back to the root.
    /// `predicate` runs once per finalized node.
    pub fn closest<F>(&self, entry: NodeId, options: SearchOptions, predicate: F) -> Vec<Path>
    where
        F: Fn(&Node) -> bool,
    {
        let mut results = Vec::new();
        if options.count == 0 {
            return results;
        }

        let entry = if self.node(entry).is_some() { entry } else { self.root() };

        let mut trail = vec![Step { node: entry, via: None, parent: None, distance: 0, depth: 0 }];
        // (distance, enqueue order); the trail index doubles as the order.
        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse((0u64, 0usize)));
        let mut finalized: HashMap<NodeId, u64> = HashMap::new();

        while let Some(Reverse((distance, index))) = frontier.pop() {
            let (node_id, depth) = (trail[index].node, trail[index].depth);
            if finalized.contains_key(&node_id) {
                continue;
            }
            finalized.insert(node_id, distance);

            let node = self.node(node_id).expect("frontier only holds arena nodes");
            if depth >= options.min_depth && predicate(node) {
                results.push(rebuild(&trail, index));
                if results.len() == options.count {
                    break;
                }
            }

            for &edge_id in node.outbound() {
                let edge = self.edge(edge_id).expect("outbound list holds a released edge");
                let target = edge.target().expect("outbound list holds an unlinked edge");
                let next = distance + u64::from(edge.weight().get());

                if finalized.get(&target).is_some_and(|seen| *seen <= next) {
                    continue;
                }

                trail.push(Step {
                    node: target,
                    via: Some(edge_id),
                    parent: Some(index),
                    distance: next,
                    depth: depth + 1,
                });
                frontier.push(Reverse((next, trail.len() - 1)));
            }
        }

        results
    }
}

fn rebuild(trail: &[Step], tip: usize) -> Path {
    let mut hops = Vec::new();
    let mut cursor = Some(tip);
    while let Some(index) = cursor {
        hops.push(index);
        cursor = trail[index].parent;
    }
    hops.reverse();

    let mut path = Path::single(trail[hops[0]].node);
    for &index in &hops[1..] {
        let step = &trail[index];
        if let Some(edge) = step.via {
            path.edges.push(edge);
            path.nodes.push(step.node);
        }
    }
    path.distance = trail[tip].distance;
    path
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> {a, b, c, e} at 100; a -1-> b; b -2-> e.
    fn scenario() -> (Graph, NodeId, NodeId, NodeId, NodeId) {
        let mut g = Graph::new();
        let a = g.create_node(EntityKind::User, Payload::Empty);
        let b = g.create_node(EntityKind::User, Payload::Empty);
        let c = g.create_node(EntityKind::User, Payload::Empty);
        let e = g.create_node(EntityKind::Event, Payload::Empty);
        let root = g.root();
        for n in [a, b, c, e] {
            let link = g.create_edge(EntityKind::Root, Payload::Empty);
            g.link(link, root, n).set_weight(Weight::from_const(100));
        }
        let follow = g.create_edge(EntityKind::Relation, Payload::Empty);
        g.link(follow, a, b).set_weight(Weight::from_const(1));
        let post = g.create_edge(EntityKind::Post, Payload::Empty);
        g.link(post, b, e).set_weight(Weight::from_const(2));
        (g, a, b, c, e)
    }

    fn is_event(node: &Node) -> bool {
        node.kind() == EntityKind::Event
    }

    #[test]
    fn test_follow_then_post_reaches_event() {
        let (g, a, b, _, e) = scenario();
        let results = g.closest(a, SearchOptions::new(2, 5), is_event);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].end(), e);
        assert_eq!(results[0].distance, 3);
        assert_eq!(results[0].nodes, vec![a, b, e]);
        assert_eq!(results[0].depth(), 2);
    }

    #[test]
    fn test_min_depth_beyond_reach_returns_nothing() {
        let (g, a, _, _, _) = scenario();
        assert!(g.closest(a, SearchOptions::new(3, 5), is_event).is_empty());
    }

    #[test]
    fn test_min_depth_gates_single_hop() {
        let (g, _, b, _, e) = scenario();
        // b -> e is one hop.
        assert!(g.closest(b, SearchOptions::new(2, 5), is_event).is_empty());
        let hits = g.closest(b, SearchOptions::new(1, 5), is_event);
        assert_eq!(hits.iter().map(Path::end).collect::<Vec<_>>(), vec![e]);
    }

    #[test]
    fn test_zero_count_is_empty() {
        let (g, a, _, _, _) = scenario();
        assert!(g.closest(a, SearchOptions::new(0, 0), |_| true).is_empty());
    }

    #[test]
    fn test_isolated_entry_finds_only_itself() {
        let (g, _, _, c, _) = scenario();
        let hits = g.closest(c, SearchOptions::new(0, 10), |_| true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].end(), c);
        assert!(g.closest(c, SearchOptions::new(1, 10), |_| true).is_empty());
    }

    #[test]
    fn test_unknown_entry_falls_back_to_root() {
        let (g, _, _, _, e) = scenario();
        let hits = g.closest(NodeId(999), SearchOptions::new(1, 10), is_event);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start(), g.root());
        assert_eq!(hits[0].end(), e);
        assert_eq!(hits[0].distance, 100);
    }

    #[test]
    fn test_result_cap() {
        let (g, _, _, _, _) = scenario();
        let root = g.root();
        // Root reaches itself plus four nodes.
        assert_eq!(g.closest(root, SearchOptions::new(0, 3), |_| true).len(), 3);
        assert_eq!(g.closest(root, SearchOptions::new(0, 50), |_| true).len(), 5);
    }

    #[test]
    fn test_shorter_path_wins_over_direct_heavy_edge() {
        let (g, _, b, _, e) = scenario();
        let root = g.root();
        // root -> e costs 100 directly; root -> b -> e costs 102.
        let hits = g.closest(root, SearchOptions::new(0, 10), |_| true);
        let to_e = hits.iter().find(|p| p.end() == e).unwrap();
        assert_eq!(to_e.distance, 100);
        assert_eq!(to_e.depth(), 1);
        assert!(hits.iter().any(|p| p.end() == b));
    }

    #[test]
    fn test_ties_follow_enqueue_order() {
        let mut g = Graph::new();
        let hub = g.create_node(EntityKind::User, Payload::Empty);
        let leaves: Vec<NodeId> = (0..4)
            .map(|_| g.create_node(EntityKind::Event, Payload::Empty))
            .collect();
        for &leaf in &leaves {
            let edge = g.create_edge(EntityKind::Like, Payload::Empty);
            g.link(edge, hub, leaf).set_weight(Weight::from_const(4));
        }
        let ends: Vec<NodeId> = g
            .closest(hub, SearchOptions::new(1, 10), is_event)
            .iter()
            .map(Path::end)
            .collect();
        assert_eq!(ends, leaves);
    }

    #[test]
    fn test_unlinked_edges_are_not_traversed() {
        let (mut g, a, _, _, _) = scenario();
        let follow = g.node(a).unwrap().outbound()[0];
        g.unlink_edge(follow);
        assert!(g.closest(a, SearchOptions::new(0, 5), is_event).is_empty());
    }
}
