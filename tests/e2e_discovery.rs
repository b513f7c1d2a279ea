//! End-to-end tests for nearest-match search and the mutation API.
//!
//! Covers the ordering guarantees of `closest` on arbitrary graphs
//! (proptest), the depth gate, result caps, and discovery after live
//! mutations.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use social_proximity::{
    EntityKind, EventQuery, EventRow, Graph, GraphManager, Mutation, NodeId, Path, Payload,
    RelationRow, RowId, SearchOptions, UserRow, Weight,
};

// ============================================================================
// Helpers
// ============================================================================

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 18, 0, 0).unwrap()
}

fn user(id: RowId) -> UserRow {
    UserRow {
        id,
        first_name: format!("user{id}"),
        last_name: "Test".into(),
        email: None,
        photo: None,
        active: true,
        created_at: at(1),
    }
}

fn event(id: RowId, user_id: RowId, title: &str, day: u32) -> EventRow {
    EventRow {
        id,
        user_id,
        title: title.into(),
        description: String::new(),
        location: String::new(),
        online: true,
        price: 5.0,
        active: true,
        created_at: at(day),
    }
}

fn relation(id: RowId, user_id: RowId, follower_id: RowId) -> RelationRow {
    RelationRow { id, user_id, follower_id, created_at: at(2) }
}

/// Build a graph of `n` user nodes and the given weighted edges.
fn build(n: usize, edges: &[(usize, usize, u32)]) -> (Graph, Vec<NodeId>) {
    let mut g = Graph::new();
    let nodes: Vec<NodeId> = (0..n).map(|_| g.create_node(EntityKind::User, Payload::Empty)).collect();
    for &(s, t, w) in edges {
        let e = g.create_edge(EntityKind::Relation, Payload::Empty);
        g.link(e, nodes[s], nodes[t]).set_weight(Weight::new(w).unwrap());
    }
    (g, nodes)
}

/// Shortest distances by Bellman-Ford over the same edge list.
fn reference_distances(n: usize, edges: &[(usize, usize, u32)], from: usize) -> Vec<Option<u64>> {
    let mut dist = vec![None; n];
    dist[from] = Some(0u64);
    for _ in 0..n {
        for &(s, t, w) in edges {
            if let Some(ds) = dist[s] {
                let candidate = ds + u64::from(w);
                if dist[t].is_none_or(|dt| candidate < dt) {
                    dist[t] = Some(candidate);
                }
            }
        }
    }
    dist
}

fn arb_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize, u32)>)> {
    (2usize..12).prop_flat_map(|n| {
        let edge = (0..n, 0..n, 1u32..10);
        (Just(n), prop::collection::vec(edge, 0..40))
    })
}

// ============================================================================
// 1. Properties of closest
// ============================================================================

proptest! {
    #[test]
    fn prop_results_ascend_and_are_shortest((n, edges) in arb_graph()) {
        let (g, nodes) = build(n, &edges);
        let results = g.closest(nodes[0], SearchOptions::new(0, usize::MAX), |_| true);
        let expected = reference_distances(n, &edges, 0);

        for pair in results.windows(2) {
            prop_assert!(pair[0].distance <= pair[1].distance);
        }
        for path in &results {
            let index = nodes.iter().position(|id| *id == path.end()).unwrap();
            prop_assert_eq!(Some(path.distance), expected[index]);
            prop_assert_eq!(path.start(), nodes[0]);
            prop_assert_eq!(path.nodes.len(), path.edges.len() + 1);
        }
        let reachable = expected.iter().filter(|d| d.is_some()).count();
        prop_assert_eq!(results.len(), reachable);
    }

    #[test]
    fn prop_result_cap((n, edges) in arb_graph(), k in 0usize..15) {
        let (g, nodes) = build(n, &edges);
        let reachable = reference_distances(n, &edges, 0).iter().filter(|d| d.is_some()).count();
        let results = g.closest(nodes[0], SearchOptions::new(0, k), |_| true);
        prop_assert_eq!(results.len(), k.min(reachable));
    }

    #[test]
    fn prop_min_depth_respected((n, edges) in arb_graph(), min_depth in 0usize..4) {
        let (g, nodes) = build(n, &edges);
        for path in g.closest(nodes[0], SearchOptions::new(min_depth, usize::MAX), |_| true) {
            prop_assert!(path.depth() >= min_depth);
        }
    }

    #[test]
    fn prop_unlink_node_cascades((n, edges) in arb_graph(), pick in 0usize..12) {
        let (mut g, nodes) = build(n, &edges);
        let victim = nodes[pick % n];
        let incident: Vec<_> = g.node(victim).unwrap().edges().to_vec();

        let unlinked = g.unlink_node(victim);
        prop_assert_eq!(unlinked, incident.len());
        prop_assert_eq!(g.node(victim).unwrap().degree(), 0);
        for edge in &incident {
            prop_assert!(!g.edge(*edge).unwrap().is_linked());
            for node in g.nodes() {
                prop_assert!(!node.edges().contains(edge));
                prop_assert!(!node.inbound().contains(edge));
                prop_assert!(!node.outbound().contains(edge));
            }
        }
    }

    #[test]
    fn prop_double_unlink_matches_single((n, edges) in arb_graph()) {
        prop_assume!(!edges.is_empty());
        let (mut once, _) = build(n, &edges);
        let (mut twice, _) = build(n, &edges);
        let first = once.edges().next().unwrap().id();

        once.unlink_edge(first);
        twice.unlink_edge(first);
        twice.unlink_edge(first);

        let lists = |g: &Graph| -> Vec<(Vec<_>, Vec<_>, Vec<_>)> {
            g.nodes().map(|n| (n.edges().to_vec(), n.inbound().to_vec(), n.outbound().to_vec())).collect()
        };
        prop_assert_eq!(lists(&once), lists(&twice));
    }
}

// ============================================================================
// 2. Discovery through the manager
// ============================================================================

/// Users 1 (A), 2 (B), 3 (C). A -> B follow edge, B posts event 100.
fn scenario() -> GraphManager {
    let mut m = GraphManager::default();
    for id in 1..=3 {
        m.apply(Mutation::UserRegistered(user(id)));
    }
    m.apply(Mutation::FollowCreated(relation(10, 1, 2)));
    m.apply(Mutation::EventPosted(event(100, 2, "Rooftop Jazz", 10)));
    m
}

#[test]
fn test_scenario_event_at_distance_three() {
    let m = scenario();
    let a = m.user_node(1).unwrap();
    let is_event = |n: &social_proximity::Node| n.kind() == EntityKind::Event;

    let hits = m.graph().closest(a, SearchOptions::new(2, 5), is_event);
    assert_eq!(hits.iter().map(Path::end).collect::<Vec<_>>(), vec![m.event_node(100).unwrap()]);
    assert_eq!(hits[0].distance, 3);

    assert!(m.graph().closest(a, SearchOptions::new(3, 5), is_event).is_empty());
}

#[test]
fn test_added_event_is_found_by_its_title() {
    let mut m = scenario();
    let e = event(101, 3, "Harbour Sunset Cruise", 12);
    m.add_event(e.clone());

    let hits = m.search_events(Some(e.user_id), &EventQuery::new().keyword(&e.title), 0);
    assert!(hits.iter().any(|h| h.event.id == e.id));
}

#[test]
fn test_keyword_and_cutoff_filters() {
    let mut m = scenario();
    m.apply(Mutation::EventPosted(event(102, 2, "Jazz Brunch", 20)));

    let jazz: Vec<RowId> = m
        .find_events(Some(1), &EventQuery::new().keyword("jazz"))
        .iter()
        .map(|h| h.event.id)
        .collect();
    assert_eq!(jazz, vec![100, 102]);

    let early: Vec<RowId> = m
        .find_events(Some(1), &EventQuery::new().keyword("jazz").before(at(15)))
        .iter()
        .map(|h| h.event.id)
        .collect();
    assert_eq!(early, vec![100]);

    let capped = m.find_events(Some(1), &EventQuery::new().limit(1));
    assert_eq!(capped.len(), 1);
    assert!(m.find_events(Some(1), &EventQuery::new().limit(0)).is_empty());
}

#[test]
fn test_closer_signal_ranks_first() {
    let mut m = scenario();
    // User 4 follows A as well and posts an event of its own.
    m.add_user(user(4));
    m.follow_user(relation(11, 1, 4));
    m.add_event(event(103, 4, "Gallery Opening", 11));

    // Both at distance 3 (follow 1 + post 2); registration order breaks the tie.
    let ids: Vec<RowId> = m.find_events(Some(1), &EventQuery::new()).iter().map(|h| h.event.id).collect();
    assert_eq!(ids, vec![100, 103]);

    // Unfollowing B drops its event out of reach.
    m.unfollow_user(&relation(10, 1, 2));
    let ids: Vec<RowId> = m.find_events(Some(1), &EventQuery::new()).iter().map(|h| h.event.id).collect();
    assert_eq!(ids, vec![103]);
}

#[test]
fn test_refollow_after_unfollow_reuses_relation_id() {
    let mut m = scenario();
    m.unfollow_user(&relation(10, 1, 2));
    assert!(m.find_events(Some(1), &EventQuery::new()).is_empty());

    m.follow_user(relation(10, 1, 2));
    let ids: Vec<RowId> = m.find_events(Some(1), &EventQuery::new()).iter().map(|h| h.event.id).collect();
    assert_eq!(ids, vec![100]);
}

#[test]
fn test_duplicate_user_registration_leaves_one_node() {
    let mut m = scenario();
    let nodes_before = m.graph().node_count();
    let mut again = user(1);
    again.last_name = "Changed".into();
    m.add_user(again);

    assert_eq!(m.graph().node_count(), nodes_before);
    let node = m.graph().node(m.user_node(1).unwrap()).unwrap();
    assert_eq!(node.payload().as_user().unwrap().last_name, "Test");
}
