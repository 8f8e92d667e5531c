//! Shared assertions for unit tests.

use std::collections::HashSet;

use crate::Graph;

/// Asserts the structural invariants every generated graph must satisfy:
/// no self-loops, no duplicate edges, endpoints in range and degrees that
/// agree with the edge collection.
pub(crate) fn assert_simple(graph: &Graph) {
    let vertex_count = graph.vertex_count();
    let mut seen = HashSet::new();
    let mut degrees = vec![0_usize; vertex_count];
    for edge in graph.edges() {
        let (source, target) = edge.endpoints();
        assert_ne!(source, target, "self-loop at vertex {source}");
        assert!(source < vertex_count && target < vertex_count);
        let key = if graph.is_directed() || source < target {
            (source, target)
        } else {
            (target, source)
        };
        assert!(seen.insert(key), "duplicate edge {key:?}");
        degrees[source] += 1;
        degrees[target] += 1;
    }
    assert_eq!(graph.degree_sequence(), &degrees[..]);
}
