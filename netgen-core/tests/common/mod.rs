use std::collections::HashSet;

use netgen_core::Graph;

/// Asserts no self-loops, no duplicate edges and a degree sequence that
/// matches the edges.
pub fn assert_simple(graph: &Graph) {
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
