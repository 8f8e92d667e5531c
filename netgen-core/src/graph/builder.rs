//! Incremental, simple-graph-preserving construction of a [`Graph`].

use std::collections::HashSet;

use crate::error::{NetgenError, Result};

use super::{Edge, Graph, Point};

/// Accumulates vertices and edges, silently dropping self-loops and
/// duplicates so every built [`Graph`] is simple.
///
/// Degrees are counted as edges are inserted, so preferential-attachment
/// models can read them in O(1) at every step.
///
/// # Examples
/// ```
/// use netgen_core::GraphBuilder;
///
/// let mut builder = GraphBuilder::new(false);
/// let a = builder.add_vertex();
/// let b = builder.add_vertex();
/// assert!(builder.add_edge(a, b)?);
/// assert!(!builder.add_edge(b, a)?, "duplicate edges are ignored");
/// assert!(!builder.add_edge(a, a)?, "self-loops are ignored");
/// assert_eq!(builder.degree_of(a), Some(1));
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    directed: bool,
    edge_set: HashSet<(usize, usize)>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<usize>>,
    degrees: Vec<usize>,
    out_degrees: Vec<usize>,
    positions: Option<Vec<Point>>,
}

impl GraphBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            ..Self::default()
        }
    }

    /// Creates a builder that already holds `vertex_count` isolated vertices.
    #[must_use]
    pub fn with_vertices(vertex_count: usize, directed: bool) -> Self {
        Self {
            directed,
            adjacency: vec![Vec::new(); vertex_count],
            degrees: vec![0; vertex_count],
            out_degrees: vec![0; vertex_count],
            ..Self::default()
        }
    }

    /// Appends an isolated vertex and returns its id.
    pub fn add_vertex(&mut self) -> usize {
        self.adjacency.push(Vec::new());
        self.degrees.push(0);
        self.out_degrees.push(0);
        self.degrees.len() - 1
    }

    /// Returns the number of vertices added so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.degrees.len()
    }

    /// Returns the number of distinct edges added so far.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether edges are ordered pairs.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// Inserts the edge `(source, target)`.
    ///
    /// Returns `Ok(false)` without changing anything when the edge already
    /// exists or `source == target`.
    ///
    /// # Errors
    /// Returns [`NetgenError::VertexOutOfRange`] when either endpoint has not
    /// been added.
    pub fn add_edge(&mut self, source: usize, target: usize) -> Result<bool> {
        for vertex in [source, target] {
            if vertex >= self.vertex_count() {
                return Err(NetgenError::VertexOutOfRange {
                    vertex,
                    vertex_count: self.vertex_count(),
                });
            }
        }
        Ok(self.insert_unchecked(source, target))
    }

    /// Inserts an edge whose endpoints are known to exist.
    pub(crate) fn insert_unchecked(&mut self, source: usize, target: usize) -> bool {
        if source == target {
            return false;
        }
        let key = self.key(source, target);
        if !self.edge_set.insert(key) {
            return false;
        }
        self.edges.push(Edge::new(key.0, key.1));
        self.adjacency[source].push(target);
        if !self.directed {
            self.adjacency[target].push(source);
        }
        self.degrees[source] += 1;
        self.degrees[target] += 1;
        self.out_degrees[source] += 1;
        true
    }

    /// Returns whether the edge exists (orientation matters when directed).
    #[must_use]
    pub fn has_edge(&self, source: usize, target: usize) -> bool {
        self.edge_set.contains(&self.key(source, target))
    }

    /// Returns the number of edges incident to `vertex`.
    #[must_use]
    pub fn degree_of(&self, vertex: usize) -> Option<usize> {
        self.degrees.get(vertex).copied()
    }

    /// Returns the number of edges leaving `vertex`; equals the degree for
    /// undirected graphs.
    #[must_use]
    pub fn out_degree_of(&self, vertex: usize) -> Option<usize> {
        if self.directed {
            self.out_degrees.get(vertex).copied()
        } else {
            self.degree_of(vertex)
        }
    }

    /// Returns the number of edges entering `vertex`; equals the degree for
    /// undirected graphs.
    #[must_use]
    pub fn in_degree_of(&self, vertex: usize) -> Option<usize> {
        let degree = self.degree_of(vertex)?;
        if self.directed {
            Some(degree - self.out_degrees[vertex])
        } else {
            Some(degree)
        }
    }

    /// Returns the degree of every vertex.
    #[must_use]
    pub fn degrees(&self) -> &[usize] {
        &self.degrees
    }

    /// Assigns vertex coordinates.
    ///
    /// # Errors
    /// Returns [`NetgenError::VertexOutOfRange`] when the number of points
    /// differs from the vertex count.
    pub fn set_positions(&mut self, positions: Vec<Point>) -> Result<()> {
        if positions.len() != self.vertex_count() {
            return Err(NetgenError::VertexOutOfRange {
                vertex: positions.len(),
                vertex_count: self.vertex_count(),
            });
        }
        self.attach_positions(positions);
        Ok(())
    }

    pub(crate) fn attach_positions(&mut self, positions: Vec<Point>) {
        self.positions = Some(positions);
    }

    /// Freezes the builder into an immutable [`Graph`].
    #[must_use]
    pub fn build(self) -> Graph {
        Graph {
            directed: self.directed,
            edges: self.edges,
            adjacency: self.adjacency,
            degrees: self.degrees,
            positions: self.positions,
        }
    }

    fn key(&self, source: usize, target: usize) -> (usize, usize) {
        if self.directed || source < target {
            (source, target)
        } else {
            (target, source)
        }
    }
}
