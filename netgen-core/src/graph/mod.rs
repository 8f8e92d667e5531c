//! The generated graph and the builder that produces it.
//!
//! A [`Graph`] is immutable once built. Consumers such as epidemic simulators
//! or measure calculators only query neighbours and degrees, so the graph
//! keeps an adjacency list alongside the edge collection.

mod builder;
mod components;

pub use builder::GraphBuilder;
pub(crate) use components::DisjointSet;

use crate::random::RandomSource;

/// A single edge of a [`Graph`].
///
/// Undirected edges are stored in canonical form (`source < target`);
/// directed edges keep their orientation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    source: usize,
    target: usize,
}

impl Edge {
    pub(crate) const fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }

    /// Returns the source endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn source(&self) -> usize { self.source }

    /// Returns the target endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn target(&self) -> usize { self.target }

    /// Returns the endpoints as a tuple.
    #[must_use]
    pub const fn endpoints(&self) -> (usize, usize) {
        (self.source, self.target)
    }
}

/// A vertex position in the unit square, assigned by spatial models.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Horizontal coordinate in `[0, 1)`.
    pub x: f64,
    /// Vertical coordinate in `[0, 1)`.
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Draws a point uniformly from the unit square.
    pub fn random(rng: &mut RandomSource) -> Self {
        let x = rng.uniform();
        let y = rng.uniform();
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Draws `count` independent uniform positions.
pub(crate) fn random_positions(count: usize, rng: &mut RandomSource) -> Vec<Point> {
    (0..count).map(|_| Point::random(rng)).collect()
}

/// An immutable simple graph: no self-loops, no duplicate edges and vertex
/// ids contiguous from zero.
///
/// # Examples
/// ```
/// use netgen_core::GraphBuilder;
///
/// let mut builder = GraphBuilder::with_vertices(3, false);
/// builder.add_edge(0, 1)?;
/// builder.add_edge(1, 2)?;
/// let graph = builder.build();
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.degree(1), Some(2));
/// assert_eq!(graph.neighbors(1), Some(&[0, 2][..]));
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    directed: bool,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<usize>>,
    degrees: Vec<usize>,
    positions: Option<Vec<Point>>,
}

impl Graph {
    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.degrees.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether edges are ordered pairs.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// Returns the edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the edges as `(source, target)` pairs.
    #[must_use]
    pub fn edge_list(&self) -> Vec<(usize, usize)> {
        self.edges.iter().map(Edge::endpoints).collect()
    }

    /// Returns the neighbours of `vertex` (out-neighbours when directed), or
    /// `None` when the vertex does not exist.
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> Option<&[usize]> {
        self.adjacency.get(vertex).map(Vec::as_slice)
    }

    /// Returns the number of edges incident to `vertex`, counting both
    /// directions for directed graphs.
    #[must_use]
    pub fn degree(&self, vertex: usize) -> Option<usize> {
        self.degrees.get(vertex).copied()
    }

    /// Returns the degree of every vertex.
    #[must_use]
    pub fn degree_sequence(&self) -> &[usize] {
        &self.degrees
    }

    /// Returns `2·|E|/n`, or zero for an empty graph.
    #[must_use]
    pub fn average_degree(&self) -> f64 {
        if self.degrees.is_empty() {
            return 0.0;
        }
        2.0 * self.edges.len() as f64 / self.degrees.len() as f64
    }

    /// Returns the smallest vertex degree, or `None` for an empty graph.
    #[must_use]
    pub fn min_degree(&self) -> Option<usize> {
        self.degrees.iter().copied().min()
    }

    /// Returns the vertex coordinates assigned by a spatial model.
    #[must_use]
    pub fn positions(&self) -> Option<&[Point]> {
        self.positions.as_deref()
    }

    /// Returns whether the edge exists (orientation matters when directed).
    #[must_use]
    pub fn has_edge(&self, source: usize, target: usize) -> bool {
        self.adjacency
            .get(source)
            .is_some_and(|neighbors| neighbors.contains(&target))
    }

    /// Counts weakly connected components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components().components()
    }

    /// Returns whether every vertex is reachable from every other one,
    /// ignoring edge orientation. Empty and single-vertex graphs are connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.component_count() <= 1
    }

    /// Returns the largest weakly connected component as a new graph.
    ///
    /// Vertices are relabelled densely in ascending original order and edges
    /// keep their original order. Ties between equally large components go to
    /// the one holding the smallest vertex id.
    ///
    /// # Examples
    /// ```
    /// use netgen_core::GraphBuilder;
    ///
    /// let mut builder = GraphBuilder::with_vertices(5, false);
    /// builder.add_edge(0, 1)?;
    /// builder.add_edge(2, 3)?;
    /// builder.add_edge(3, 4)?;
    /// let largest = builder.build().largest_component();
    /// assert_eq!(largest.vertex_count(), 3);
    /// assert_eq!(largest.edge_list(), [(0, 1), (1, 2)]);
    /// # Ok::<(), netgen_core::NetgenError>(())
    /// ```
    #[must_use]
    pub fn largest_component(&self) -> Self {
        let mut components = self.components();
        let roots: Vec<usize> = (0..self.vertex_count())
            .map(|vertex| components.find(vertex))
            .collect();
        let mut sizes = vec![0_usize; self.vertex_count()];
        for &root in &roots {
            sizes[root] += 1;
        }
        let mut best_root = None;
        let mut best_size = 0;
        for &root in &roots {
            if sizes[root] > best_size {
                best_size = sizes[root];
                best_root = Some(root);
            }
        }

        let mut relabel = vec![None; self.vertex_count()];
        let mut kept = 0;
        for (vertex, &root) in roots.iter().enumerate() {
            if Some(root) == best_root {
                relabel[vertex] = Some(kept);
                kept += 1;
            }
        }

        let mut builder = GraphBuilder::with_vertices(kept, self.directed);
        for edge in &self.edges {
            if let (Some(source), Some(target)) = (relabel[edge.source], relabel[edge.target]) {
                builder.insert_unchecked(source, target);
            }
        }
        if let Some(positions) = &self.positions {
            let kept_positions = positions
                .iter()
                .zip(&relabel)
                .filter_map(|(point, label)| label.map(|_| *point))
                .collect();
            builder.attach_positions(kept_positions);
        }
        builder.build()
    }

    fn components(&self) -> DisjointSet {
        let mut set = DisjointSet::new(self.vertex_count());
        for edge in &self.edges {
            set.union(edge.source, edge.target);
        }
        set
    }
}
