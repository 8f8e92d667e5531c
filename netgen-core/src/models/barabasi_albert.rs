//! Barabási–Albert preferential attachment, linear or non-linear.

use tracing::instrument;

use crate::{
    error::Result,
    graph::{Graph, GraphBuilder},
    random::RandomSource,
};

use super::{Generator, ModelKind, check_at_least, check_non_negative, half_degree};

/// Growth model: vertex `i` attaches `min(m, i)` edges to distinct earlier
/// vertices chosen with weight `d^power + 1`.
///
/// `d` is the degree of the candidate (its in-degree for directed graphs) and
/// the constant `1` gives fresh vertices a non-zero chance of being picked.
/// `power = 1` is the classic linear model.
///
/// # Examples
/// ```
/// use netgen_core::{BarabasiAlbert, Generator, RandomSource};
///
/// let mut rng = RandomSource::seed_from_u64(5);
/// let graph = BarabasiAlbert::new(2)?.generate(100, &mut rng)?;
/// // vertex 1 adds one edge, every later vertex adds two
/// assert_eq!(graph.edge_count(), 1 + 2 * 98);
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BarabasiAlbert {
    edges_per_vertex: usize,
    directed: bool,
    power: f64,
}

impl BarabasiAlbert {
    /// Creates an undirected linear model attaching `edges_per_vertex` edges
    /// per new vertex.
    ///
    /// # Errors
    /// Returns [`crate::NetgenError::InvalidModelParameter`] when
    /// `edges_per_vertex` is zero.
    pub fn new(edges_per_vertex: usize) -> Result<Self> {
        check_at_least(
            ModelKind::BarabasiAlbert,
            "edges_per_vertex",
            edges_per_vertex,
            1,
        )?;
        Ok(Self {
            edges_per_vertex,
            directed: false,
            power: 1.0,
        })
    }

    /// Orients every attachment from the new vertex to its target.
    #[must_use]
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Sets the attachment exponent.
    ///
    /// # Errors
    /// Returns [`crate::NetgenError::InvalidModelParameter`] for negative or
    /// non-finite exponents.
    pub fn with_power(mut self, power: f64) -> Result<Self> {
        check_non_negative(ModelKind::BarabasiAlbert, "power", power)?;
        self.power = power;
        Ok(self)
    }

    /// Returns the number of edges attached per new vertex.
    #[must_use]
    pub fn edges_per_vertex(&self) -> usize {
        self.edges_per_vertex
    }

    /// Returns whether edges are oriented.
    #[must_use]
    pub fn directed(&self) -> bool {
        self.directed
    }

    /// Returns the attachment exponent.
    #[must_use]
    pub fn power(&self) -> f64 {
        self.power
    }
}

impl Generator for BarabasiAlbert {
    fn kind(&self) -> ModelKind {
        ModelKind::BarabasiAlbert
    }

    #[instrument(
        name = "netgen.generate.ba",
        err,
        skip(self, rng),
        fields(m = self.edges_per_vertex, directed = self.directed, power = self.power),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        let mut builder = GraphBuilder::with_vertices(vertex_count, self.directed);
        let mut weights = Vec::with_capacity(vertex_count);
        for vertex in 1..vertex_count {
            weights.clear();
            weights.extend((0..vertex).map(|candidate| {
                let degree = if self.directed {
                    builder.in_degree_of(candidate).unwrap_or_default()
                } else {
                    builder.degrees()[candidate]
                };
                (degree as f64).powf(self.power) + 1.0
            }));
            let targets = rng.choose_weighted(&weights, self.edges_per_vertex.min(vertex))?;
            for target in targets {
                builder.insert_unchecked(vertex, target);
            }
        }
        Ok(builder.build())
    }
}

/// Barabási–Albert with `m` set to half the target average degree, rounded.
#[derive(Clone, Debug, PartialEq)]
pub struct BarabasiAlbertAverage {
    inner: BarabasiAlbert,
    average_degree: f64,
}

impl BarabasiAlbertAverage {
    /// Creates an undirected linear model targeting `average_degree`.
    ///
    /// # Errors
    /// Returns [`crate::NetgenError::InvalidModelParameter`] for a non-positive
    /// target.
    pub fn new(average_degree: f64) -> Result<Self> {
        let edges_per_vertex = half_degree(ModelKind::BarabasiAlbertAverage, average_degree)?;
        Ok(Self {
            inner: BarabasiAlbert {
                edges_per_vertex,
                directed: false,
                power: 1.0,
            },
            average_degree,
        })
    }

    /// Orients every attachment from the new vertex to its target.
    #[must_use]
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.inner.directed = directed;
        self
    }

    /// Sets the attachment exponent.
    ///
    /// # Errors
    /// Returns [`crate::NetgenError::InvalidModelParameter`] for negative or
    /// non-finite exponents.
    pub fn with_power(mut self, power: f64) -> Result<Self> {
        check_non_negative(ModelKind::BarabasiAlbertAverage, "power", power)?;
        self.inner.power = power;
        Ok(self)
    }

    /// Returns the derived number of edges per new vertex.
    #[must_use]
    pub fn edges_per_vertex(&self) -> usize {
        self.inner.edges_per_vertex
    }
}

impl Generator for BarabasiAlbertAverage {
    fn kind(&self) -> ModelKind {
        ModelKind::BarabasiAlbertAverage
    }

    #[instrument(
        name = "netgen.generate.ba_avg",
        err,
        skip(self, rng),
        fields(average_degree = self.average_degree, m = self.inner.edges_per_vertex),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        self.inner.generate(vertex_count, rng)
    }
}
