//! Spatial scale-free growth: preferential attachment damped by distance.

use tracing::instrument;

use crate::{
    error::{NetgenError, Result},
    graph::{Graph, GraphBuilder, random_positions},
    random::RandomSource,
};

use super::{Generator, ModelKind, check_at_least, check_positive, half_degree, seed_clique};

/// Seeds a complete graph on `seed_size` vertices, then lets every later
/// vertex `i` attach `edges_per_vertex` edges to distinct earlier vertices
/// `j` drawn with weight `(degree(j) + 1)·exp(−d(i, j)/decay_radius)`.
///
/// Very small radii can drive every weight to zero in floating point, in
/// which case generation fails with [`NetgenError::InvalidDistribution`].
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialScaleFree {
    seed_size: usize,
    edges_per_vertex: usize,
    decay_radius: f64,
}

impl SpatialScaleFree {
    /// Creates the model.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] unless
    /// `1 ≤ edges_per_vertex ≤ seed_size` and `decay_radius > 0`.
    pub fn new(seed_size: usize, edges_per_vertex: usize, decay_radius: f64) -> Result<Self> {
        Self::validated(
            ModelKind::SpatialScaleFree,
            seed_size,
            edges_per_vertex,
            decay_radius,
        )
    }

    fn validated(
        kind: ModelKind,
        seed_size: usize,
        edges_per_vertex: usize,
        decay_radius: f64,
    ) -> Result<Self> {
        check_at_least(kind, "edges_per_vertex", edges_per_vertex, 1)?;
        check_at_least(kind, "seed_size", seed_size, edges_per_vertex)?;
        check_positive(kind, "decay_radius", decay_radius)?;
        Ok(Self {
            seed_size,
            edges_per_vertex,
            decay_radius,
        })
    }

    /// Returns the size of the initial complete graph.
    #[must_use]
    pub fn seed_size(&self) -> usize {
        self.seed_size
    }

    /// Returns the number of edges attached per new vertex.
    #[must_use]
    pub fn edges_per_vertex(&self) -> usize {
        self.edges_per_vertex
    }

    /// Returns the distance decay radius.
    #[must_use]
    pub fn decay_radius(&self) -> f64 {
        self.decay_radius
    }

    fn run(&self, kind: ModelKind, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        if self.seed_size > vertex_count {
            return Err(NetgenError::invalid(
                kind,
                "seed_size",
                format!(
                    "seed of {} vertices exceeds the {vertex_count} requested",
                    self.seed_size
                ),
            ));
        }

        let positions = random_positions(vertex_count, rng);
        let mut builder = GraphBuilder::with_vertices(vertex_count, false);
        seed_clique(&mut builder, self.seed_size);

        let mut weights = Vec::with_capacity(vertex_count);
        for vertex in self.seed_size..vertex_count {
            weights.clear();
            weights.extend((0..vertex).map(|earlier| {
                let distance = positions[vertex].distance(&positions[earlier]);
                (builder.degrees()[earlier] as f64 + 1.0) * (-distance / self.decay_radius).exp()
            }));
            for target in rng.choose_weighted(&weights, self.edges_per_vertex)? {
                builder.insert_unchecked(vertex, target);
            }
        }
        builder.attach_positions(positions);
        Ok(builder.build())
    }
}

impl Generator for SpatialScaleFree {
    fn kind(&self) -> ModelKind {
        ModelKind::SpatialScaleFree
    }

    #[instrument(
        name = "netgen.generate.spatial_sf",
        err,
        skip(self, rng),
        fields(n0 = self.seed_size, m = self.edges_per_vertex, rc = self.decay_radius),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        self.run(ModelKind::SpatialScaleFree, vertex_count, rng)
    }
}

/// Spatial scale-free growth where both the seed size and the edges per
/// vertex are half the target average degree, rounded and at least one.
///
/// # Examples
/// ```
/// use netgen_core::SpatialScaleFreeAverage;
///
/// let model = SpatialScaleFreeAverage::new(6.0, 0.1)?;
/// assert_eq!(model.edges_per_vertex(), 3);
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialScaleFreeAverage {
    inner: SpatialScaleFree,
    average_degree: f64,
}

impl SpatialScaleFreeAverage {
    /// Creates a model targeting `average_degree`.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] for a non-positive
    /// target or radius.
    pub fn new(average_degree: f64, decay_radius: f64) -> Result<Self> {
        let kind = ModelKind::SpatialScaleFreeAverage;
        let half = half_degree(kind, average_degree)?;
        Ok(Self {
            inner: SpatialScaleFree::validated(kind, half, half, decay_radius)?,
            average_degree,
        })
    }

    /// Returns the derived number of edges per new vertex, which is also the
    /// seed size.
    #[must_use]
    pub fn edges_per_vertex(&self) -> usize {
        self.inner.edges_per_vertex
    }
}

impl Generator for SpatialScaleFreeAverage {
    fn kind(&self) -> ModelKind {
        ModelKind::SpatialScaleFreeAverage
    }

    #[instrument(
        name = "netgen.generate.spatial_sf_avg",
        err,
        skip(self, rng),
        fields(average_degree = self.average_degree, m = self.inner.edges_per_vertex),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        self.inner
            .run(ModelKind::SpatialScaleFreeAverage, vertex_count, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::test_utils::assert_simple;

    #[rstest]
    #[case(3, 2, 0.1)]
    #[case(4, 4, 0.5)]
    #[case(1, 1, 0.05)]
    fn growth_adds_m_edges_after_seed(
        #[case] seed_size: usize,
        #[case] edges_per_vertex: usize,
        #[case] decay_radius: f64,
    ) {
        let mut rng = RandomSource::seed_from_u64(23);
        let vertex_count = 150;
        let graph = SpatialScaleFree::new(seed_size, edges_per_vertex, decay_radius)
            .expect("valid parameters")
            .generate(vertex_count, &mut rng)
            .expect("generation succeeds");
        let seed_edges = seed_size * (seed_size - 1) / 2;
        assert_eq!(
            graph.edge_count(),
            seed_edges + edges_per_vertex * (vertex_count - seed_size)
        );
        assert!(graph.is_connected());
        assert_eq!(graph.positions().map(<[_]>::len), Some(vertex_count));
        assert_simple(&graph);
    }

    #[rstest]
    #[case::zero_m(3, 0, 0.1)]
    #[case::m_above_seed(2, 3, 0.1)]
    #[case::radius(3, 2, 0.0)]
    fn rejects_invalid_parameters(
        #[case] seed_size: usize,
        #[case] edges_per_vertex: usize,
        #[case] decay_radius: f64,
    ) {
        let err = SpatialScaleFree::new(seed_size, edges_per_vertex, decay_radius)
            .expect_err("parameters must be rejected");
        assert!(matches!(err, NetgenError::InvalidModelParameter { .. }));
    }

    #[test]
    fn short_radius_prefers_nearby_targets() {
        let mut rng = RandomSource::seed_from_u64(41);
        let graph = SpatialScaleFree::new(2, 1, 0.05)
            .expect("valid parameters")
            .generate(400, &mut rng)
            .expect("generation succeeds");
        let positions = graph.positions().expect("positions recorded");
        let mean_edge_length = graph
            .edges()
            .iter()
            .map(|edge| positions[edge.source()].distance(&positions[edge.target()]))
            .sum::<f64>()
            / graph.edge_count() as f64;
        assert!(mean_edge_length < 0.25, "mean edge length {mean_edge_length}");
    }

    #[test]
    fn average_variant_lands_near_target() {
        let mut rng = RandomSource::seed_from_u64(2);
        let graph = SpatialScaleFreeAverage::new(6.0, 0.2)
            .expect("valid parameters")
            .generate(500, &mut rng)
            .expect("generation succeeds");
        // 3 seed edges plus 3 per later vertex
        assert_eq!(graph.edge_count(), 3 + 3 * 497);
    }
}
