//! Hybrid growth interpolating between scale-free and random attachment.
//!
//! Model B of "From Scale-free to Erdos-Renyi Networks": α = 0 behaves like
//! Barabási–Albert growth and α = 1 attaches uniformly.

use tracing::instrument;

use crate::{
    error::{NetgenError, Result},
    graph::{Graph, GraphBuilder},
    random::RandomSource,
};

use super::{Generator, ModelKind, check_at_least, check_probability, seed_clique};

/// Starts from a complete graph on `seed_size` vertices; each later vertex
/// attaches `edges_per_vertex` edges either uniformly (probability `alpha`)
/// or preferentially.
///
/// Preferential draws are weighted by an attachment counter, not the true
/// degree: seed vertices start at `seed_size − 1` and only preferential
/// attachments increment the counters (of the target and of the new vertex).
/// Uniform attachments leave the counters untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleFreeToRandom {
    alpha: f64,
    seed_size: usize,
    edges_per_vertex: usize,
}

impl ScaleFreeToRandom {
    /// Creates the hybrid model.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] unless `0 ≤ alpha ≤ 1`,
    /// `edges_per_vertex ≥ 1`, `seed_size ≥ 2` and
    /// `edges_per_vertex ≤ seed_size`.
    ///
    /// # Examples
    /// ```
    /// use netgen_core::{Generator, RandomSource, ScaleFreeToRandom};
    ///
    /// let mut rng = RandomSource::seed_from_u64(2);
    /// let graph = ScaleFreeToRandom::new(0.5, 4, 2)?.generate(50, &mut rng)?;
    /// assert_eq!(graph.edge_count(), 6 + 2 * 46);
    /// # Ok::<(), netgen_core::NetgenError>(())
    /// ```
    pub fn new(alpha: f64, seed_size: usize, edges_per_vertex: usize) -> Result<Self> {
        let kind = ModelKind::ScaleFreeToRandom;
        check_probability(kind, "alpha", alpha)?;
        check_at_least(kind, "edges_per_vertex", edges_per_vertex, 1)?;
        check_at_least(kind, "seed_size", seed_size, edges_per_vertex.max(2))?;
        Ok(Self {
            alpha,
            seed_size,
            edges_per_vertex,
        })
    }

    /// Returns the probability of a uniform attachment step.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
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
}

impl Generator for ScaleFreeToRandom {
    fn kind(&self) -> ModelKind {
        ModelKind::ScaleFreeToRandom
    }

    #[instrument(
        name = "netgen.generate.sf2er",
        err,
        skip(self, rng),
        fields(alpha = self.alpha, m0 = self.seed_size, m = self.edges_per_vertex),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        if self.seed_size > vertex_count {
            return Err(NetgenError::invalid(
                ModelKind::ScaleFreeToRandom,
                "seed_size",
                format!(
                    "seed of {} vertices exceeds the {vertex_count} requested",
                    self.seed_size
                ),
            ));
        }

        let mut builder = GraphBuilder::with_vertices(vertex_count, false);
        seed_clique(&mut builder, self.seed_size);
        let mut attachments = vec![0.0_f64; vertex_count];
        for counter in attachments.iter_mut().take(self.seed_size) {
            *counter = (self.seed_size - 1) as f64;
        }

        for vertex in self.seed_size..vertex_count {
            if rng.uniform() < self.alpha {
                for target in rng.choose_uniform(vertex, self.edges_per_vertex)? {
                    builder.insert_unchecked(vertex, target);
                }
            } else {
                let targets = rng.choose_weighted(&attachments[..vertex], self.edges_per_vertex)?;
                for target in targets {
                    attachments[target] += 1.0;
                    attachments[vertex] += 1.0;
                    builder.insert_unchecked(vertex, target);
                }
            }
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::test_utils::assert_simple;

    #[rstest]
    #[case::preferential(0.0)]
    #[case::mixed(0.5)]
    #[case::uniform(1.0)]
    fn every_new_vertex_adds_m_edges(#[case] alpha: f64) {
        let mut rng = RandomSource::seed_from_u64(12);
        let graph = ScaleFreeToRandom::new(alpha, 5, 3)
            .expect("valid parameters")
            .generate(80, &mut rng)
            .expect("generation succeeds");
        assert_eq!(graph.edge_count(), 10 + 3 * 75);
        assert_simple(&graph);
    }

    #[test]
    fn preferential_end_has_heavier_tail_than_uniform_end() {
        let max_degree = |alpha: f64| {
            let mut rng = RandomSource::seed_from_u64(5);
            ScaleFreeToRandom::new(alpha, 3, 2)
                .expect("valid parameters")
                .generate(1_500, &mut rng)
                .expect("generation succeeds")
                .degree_sequence()
                .iter()
                .copied()
                .max()
                .unwrap_or_default()
        };
        assert!(max_degree(0.0) > max_degree(1.0));
    }

    #[rstest]
    #[case::alpha(1.2, 4, 2)]
    #[case::zero_m(0.5, 4, 0)]
    #[case::tiny_seed(0.5, 1, 1)]
    #[case::m_above_seed(0.5, 3, 4)]
    fn rejects_invalid_parameters(#[case] alpha: f64, #[case] seed: usize, #[case] m: usize) {
        let err = ScaleFreeToRandom::new(alpha, seed, m).expect_err("parameters must be rejected");
        assert!(matches!(err, NetgenError::InvalidModelParameter { .. }));
    }

    #[test]
    fn rejects_seed_larger_than_graph() {
        let mut rng = RandomSource::seed_from_u64(1);
        let err = ScaleFreeToRandom::new(0.5, 6, 2)
            .expect("valid parameters")
            .generate(4, &mut rng)
            .expect_err("seed exceeds vertex count");
        assert!(matches!(err, NetgenError::InvalidModelParameter { .. }));
    }
}
