//! Watts–Strogatz small-world graphs.

use std::collections::HashSet;

use tracing::instrument;

use crate::{
    error::{NetgenError, Result},
    graph::{Graph, GraphBuilder},
    random::RandomSource,
};

use super::{Generator, ModelKind, check_at_least, check_probability, half_degree};

/// Ring lattice with `radius` neighbours on each side whose edges are
/// rewired independently with probability `rewiring_probability`.
///
/// A rewired edge `(u, v)` keeps `u` and moves its other end to a uniformly
/// chosen vertex that is neither `u` nor already adjacent to `u`, so the edge
/// count is preserved and no multi-edges or self-loops appear.
#[derive(Clone, Debug, PartialEq)]
pub struct WattsStrogatz {
    radius: usize,
    rewiring_probability: f64,
}

impl WattsStrogatz {
    /// Creates a model with the given lattice radius and rewiring probability.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] when `radius` is zero or
    /// the probability lies outside `[0, 1]`.
    pub fn new(radius: usize, rewiring_probability: f64) -> Result<Self> {
        Self::validated(ModelKind::WattsStrogatz, radius, rewiring_probability)
    }

    fn validated(kind: ModelKind, radius: usize, rewiring_probability: f64) -> Result<Self> {
        check_at_least(kind, "radius", radius, 1)?;
        check_probability(kind, "rewiring_probability", rewiring_probability)?;
        Ok(Self {
            radius,
            rewiring_probability,
        })
    }

    /// Returns the number of lattice neighbours on each side.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Returns the per-edge rewiring probability.
    #[must_use]
    pub fn rewiring_probability(&self) -> f64 {
        self.rewiring_probability
    }

    fn run(&self, kind: ModelKind, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        let fits = self
            .radius
            .checked_mul(2)
            .is_some_and(|span| vertex_count > span);
        if !fits {
            return Err(NetgenError::invalid(
                kind,
                "radius",
                format!(
                    "a ring of {vertex_count} vertices cannot hold {} neighbours per side",
                    self.radius
                ),
            ));
        }

        let mut lattice = Vec::with_capacity(vertex_count * self.radius);
        let mut adjacency = vec![HashSet::new(); vertex_count];
        for source in 0..vertex_count {
            for offset in 1..=self.radius {
                let target = (source + offset) % vertex_count;
                lattice.push((source, target));
                adjacency[source].insert(target);
                adjacency[target].insert(source);
            }
        }

        for edge in &mut lattice {
            if !rng.bernoulli(self.rewiring_probability) {
                continue;
            }
            let (anchor, old_target) = *edge;
            let candidates: Vec<usize> = (0..vertex_count)
                .filter(|&vertex| vertex != anchor && !adjacency[anchor].contains(&vertex))
                .collect();
            if candidates.is_empty() {
                continue;
            }
            let new_target = candidates[rng.index(candidates.len())?];
            adjacency[anchor].remove(&old_target);
            adjacency[old_target].remove(&anchor);
            adjacency[anchor].insert(new_target);
            adjacency[new_target].insert(anchor);
            *edge = (anchor, new_target);
        }

        let mut builder = GraphBuilder::with_vertices(vertex_count, false);
        for (source, target) in lattice {
            builder.insert_unchecked(source, target);
        }
        Ok(builder.build())
    }
}

impl Generator for WattsStrogatz {
    fn kind(&self) -> ModelKind {
        ModelKind::WattsStrogatz
    }

    #[instrument(
        name = "netgen.generate.ws",
        err,
        skip(self, rng),
        fields(radius = self.radius, p = self.rewiring_probability),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        self.run(ModelKind::WattsStrogatz, vertex_count, rng)
    }
}

/// Watts–Strogatz whose radius is the target average degree halved and
/// rounded, since every lattice vertex has degree `2·radius`.
#[derive(Clone, Debug, PartialEq)]
pub struct WattsStrogatzAverage {
    inner: WattsStrogatz,
    average_degree: f64,
}

impl WattsStrogatzAverage {
    /// Creates a model targeting `average_degree`.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] for a non-positive
    /// target or an out-of-range probability.
    ///
    /// # Examples
    /// ```
    /// use netgen_core::WattsStrogatzAverage;
    ///
    /// assert_eq!(WattsStrogatzAverage::new(6.0, 0.1)?.radius(), 3);
    /// assert_eq!(WattsStrogatzAverage::new(1.0, 0.1)?.radius(), 1);
    /// # Ok::<(), netgen_core::NetgenError>(())
    /// ```
    pub fn new(average_degree: f64, rewiring_probability: f64) -> Result<Self> {
        let kind = ModelKind::WattsStrogatzAverage;
        let radius = half_degree(kind, average_degree)?;
        Ok(Self {
            inner: WattsStrogatz::validated(kind, radius, rewiring_probability)?,
            average_degree,
        })
    }

    /// Returns the lattice radius derived from the target.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.inner.radius
    }

    /// Returns the target average degree.
    #[must_use]
    pub fn average_degree(&self) -> f64 {
        self.average_degree
    }
}

impl Generator for WattsStrogatzAverage {
    fn kind(&self) -> ModelKind {
        ModelKind::WattsStrogatzAverage
    }

    #[instrument(
        name = "netgen.generate.ws_avg",
        err,
        skip(self, rng),
        fields(average_degree = self.average_degree, radius = self.inner.radius),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        self.inner
            .run(ModelKind::WattsStrogatzAverage, vertex_count, rng)
    }
}
