//! Erdős–Rényi `G(n, p)` and its average-degree variant.

use tracing::instrument;

use crate::{
    error::{NetgenError, Result},
    graph::{Graph, GraphBuilder},
    random::RandomSource,
};

use super::{Generator, ModelKind, check_non_negative, check_probability};

/// Connects every pair independently with a fixed probability.
///
/// With `force_connected`, a vertex still isolated after all of its trials is
/// attached to one uniformly chosen partner. That guarantees a minimum degree
/// of one, not a single component: isolated vertices forced together can form
/// separate clusters.
///
/// # Examples
/// ```
/// use netgen_core::{ErdosRenyi, Generator, RandomSource};
///
/// let mut rng = RandomSource::seed_from_u64(1);
/// let complete = ErdosRenyi::new(1.0)?.generate(5, &mut rng)?;
/// assert_eq!(complete.edge_count(), 10);
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ErdosRenyi {
    probability: f64,
    directed: bool,
    force_connected: bool,
}

impl ErdosRenyi {
    /// Creates an undirected model with connection probability `probability`.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] unless
    /// `0 ≤ probability ≤ 1`.
    pub fn new(probability: f64) -> Result<Self> {
        check_probability(ModelKind::ErdosRenyi, "probability", probability)?;
        Ok(Self {
            probability,
            directed: false,
            force_connected: false,
        })
    }

    /// Generates ordered pairs instead of unordered ones.
    #[must_use]
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Attaches vertices left isolated after their trials.
    #[must_use]
    pub fn with_force_connected(mut self, force_connected: bool) -> Self {
        self.force_connected = force_connected;
        self
    }

    /// Returns the connection probability.
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Returns whether edges are ordered pairs.
    #[must_use]
    pub fn directed(&self) -> bool {
        self.directed
    }

    /// Returns whether isolated vertices are attached after their trials.
    #[must_use]
    pub fn force_connected(&self) -> bool {
        self.force_connected
    }
}

impl Generator for ErdosRenyi {
    fn kind(&self) -> ModelKind {
        ModelKind::ErdosRenyi
    }

    #[instrument(
        name = "netgen.generate.er",
        err,
        skip(self, rng),
        fields(p = self.probability, directed = self.directed, force_connected = self.force_connected),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        let mut builder = GraphBuilder::with_vertices(vertex_count, self.directed);
        for source in 0..vertex_count {
            let first_target = if self.directed { 0 } else { source + 1 };
            for target in first_target..vertex_count {
                if target != source && rng.bernoulli(self.probability) {
                    builder.insert_unchecked(source, target);
                }
            }
            if self.force_connected && vertex_count > 1 && builder.degrees()[source] == 0 {
                let partner = uniform_partner(source, vertex_count, rng)?;
                builder.insert_unchecked(source, partner);
            }
        }
        Ok(builder.build())
    }
}

/// Picks a vertex other than `vertex` uniformly from `0..vertex_count`.
fn uniform_partner(vertex: usize, vertex_count: usize, rng: &mut RandomSource) -> Result<usize> {
    let draw = rng.index(vertex_count - 1)?;
    Ok(if draw >= vertex { draw + 1 } else { draw })
}

/// Erdős–Rényi with the connection probability derived in closed form from a
/// target average degree; no calibration search is needed.
///
/// The probability is `k̄/(n−1)` for undirected graphs and `k̄/(2(n−1))` for
/// directed ones, so the expected `2·|E|/n` equals the target in both modes.
///
/// For directed graphs the target is the total degree, in-degree plus
/// out-degree, not the out-degree: a target of 8 yields about 4 outgoing
/// edges per vertex. Pass twice the desired out-degree to target out-degree.
#[derive(Clone, Debug, PartialEq)]
pub struct ErdosRenyiAverage {
    average_degree: f64,
    directed: bool,
    force_connected: bool,
}

impl ErdosRenyiAverage {
    /// Creates an undirected model targeting `average_degree`.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] when the target is
    /// negative or not finite.
    pub fn new(average_degree: f64) -> Result<Self> {
        check_non_negative(ModelKind::ErdosRenyiAverage, "average_degree", average_degree)?;
        Ok(Self {
            average_degree,
            directed: false,
            force_connected: false,
        })
    }

    /// Generates ordered pairs instead of unordered ones; the target then
    /// counts in-degree plus out-degree.
    #[must_use]
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Attaches vertices left isolated after their trials.
    #[must_use]
    pub fn with_force_connected(mut self, force_connected: bool) -> Self {
        self.force_connected = force_connected;
        self
    }

    /// Returns the target average degree.
    #[must_use]
    pub fn average_degree(&self) -> f64 {
        self.average_degree
    }

    /// Returns the connection probability used for `vertex_count` vertices.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] when the target needs a
    /// probability above one.
    ///
    /// # Examples
    /// ```
    /// use netgen_core::ErdosRenyiAverage;
    ///
    /// let model = ErdosRenyiAverage::new(4.0)?;
    /// assert!((model.probability_for(101)? - 0.04).abs() < 1e-12);
    /// let directed = model.with_directed(true);
    /// assert!((directed.probability_for(101)? - 0.02).abs() < 1e-12);
    /// # Ok::<(), netgen_core::NetgenError>(())
    /// ```
    pub fn probability_for(&self, vertex_count: usize) -> Result<f64> {
        if vertex_count < 2 {
            return Ok(0.0);
        }
        let coefficient = if self.directed { 0.5 } else { 1.0 };
        let probability = coefficient * self.average_degree / (vertex_count - 1) as f64;
        if probability > 1.0 {
            return Err(NetgenError::invalid(
                ModelKind::ErdosRenyiAverage,
                "average_degree",
                format!(
                    "average degree {} is unreachable with {vertex_count} vertices",
                    self.average_degree
                ),
            ));
        }
        Ok(probability)
    }
}

impl Generator for ErdosRenyiAverage {
    fn kind(&self) -> ModelKind {
        ModelKind::ErdosRenyiAverage
    }

    #[instrument(
        name = "netgen.generate.er_avg",
        err,
        skip(self, rng),
        fields(average_degree = self.average_degree, directed = self.directed),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        let probability = self.probability_for(vertex_count)?;
        ErdosRenyi {
            probability,
            directed: self.directed,
            force_connected: self.force_connected,
        }
        .generate(vertex_count, rng)
    }
}
