//! Waxman spatial graphs and their calibrated average-degree variant.

use std::f64::consts::SQRT_2;

use tracing::instrument;

use crate::{
    calibrate::{
        CalibrationOutcome, CalibrationRequest, Calibrator, DEFAULT_MAX_CONNECTIVITY_RETRIES,
        DEFAULT_MAX_PROBES, DEFAULT_TOLERANCE, DensityModel,
    },
    error::{NetgenError, Result},
    graph::{Graph, GraphBuilder, Point, random_positions},
    random::RandomSource,
};

use super::{Generator, ModelKind, check_at_least, check_non_negative, check_positive};

/// Vertices get uniform coordinates in the unit square and each pair is
/// joined with probability `β·exp(−d/(√2·α))`.
///
/// `alpha` sets how fast the probability decays with distance and `beta` the
/// overall density. A pair whose probability exceeds one aborts generation
/// rather than being clamped, so large `beta` values fail.
///
/// With `force_connected`, each vertex still isolated after the scan picks a
/// partner with probability proportional to `exp(−d/(√2·α))`.
///
/// # Examples
/// ```
/// use netgen_core::{Generator, RandomSource, Waxman};
///
/// let mut rng = RandomSource::seed_from_u64(8);
/// let graph = Waxman::new(0.2, 0.3)?.generate(100, &mut rng)?;
/// assert_eq!(graph.positions().map(<[_]>::len), Some(100));
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Waxman {
    alpha: f64,
    beta: f64,
    force_connected: bool,
}

impl Waxman {
    /// Creates a model with decay `alpha` and density `beta`.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] when `alpha` is not
    /// positive or `beta` is negative.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        check_positive(ModelKind::Waxman, "alpha", alpha)?;
        check_non_negative(ModelKind::Waxman, "beta", beta)?;
        Ok(Self {
            alpha,
            beta,
            force_connected: false,
        })
    }

    /// Attaches vertices left isolated after the scan.
    #[must_use]
    pub fn with_force_connected(mut self, force_connected: bool) -> Self {
        self.force_connected = force_connected;
        self
    }

    /// Returns the distance decay.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the density factor.
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Returns whether isolated vertices are attached after the scan.
    #[must_use]
    pub fn force_connected(&self) -> bool {
        self.force_connected
    }

    fn run(&self, kind: ModelKind, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        let positions = random_positions(vertex_count, rng);
        let scale = SQRT_2 * self.alpha;
        let mut builder = GraphBuilder::with_vertices(vertex_count, false);

        for source in 0..vertex_count {
            for target in (source + 1)..vertex_count {
                let distance = positions[source].distance(&positions[target]);
                let probability = self.beta * (-distance / scale).exp();
                if probability > 1.0 {
                    return Err(NetgenError::invalid(
                        kind,
                        "beta",
                        format!(
                            "connection probability {probability:.3} exceeds 1 at distance \
                             {distance:.4}; beta is too large for alpha {}",
                            self.alpha
                        ),
                    ));
                }
                if rng.bernoulli(probability) {
                    builder.insert_unchecked(source, target);
                }
            }
        }

        if self.force_connected && vertex_count > 1 {
            attach_isolated(&mut builder, &positions, scale, rng)?;
        }
        builder.attach_positions(positions);
        Ok(builder.build())
    }
}

/// Gives every isolated vertex one partner weighted by the distance kernel.
fn attach_isolated(
    builder: &mut GraphBuilder,
    positions: &[Point],
    scale: f64,
    rng: &mut RandomSource,
) -> Result<()> {
    let mut weights = vec![0.0; positions.len()];
    for vertex in 0..positions.len() {
        if builder.degrees()[vertex] > 0 {
            continue;
        }
        for (other, weight) in weights.iter_mut().enumerate() {
            *weight = if other == vertex {
                0.0
            } else {
                (-positions[vertex].distance(&positions[other]) / scale).exp()
            };
        }
        if let Some(&partner) = rng.choose_weighted(&weights, 1)?.first() {
            builder.insert_unchecked(vertex, partner);
        }
    }
    Ok(())
}

impl Generator for Waxman {
    fn kind(&self) -> ModelKind {
        ModelKind::Waxman
    }

    #[instrument(
        name = "netgen.generate.waxman",
        err,
        skip(self, rng),
        fields(alpha = self.alpha, beta = self.beta, force_connected = self.force_connected),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        self.run(ModelKind::Waxman, vertex_count, rng)
    }
}

/// Waxman with `beta` searched over `[0, 1]` until the realized average
/// degree is within `tolerance` of the target.
///
/// With `force_connected`, isolated vertices are attached during every probe
/// and the converged density is regenerated, at most
/// `max_connectivity_retries` times, until the graph is connected.
#[derive(Clone, Debug, PartialEq)]
pub struct WaxmanAverage {
    average_degree: f64,
    alpha: f64,
    force_connected: bool,
    tolerance: f64,
    max_probes: usize,
    max_connectivity_retries: usize,
}

impl WaxmanAverage {
    /// Creates a model targeting `average_degree` with decay `alpha` and the
    /// default search budgets.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] for a non-positive
    /// target or decay.
    pub fn new(average_degree: f64, alpha: f64) -> Result<Self> {
        let kind = ModelKind::WaxmanAverage;
        check_positive(kind, "average_degree", average_degree)?;
        check_positive(kind, "alpha", alpha)?;
        Ok(Self {
            average_degree,
            alpha,
            force_connected: false,
            tolerance: DEFAULT_TOLERANCE,
            max_probes: DEFAULT_MAX_PROBES,
            max_connectivity_retries: DEFAULT_MAX_CONNECTIVITY_RETRIES,
        })
    }

    /// Attaches isolated vertices and insists on a connected result.
    #[must_use]
    pub fn with_force_connected(mut self, force_connected: bool) -> Self {
        self.force_connected = force_connected;
        self
    }

    /// Sets the relative tolerance on the realized average degree.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] unless the tolerance is
    /// positive and finite.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        check_positive(ModelKind::WaxmanAverage, "tolerance", tolerance)?;
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Sets the probe budget.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] for a zero budget.
    pub fn with_max_probes(mut self, max_probes: usize) -> Result<Self> {
        check_at_least(ModelKind::WaxmanAverage, "max_probes", max_probes, 1)?;
        self.max_probes = max_probes;
        Ok(self)
    }

    /// Sets how many regenerations may be spent waiting for connectivity.
    #[must_use]
    pub fn with_max_connectivity_retries(mut self, retries: usize) -> Self {
        self.max_connectivity_retries = retries;
        self
    }

    /// Returns the target average degree.
    #[must_use]
    pub fn average_degree(&self) -> f64 {
        self.average_degree
    }

    /// Builds the calibration request carried by this record.
    #[must_use]
    pub fn request(&self) -> CalibrationRequest {
        CalibrationRequest::new(self.average_degree)
            .with_tolerance(self.tolerance)
            .with_max_probes(self.max_probes)
            .with_require_connected(self.force_connected)
            .with_max_connectivity_retries(self.max_connectivity_retries)
    }

    /// Runs the search and returns the accepted graph with the chosen `beta`.
    ///
    /// # Errors
    /// See [`Calibrator::run`].
    pub fn calibrate(
        &self,
        vertex_count: usize,
        rng: &mut RandomSource,
    ) -> Result<CalibrationOutcome> {
        Calibrator::new(self, self.request()).run(vertex_count, rng)
    }
}

impl DensityModel for WaxmanAverage {
    fn kind(&self) -> ModelKind {
        ModelKind::WaxmanAverage
    }

    fn density_bounds(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn generate_at(
        &self,
        density: f64,
        vertex_count: usize,
        rng: &mut RandomSource,
    ) -> Result<Graph> {
        Waxman {
            alpha: self.alpha,
            beta: density,
            force_connected: self.force_connected,
        }
        .run(ModelKind::WaxmanAverage, vertex_count, rng)
    }
}

impl Generator for WaxmanAverage {
    fn kind(&self) -> ModelKind {
        ModelKind::WaxmanAverage
    }

    #[instrument(
        name = "netgen.generate.waxman_avg",
        err,
        skip(self, rng),
        fields(average_degree = self.average_degree, alpha = self.alpha),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        self.calibrate(vertex_count, rng)
            .map(CalibrationOutcome::into_graph)
    }
}
