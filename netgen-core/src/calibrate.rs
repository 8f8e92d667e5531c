//! Bounded search for the density parameter that yields a target average
//! degree.
//!
//! Models without a closed form relating their density parameter to the
//! average degree implement [`DensityModel`]; a [`Calibrator`] then probes
//! that parameter, regenerating the whole graph at each probe, until the
//! realized `2·|E|/n` is within a relative tolerance of the target or the
//! probe budget is spent.

use tracing::{debug, info, instrument};

use crate::{
    error::{NetgenError, Result},
    graph::Graph,
    models::ModelKind,
    random::RandomSource,
};

/// Default relative tolerance on the realized average degree.
pub const DEFAULT_TOLERANCE: f64 = 0.05;
/// Default number of graphs generated during the search.
pub const DEFAULT_MAX_PROBES: usize = 32;
/// Default number of regenerations while waiting for a connected graph.
pub const DEFAULT_MAX_CONNECTIVITY_RETRIES: usize = 16;

/// A model whose average degree grows with a single density parameter.
pub trait DensityModel {
    /// Identifies the model being calibrated.
    fn kind(&self) -> ModelKind;

    /// Returns the inclusive range the density parameter may take.
    fn density_bounds(&self) -> (f64, f64);

    /// Generates a graph with the density parameter set to `density`.
    ///
    /// # Errors
    /// Propagates the underlying generator's failure.
    fn generate_at(
        &self,
        density: f64,
        vertex_count: usize,
        rng: &mut RandomSource,
    ) -> Result<Graph>;
}

/// Target and budgets for one calibration run.
///
/// # Examples
/// ```
/// use netgen_core::CalibrationRequest;
///
/// let request = CalibrationRequest::new(6.0)
///     .with_tolerance(0.1)
///     .with_max_probes(20)
///     .with_require_connected(true);
/// assert_eq!(request.max_probes(), 20);
/// assert!(request.require_connected());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CalibrationRequest {
    target: f64,
    tolerance: f64,
    max_probes: usize,
    require_connected: bool,
    max_connectivity_retries: usize,
}

impl CalibrationRequest {
    /// Creates a request for `target` average degree with default budgets.
    #[must_use]
    pub fn new(target: f64) -> Self {
        Self {
            target,
            tolerance: DEFAULT_TOLERANCE,
            max_probes: DEFAULT_MAX_PROBES,
            require_connected: false,
            max_connectivity_retries: DEFAULT_MAX_CONNECTIVITY_RETRIES,
        }
    }

    /// Sets the relative tolerance `ε`.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of probes.
    #[must_use]
    pub fn with_max_probes(mut self, max_probes: usize) -> Self {
        self.max_probes = max_probes;
        self
    }

    /// Requires the accepted graph to be connected.
    #[must_use]
    pub fn with_require_connected(mut self, require_connected: bool) -> Self {
        self.require_connected = require_connected;
        self
    }

    /// Sets how many times the converged density may be regenerated while
    /// waiting for a connected graph.
    #[must_use]
    pub fn with_max_connectivity_retries(mut self, retries: usize) -> Self {
        self.max_connectivity_retries = retries;
        self
    }

    /// Returns the target average degree.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> f64 { self.target }

    /// Returns the relative tolerance.
    #[must_use]
    #[rustfmt::skip]
    pub fn tolerance(&self) -> f64 { self.tolerance }

    /// Returns the probe budget.
    #[must_use]
    #[rustfmt::skip]
    pub fn max_probes(&self) -> usize { self.max_probes }

    /// Returns whether a connected graph is required.
    #[must_use]
    #[rustfmt::skip]
    pub fn require_connected(&self) -> bool { self.require_connected }

    /// Returns the connectivity retry budget.
    #[must_use]
    #[rustfmt::skip]
    pub fn max_connectivity_retries(&self) -> usize { self.max_connectivity_retries }

    fn validate(&self, model: ModelKind) -> Result<()> {
        if !(self.target.is_finite() && self.target > 0.0) {
            return Err(NetgenError::invalid(
                model,
                "average_degree",
                format!("must be positive and finite (got {})", self.target),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(NetgenError::invalid(
                model,
                "tolerance",
                format!("must be positive and finite (got {})", self.tolerance),
            ));
        }
        if self.max_probes == 0 {
            return Err(NetgenError::invalid(model, "max_probes", "must be at least 1"));
        }
        Ok(())
    }
}

/// Where a [`Calibrator`] stands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CalibrationState {
    /// Probes remain and the target has not been reached.
    Searching,
    /// A probe landed within tolerance.
    Converged,
    /// The probe budget ran out first.
    Exhausted,
}

/// A successful calibration.
#[derive(Clone, Debug)]
pub struct CalibrationOutcome {
    graph: Graph,
    density: f64,
    probes: usize,
    connectivity_attempts: usize,
}

impl CalibrationOutcome {
    /// Returns the accepted graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn graph(&self) -> &Graph { &self.graph }

    /// Consumes the outcome and returns the accepted graph.
    #[must_use]
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Returns the density parameter the search settled on.
    #[must_use]
    #[rustfmt::skip]
    pub fn density(&self) -> f64 { self.density }

    /// Returns the number of search probes spent.
    #[must_use]
    #[rustfmt::skip]
    pub fn probes(&self) -> usize { self.probes }

    /// Returns how many graphs were inspected for connectivity; zero when
    /// connectivity was not required.
    #[must_use]
    pub fn connectivity_attempts(&self) -> usize {
        self.connectivity_attempts
    }
}

/// Drives a [`DensityModel`] toward a target average degree.
///
/// The search probes both ends of the density range, then a linear
/// interpolation between them, then bisects the bracket: a probe below the
/// target raises the lower bound, any other probe lowers the upper bound.
///
/// # Examples
/// ```
/// use netgen_core::{CalibrationRequest, CalibrationState, Calibrator, RandomSource, WaxmanAverage};
///
/// let model = WaxmanAverage::new(6.0, 0.2)?;
/// let mut calibrator = Calibrator::new(&model, CalibrationRequest::new(6.0).with_tolerance(0.15));
/// let mut rng = RandomSource::seed_from_u64(4);
/// let outcome = calibrator.run(200, &mut rng)?;
/// assert_eq!(calibrator.state(), CalibrationState::Converged);
/// assert!((outcome.graph().average_degree() - 6.0).abs() < 0.9);
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[derive(Debug)]
pub struct Calibrator<'m, M: ?Sized> {
    model: &'m M,
    request: CalibrationRequest,
    state: CalibrationState,
    probes: usize,
    closest: Option<f64>,
}

impl<'m, M: DensityModel + ?Sized> Calibrator<'m, M> {
    /// Creates a calibrator in the [`CalibrationState::Searching`] state.
    #[must_use]
    pub fn new(model: &'m M, request: CalibrationRequest) -> Self {
        Self {
            model,
            request,
            state: CalibrationState::Searching,
            probes: 0,
            closest: None,
        }
    }

    /// Returns the current state.
    #[must_use]
    #[rustfmt::skip]
    pub fn state(&self) -> CalibrationState { self.state }

    /// Returns the number of probes spent so far.
    #[must_use]
    #[rustfmt::skip]
    pub fn probes(&self) -> usize { self.probes }

    /// Runs the search and, when requested, the connectivity phase.
    ///
    /// # Errors
    /// - [`NetgenError::InvalidModelParameter`] for an invalid request.
    /// - [`NetgenError::CalibrationExhausted`] when the probe budget runs out.
    /// - [`NetgenError::ConnectivityUnattained`] when no connected graph
    ///   appears within the retry budget.
    /// - Any error raised by the model itself.
    #[instrument(
        name = "netgen.calibrate",
        err,
        skip(self, rng),
        fields(
            model = %self.model.kind(),
            target = self.request.target,
            tolerance = self.request.tolerance,
            max_probes = self.request.max_probes,
        ),
    )]
    pub fn run(
        &mut self,
        vertex_count: usize,
        rng: &mut RandomSource,
    ) -> Result<CalibrationOutcome> {
        self.request.validate(self.model.kind())?;
        let (density, graph) = self.search(vertex_count, rng)?;
        self.connect(density, graph, vertex_count, rng)
    }

    fn search(&mut self, vertex_count: usize, rng: &mut RandomSource) -> Result<(f64, Graph)> {
        let (mut low, mut high) = self.model.density_bounds();

        let (low_degree, graph) = self.probe(low, vertex_count, rng)?;
        if self.converged(low_degree) {
            return Ok(self.converge(low, graph));
        }
        if self.probes >= self.request.max_probes {
            return Err(self.exhaust());
        }

        let (high_degree, graph) = self.probe(high, vertex_count, rng)?;
        if self.converged(high_degree) {
            return Ok(self.converge(high, graph));
        }

        let mut next = interpolate(
            (low, low_degree),
            (high, high_degree),
            self.request.target,
        );
        while self.probes < self.request.max_probes {
            let (realized, graph) = self.probe(next, vertex_count, rng)?;
            if self.converged(realized) {
                return Ok(self.converge(next, graph));
            }
            if realized < self.request.target {
                low = next;
            } else {
                high = next;
            }
            next = 0.5 * (low + high);
        }
        Err(self.exhaust())
    }

    fn probe(
        &mut self,
        density: f64,
        vertex_count: usize,
        rng: &mut RandomSource,
    ) -> Result<(f64, Graph)> {
        let graph = self.model.generate_at(density, vertex_count, rng)?;
        self.probes += 1;
        let realized = graph.average_degree();
        let target = self.request.target;
        if self
            .closest
            .is_none_or(|best| (realized - target).abs() < (best - target).abs())
        {
            self.closest = Some(realized);
        }
        debug!(probe = self.probes, density, realized, "calibration probe");
        Ok((realized, graph))
    }

    fn converged(&self, realized: f64) -> bool {
        (realized - self.request.target).abs() / self.request.target < self.request.tolerance
    }

    fn converge(&mut self, density: f64, graph: Graph) -> (f64, Graph) {
        self.state = CalibrationState::Converged;
        info!(
            probes = self.probes,
            density,
            realized = graph.average_degree(),
            "calibration converged"
        );
        (density, graph)
    }

    fn exhaust(&mut self) -> NetgenError {
        self.state = CalibrationState::Exhausted;
        NetgenError::CalibrationExhausted {
            model: self.model.kind(),
            target: self.request.target,
            closest: self.closest.unwrap_or_default(),
            probes: self.probes,
        }
    }

    fn connect(
        &self,
        density: f64,
        graph: Graph,
        vertex_count: usize,
        rng: &mut RandomSource,
    ) -> Result<CalibrationOutcome> {
        let outcome = |graph, connectivity_attempts| CalibrationOutcome {
            graph,
            density,
            probes: self.probes,
            connectivity_attempts,
        };
        if !self.request.require_connected {
            return Ok(outcome(graph, 0));
        }
        if graph.is_connected() {
            return Ok(outcome(graph, 1));
        }
        for retry in 1..=self.request.max_connectivity_retries {
            let candidate = self.model.generate_at(density, vertex_count, rng)?;
            debug!(retry, components = candidate.component_count(), "connectivity retry");
            if candidate.is_connected() {
                return Ok(outcome(candidate, retry + 1));
            }
        }
        Err(NetgenError::ConnectivityUnattained {
            model: self.model.kind(),
            attempts: self.request.max_connectivity_retries + 1,
        })
    }
}

/// Estimates the density reaching `target` from two probes, clamped to the
/// bracket; falls back to the midpoint when the probes do not increase.
fn interpolate(low: (f64, f64), high: (f64, f64), target: f64) -> f64 {
    let (low_density, low_degree) = low;
    let (high_density, high_degree) = high;
    if high_degree <= low_degree {
        return 0.5 * (low_density + high_density);
    }
    let fraction = (target - low_degree) / (high_degree - low_degree);
    (low_density + fraction * (high_density - low_density)).clamp(low_density, high_density)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{ErdosRenyi, Generator};

    /// Erdős–Rényi exposed as a density model, so the search can be checked
    /// against a model with a known answer.
    struct ProbabilityDensity;

    impl DensityModel for ProbabilityDensity {
        fn kind(&self) -> ModelKind {
            ModelKind::ErdosRenyi
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
            ErdosRenyi::new(density)?.generate(vertex_count, rng)
        }
    }

    #[rstest]
    #[case(0.0, 0.0, 1.0, 10.0, 5.0, 0.5)]
    #[case(0.0, 0.0, 1.0, 10.0, 20.0, 1.0)]
    #[case(0.0, 4.0, 1.0, 4.0, 2.0, 0.5)]
    fn interpolation_is_clamped_to_bracket(
        #[case] low_density: f64,
        #[case] low_degree: f64,
        #[case] high_density: f64,
        #[case] high_degree: f64,
        #[case] target: f64,
        #[case] expected: f64,
    ) {
        let estimate = interpolate(
            (low_density, low_degree),
            (high_density, high_degree),
            target,
        );
        assert!((estimate - expected).abs() < 1e-12);
    }

    #[test]
    fn converges_on_linear_model() {
        let model = ProbabilityDensity;
        let mut calibrator = Calibrator::new(&model, CalibrationRequest::new(10.0));
        let mut rng = RandomSource::seed_from_u64(6);
        let outcome = calibrator.run(400, &mut rng).expect("search converges");
        assert_eq!(calibrator.state(), CalibrationState::Converged);
        assert!(outcome.probes() <= DEFAULT_MAX_PROBES);
        assert!((outcome.graph().average_degree() - 10.0).abs() < 0.5);
        assert_eq!(outcome.connectivity_attempts(), 0);
    }

    #[test]
    fn single_probe_budget_exhausts() {
        let model = ProbabilityDensity;
        let mut calibrator =
            Calibrator::new(&model, CalibrationRequest::new(10.0).with_max_probes(1));
        let mut rng = RandomSource::seed_from_u64(6);
        let err = calibrator.run(100, &mut rng).expect_err("one probe cannot converge");
        assert_eq!(calibrator.state(), CalibrationState::Exhausted);
        assert_eq!(
            err,
            NetgenError::CalibrationExhausted {
                model: ModelKind::ErdosRenyi,
                target: 10.0,
                closest: 0.0,
                probes: 1,
            }
        );
    }

    #[rstest]
    #[case::target(CalibrationRequest::new(-1.0), "average_degree")]
    #[case::tolerance(CalibrationRequest::new(4.0).with_tolerance(0.0), "tolerance")]
    #[case::probes(CalibrationRequest::new(4.0).with_max_probes(0), "max_probes")]
    fn invalid_requests_are_rejected_before_probing(
        #[case] request: CalibrationRequest,
        #[case] expected: &str,
    ) {
        let model = ProbabilityDensity;
        let mut calibrator = Calibrator::new(&model, request);
        let mut rng = RandomSource::seed_from_u64(1);
        let err = calibrator.run(10, &mut rng).expect_err("request is invalid");
        assert!(matches!(
            err,
            NetgenError::InvalidModelParameter { ref parameter, .. } if parameter == expected
        ));
        assert_eq!(calibrator.probes(), 0);
    }

    #[test]
    fn connectivity_budget_is_bounded() {
        // Degree 1.9 on 200 vertices is far below the connectivity threshold.
        let model = ProbabilityDensity;
        let request = CalibrationRequest::new(1.9)
            .with_tolerance(0.2)
            .with_require_connected(true)
            .with_max_connectivity_retries(3);
        let mut calibrator = Calibrator::new(&model, request);
        let mut rng = RandomSource::seed_from_u64(2);
        let err = calibrator.run(200, &mut rng).expect_err("sparse graphs are disconnected");
        assert_eq!(
            err,
            NetgenError::ConnectivityUnattained {
                model: ModelKind::ErdosRenyi,
                attempts: 4,
            }
        );
        assert_eq!(calibrator.state(), CalibrationState::Converged);
    }
}
