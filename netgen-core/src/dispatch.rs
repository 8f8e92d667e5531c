//! String-keyed entry point mapping a model identifier and a loosely-typed
//! parameter map onto the typed model records.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    error::{NetgenError, Result},
    graph::Graph,
    models::{
        BarabasiAlbert, BarabasiAlbertAverage, ConfigurationScaleFree, DegreeSequence,
        ErdosRenyi, ErdosRenyiAverage, Generator, ModelKind, ScaleFreeToRandom, SpatialScaleFree,
        SpatialScaleFreeAverage, WattsStrogatz, WattsStrogatzAverage, Waxman, WaxmanAverage,
    },
    random::RandomSource,
};

/// A single parameter value at the dispatch boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// A real number.
    Float(f64),
    /// A signed integer; accepted wherever a float is expected.
    Integer(i64),
    /// A flag.
    Bool(bool),
    /// A list of non-negative integers, such as a degree sequence.
    Sequence(Vec<usize>),
}

impl ParamValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Integer(_) => "integer",
            Self::Bool(_) => "bool",
            Self::Sequence(_) => "sequence",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Sequence(values) => {
                f.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A raw parameter value that is neither a bool, a number nor a sequence.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot interpret `{raw}` as a bool, number or integer sequence")]
pub struct ParamValueParseError {
    raw: String,
}

impl FromStr for ParamValue {
    type Err = ParamValueParseError;

    /// Parses `true`/`false`, integers, floats, and comma-separated integer
    /// lists optionally wrapped in brackets.
    ///
    /// # Examples
    /// ```
    /// use netgen_core::ParamValue;
    ///
    /// assert_eq!("3".parse::<ParamValue>(), Ok(ParamValue::Integer(3)));
    /// assert_eq!("0.25".parse::<ParamValue>(), Ok(ParamValue::Float(0.25)));
    /// assert_eq!("true".parse::<ParamValue>(), Ok(ParamValue::Bool(true)));
    /// assert_eq!("[3,3,2]".parse::<ParamValue>(), Ok(ParamValue::Sequence(vec![3, 3, 2])));
    /// ```
    fn from_str(raw: &str) -> core::result::Result<Self, Self::Err> {
        let error = || ParamValueParseError {
            raw: raw.to_owned(),
        };
        let trimmed = raw.trim();
        match trimmed {
            "true" => return Ok(Self::Bool(true)),
            "false" => return Ok(Self::Bool(false)),
            _ => {}
        }
        let bracketed = trimmed.starts_with('[') && trimmed.ends_with(']');
        if bracketed || trimmed.contains(',') {
            let inner = trimmed.trim_start_matches('[').trim_end_matches(']');
            if inner.trim().is_empty() {
                return Ok(Self::Sequence(Vec::new()));
            }
            return inner
                .split(',')
                .map(|item| item.trim().parse::<usize>())
                .collect::<core::result::Result<Vec<_>, _>>()
                .map(Self::Sequence)
                .map_err(|_| error());
        }
        if let Ok(integer) = trimmed.parse::<i64>() {
            return Ok(Self::Integer(integer));
        }
        trimmed.parse::<f64>().map(Self::Float).map_err(|_| error())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<usize>> for ParamValue {
    fn from(value: Vec<usize>) -> Self {
        Self::Sequence(value)
    }
}

/// Named parameters for one dispatch call.
///
/// # Examples
/// ```
/// use netgen_core::{ParamValue, ParameterSet};
///
/// let params = ParameterSet::new()
///     .with("probability", 0.2)
///     .with("directed", true);
/// assert_eq!(params.get("directed"), Some(&ParamValue::Bool(true)));
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a parameter, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces a parameter, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.values.insert(name.into(), value.into())
    }

    /// Looks a parameter up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Reads typed values out of a [`ParameterSet`] and remembers which names
/// were recognized, so leftovers can be reported.
struct Fields<'a> {
    kind: ModelKind,
    params: &'a ParameterSet,
    known: BTreeSet<&'static str>,
}

impl<'a> Fields<'a> {
    fn new(kind: ModelKind, params: &'a ParameterSet) -> Self {
        Self {
            kind,
            params,
            known: BTreeSet::new(),
        }
    }

    fn lookup(&mut self, name: &'static str) -> Option<&'a ParamValue> {
        self.known.insert(name);
        self.params.get(name)
    }

    fn require(&mut self, name: &'static str) -> Result<&'a ParamValue> {
        self.lookup(name).ok_or(NetgenError::MissingParameter {
            model: self.kind,
            parameter: name,
        })
    }

    fn mismatch(&self, name: &str, expected: &str, value: &ParamValue) -> NetgenError {
        NetgenError::invalid(
            self.kind,
            name,
            format!("expected {expected}, got {} `{value}`", value.type_name()),
        )
    }

    fn as_float(&self, name: &str, value: &ParamValue) -> Result<f64> {
        match *value {
            ParamValue::Float(float) => Ok(float),
            ParamValue::Integer(integer) => Ok(integer as f64),
            _ => Err(self.mismatch(name, "a number", value)),
        }
    }

    fn as_count(&self, name: &str, value: &ParamValue) -> Result<usize> {
        match *value {
            ParamValue::Integer(integer) => usize::try_from(integer)
                .map_err(|_| self.mismatch(name, "a non-negative integer", value)),
            _ => Err(self.mismatch(name, "a non-negative integer", value)),
        }
    }

    fn float(&mut self, name: &'static str) -> Result<f64> {
        let value = self.require(name)?;
        self.as_float(name, value)
    }

    fn float_or(&mut self, name: &'static str, default: f64) -> Result<f64> {
        self.lookup(name)
            .map_or(Ok(default), |value| self.as_float(name, value))
    }

    fn count(&mut self, name: &'static str) -> Result<usize> {
        let value = self.require(name)?;
        self.as_count(name, value)
    }

    fn count_or(&mut self, name: &'static str, default: usize) -> Result<usize> {
        self.lookup(name)
            .map_or(Ok(default), |value| self.as_count(name, value))
    }

    fn flag(&mut self, name: &'static str) -> Result<bool> {
        match self.lookup(name) {
            None => Ok(false),
            Some(ParamValue::Bool(flag)) => Ok(*flag),
            Some(value) => Err(self.mismatch(name, "a bool", value)),
        }
    }

    fn sequence(&mut self, name: &'static str) -> Result<Vec<usize>> {
        match self.require(name)? {
            ParamValue::Sequence(values) => Ok(values.clone()),
            value @ ParamValue::Integer(_) => Ok(vec![self.as_count(name, value)?]),
            value => Err(self.mismatch(name, "an integer sequence", value)),
        }
    }

    /// Fails on the first parameter name no lookup asked for.
    fn finish(self) -> Result<()> {
        match self
            .params
            .iter()
            .find(|(name, _)| !self.known.contains(*name))
        {
            Some((name, _)) => Err(NetgenError::invalid(
                self.kind,
                name,
                "unknown parameter for this model",
            )),
            None => Ok(()),
        }
    }
}

/// A fully validated model record, one variant per [`ModelKind`].
#[derive(Clone, Debug, PartialEq)]
pub enum ModelSpec {
    /// `ER`
    ErdosRenyi(ErdosRenyi),
    /// `ER_avg`
    ErdosRenyiAverage(ErdosRenyiAverage),
    /// `WS`
    WattsStrogatz(WattsStrogatz),
    /// `WS_avg`
    WattsStrogatzAverage(WattsStrogatzAverage),
    /// `BA`
    BarabasiAlbert(BarabasiAlbert),
    /// `BA_avg`
    BarabasiAlbertAverage(BarabasiAlbertAverage),
    /// `SF2ER`
    ScaleFreeToRandom(ScaleFreeToRandom),
    /// `Waxman`
    Waxman(Waxman),
    /// `Waxman_avg`
    WaxmanAverage(WaxmanAverage),
    /// `SpatialSF`
    SpatialScaleFree(SpatialScaleFree),
    /// `SpatialSF_avg`
    SpatialScaleFreeAverage(SpatialScaleFreeAverage),
    /// `DegreeSequence`
    DegreeSequence(DegreeSequence),
    /// `ConfigurationSF`
    ConfigurationScaleFree(ConfigurationScaleFree),
}

impl ModelSpec {
    /// Builds the typed record for `kind` from named parameters.
    ///
    /// Optional flags default to `false`, `power` to `1.0` and the
    /// calibration budgets to the [`crate::Calibrator`] defaults.
    ///
    /// # Errors
    /// - [`NetgenError::MissingParameter`] when a required name is absent.
    /// - [`NetgenError::InvalidModelParameter`] for values of the wrong type,
    ///   out-of-range values and names the model does not take.
    ///
    /// # Examples
    /// ```
    /// use netgen_core::{ModelKind, ModelSpec, NetgenError, ParameterSet};
    ///
    /// let params = ParameterSet::new().with("radius", 2_i64);
    /// let err = ModelSpec::from_parameters(ModelKind::WattsStrogatz, &params).unwrap_err();
    /// assert_eq!(
    ///     err,
    ///     NetgenError::MissingParameter {
    ///         model: ModelKind::WattsStrogatz,
    ///         parameter: "rewiring_probability",
    ///     }
    /// );
    /// ```
    pub fn from_parameters(kind: ModelKind, params: &ParameterSet) -> Result<Self> {
        let mut fields = Fields::new(kind, params);
        let spec = match kind {
            ModelKind::ErdosRenyi => Self::ErdosRenyi(
                ErdosRenyi::new(fields.float("probability")?)?
                    .with_directed(fields.flag("directed")?)
                    .with_force_connected(fields.flag("force_connected")?),
            ),
            ModelKind::ErdosRenyiAverage => Self::ErdosRenyiAverage(
                ErdosRenyiAverage::new(fields.float("average_degree")?)?
                    .with_directed(fields.flag("directed")?)
                    .with_force_connected(fields.flag("force_connected")?),
            ),
            ModelKind::WattsStrogatz => Self::WattsStrogatz(WattsStrogatz::new(
                fields.count("radius")?,
                fields.float("rewiring_probability")?,
            )?),
            ModelKind::WattsStrogatzAverage => {
                Self::WattsStrogatzAverage(WattsStrogatzAverage::new(
                    fields.float("average_degree")?,
                    fields.float("rewiring_probability")?,
                )?)
            }
            ModelKind::BarabasiAlbert => Self::BarabasiAlbert(
                BarabasiAlbert::new(fields.count("edges_per_vertex")?)?
                    .with_directed(fields.flag("directed")?)
                    .with_power(fields.float_or("power", 1.0)?)?,
            ),
            ModelKind::BarabasiAlbertAverage => Self::BarabasiAlbertAverage(
                BarabasiAlbertAverage::new(fields.float("average_degree")?)?
                    .with_directed(fields.flag("directed")?)
                    .with_power(fields.float_or("power", 1.0)?)?,
            ),
            ModelKind::ScaleFreeToRandom => Self::ScaleFreeToRandom(ScaleFreeToRandom::new(
                fields.float("alpha")?,
                fields.count("seed_size")?,
                fields.count("edges_per_vertex")?,
            )?),
            ModelKind::Waxman => Self::Waxman(
                Waxman::new(fields.float("alpha")?, fields.float("beta")?)?
                    .with_force_connected(fields.flag("force_connected")?),
            ),
            ModelKind::WaxmanAverage => Self::WaxmanAverage(
                WaxmanAverage::new(fields.float("average_degree")?, fields.float("alpha")?)?
                    .with_force_connected(fields.flag("force_connected")?)
                    .with_tolerance(
                        fields.float_or("tolerance", crate::calibrate::DEFAULT_TOLERANCE)?,
                    )?
                    .with_max_probes(
                        fields.count_or("max_probes", crate::calibrate::DEFAULT_MAX_PROBES)?,
                    )?
                    .with_max_connectivity_retries(fields.count_or(
                        "max_connectivity_retries",
                        crate::calibrate::DEFAULT_MAX_CONNECTIVITY_RETRIES,
                    )?),
            ),
            ModelKind::SpatialScaleFree => Self::SpatialScaleFree(SpatialScaleFree::new(
                fields.count("seed_size")?,
                fields.count("edges_per_vertex")?,
                fields.float("decay_radius")?,
            )?),
            ModelKind::SpatialScaleFreeAverage => {
                Self::SpatialScaleFreeAverage(SpatialScaleFreeAverage::new(
                    fields.float("average_degree")?,
                    fields.float("decay_radius")?,
                )?)
            }
            ModelKind::DegreeSequence => {
                Self::DegreeSequence(DegreeSequence::new(fields.sequence("degrees")?)?)
            }
            ModelKind::ConfigurationScaleFree => {
                Self::ConfigurationScaleFree(ConfigurationScaleFree::new(
                    fields.float("exponent")?,
                    fields.count("min_degree")?,
                )?)
            }
        };
        fields.finish()?;
        Ok(spec)
    }

    fn as_generator(&self) -> &dyn Generator {
        match self {
            Self::ErdosRenyi(model) => model,
            Self::ErdosRenyiAverage(model) => model,
            Self::WattsStrogatz(model) => model,
            Self::WattsStrogatzAverage(model) => model,
            Self::BarabasiAlbert(model) => model,
            Self::BarabasiAlbertAverage(model) => model,
            Self::ScaleFreeToRandom(model) => model,
            Self::Waxman(model) => model,
            Self::WaxmanAverage(model) => model,
            Self::SpatialScaleFree(model) => model,
            Self::SpatialScaleFreeAverage(model) => model,
            Self::DegreeSequence(model) => model,
            Self::ConfigurationScaleFree(model) => model,
        }
    }
}

impl Generator for ModelSpec {
    fn kind(&self) -> ModelKind {
        self.as_generator().kind()
    }

    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        self.as_generator().generate(vertex_count, rng)
    }
}

/// Generates a graph for the model named `model_id`.
///
/// # Errors
/// Returns [`NetgenError::UnknownModel`] for an unrecognized identifier, the
/// parameter errors of [`ModelSpec::from_parameters`], and any generation
/// failure of the model itself.
///
/// # Examples
/// ```
/// use netgen_core::{ParameterSet, RandomSource, generate};
///
/// let params = ParameterSet::new().with("degrees", vec![3_usize, 3, 3, 3]);
/// let mut rng = RandomSource::seed_from_u64(1);
/// let graph = generate("DegreeSequence", 4, &params, &mut rng)?;
/// assert_eq!(graph.edge_count(), 6);
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[instrument(
    name = "netgen.dispatch",
    err,
    skip(params, rng),
    fields(model = model_id, vertices = vertex_count, parameters = params.len()),
)]
pub fn generate(
    model_id: &str,
    vertex_count: usize,
    params: &ParameterSet,
    rng: &mut RandomSource,
) -> Result<Graph> {
    let kind: ModelKind = model_id.parse()?;
    let spec = ModelSpec::from_parameters(kind, params)?;
    let graph = spec.generate(vertex_count, rng)?;
    info!(
        edges = graph.edge_count(),
        average_degree = graph.average_degree(),
        "graph generated"
    );
    Ok(graph)
}
