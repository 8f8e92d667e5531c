//! Random-graph model families.
//!
//! Every model is a typed parameter record implementing [`Generator`]. The
//! record validates its parameters before drawing anything from the
//! [`RandomSource`], so a rejected configuration leaves the source untouched.

mod barabasi_albert;
mod degree_sequence;
mod erdos_renyi;
mod sf2er;
mod spatial_sf;
mod watts_strogatz;
mod waxman;

use std::{fmt, str::FromStr};

pub use barabasi_albert::{BarabasiAlbert, BarabasiAlbertAverage};
pub use degree_sequence::{
    ConfigurationScaleFree, DegreeSequence, DrawnSequence, HavelHakimi, SequenceRealizer,
};
pub use erdos_renyi::{ErdosRenyi, ErdosRenyiAverage};
pub use sf2er::ScaleFreeToRandom;
pub use spatial_sf::{SpatialScaleFree, SpatialScaleFreeAverage};
pub use watts_strogatz::{WattsStrogatz, WattsStrogatzAverage};
pub use waxman::{Waxman, WaxmanAverage};

use crate::{
    error::{NetgenError, Result},
    graph::Graph,
    random::RandomSource,
};

/// Common contract of every model: a deterministic function of the vertex
/// count, the record's parameters and the random source.
pub trait Generator {
    /// Identifies the model family.
    fn kind(&self) -> ModelKind;

    /// Generates a graph with `vertex_count` vertices.
    ///
    /// # Errors
    /// Returns [`NetgenError`] when the parameters are incompatible with
    /// `vertex_count` or generation cannot complete. No partial graph is
    /// returned.
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn kind(&self) -> ModelKind {
        (**self).kind()
    }

    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        (**self).generate(vertex_count, rng)
    }
}

/// Identifiers of the supported models, including the `_avg` variants that
/// target an average degree.
///
/// # Examples
/// ```
/// use netgen_core::ModelKind;
///
/// let kind: ModelKind = "Waxman_avg".parse()?;
/// assert_eq!(kind, ModelKind::WaxmanAverage);
/// assert_eq!(kind.as_str(), "Waxman_avg");
/// assert!("Lattice".parse::<ModelKind>().is_err());
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ModelKind {
    /// Erdős–Rényi `G(n, p)`.
    ErdosRenyi,
    /// Erdős–Rényi with `p` derived from a target average degree.
    ErdosRenyiAverage,
    /// Watts–Strogatz small world.
    WattsStrogatz,
    /// Watts–Strogatz with the lattice radius derived from a target average degree.
    WattsStrogatzAverage,
    /// Barabási–Albert preferential attachment.
    BarabasiAlbert,
    /// Barabási–Albert with `m` derived from a target average degree.
    BarabasiAlbertAverage,
    /// Hybrid interpolating between preferential and uniform attachment.
    ScaleFreeToRandom,
    /// Waxman spatial model.
    Waxman,
    /// Waxman with β calibrated to a target average degree.
    WaxmanAverage,
    /// Spatial scale-free growth.
    SpatialScaleFree,
    /// Spatial scale-free growth sized from a target average degree.
    SpatialScaleFreeAverage,
    /// Realization of an explicit degree sequence.
    DegreeSequence,
    /// Realization of a power-law degree sequence.
    ConfigurationScaleFree,
}

impl ModelKind {
    /// Every supported model, in dispatch-table order.
    pub const ALL: [Self; 13] = [
        Self::ErdosRenyi,
        Self::ErdosRenyiAverage,
        Self::WattsStrogatz,
        Self::WattsStrogatzAverage,
        Self::BarabasiAlbert,
        Self::BarabasiAlbertAverage,
        Self::ScaleFreeToRandom,
        Self::Waxman,
        Self::WaxmanAverage,
        Self::SpatialScaleFree,
        Self::SpatialScaleFreeAverage,
        Self::DegreeSequence,
        Self::ConfigurationScaleFree,
    ];

    /// Returns the dispatch identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ErdosRenyi => "ER",
            Self::ErdosRenyiAverage => "ER_avg",
            Self::WattsStrogatz => "WS",
            Self::WattsStrogatzAverage => "WS_avg",
            Self::BarabasiAlbert => "BA",
            Self::BarabasiAlbertAverage => "BA_avg",
            Self::ScaleFreeToRandom => "SF2ER",
            Self::Waxman => "Waxman",
            Self::WaxmanAverage => "Waxman_avg",
            Self::SpatialScaleFree => "SpatialSF",
            Self::SpatialScaleFreeAverage => "SpatialSF_avg",
            Self::DegreeSequence => "DegreeSequence",
            Self::ConfigurationScaleFree => "ConfigurationSF",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = NetgenError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| NetgenError::UnknownModel {
                model: raw.to_owned(),
            })
    }
}

pub(crate) fn check_probability(kind: ModelKind, parameter: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(NetgenError::invalid(
            kind,
            parameter,
            format!("must lie in [0, 1] (got {value})"),
        ))
    }
}

pub(crate) fn check_positive(kind: ModelKind, parameter: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(NetgenError::invalid(
            kind,
            parameter,
            format!("must be positive and finite (got {value})"),
        ))
    }
}

pub(crate) fn check_non_negative(kind: ModelKind, parameter: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(NetgenError::invalid(
            kind,
            parameter,
            format!("must be non-negative and finite (got {value})"),
        ))
    }
}

pub(crate) fn check_at_least(
    kind: ModelKind,
    parameter: &str,
    value: usize,
    minimum: usize,
) -> Result<()> {
    if value >= minimum {
        Ok(())
    } else {
        Err(NetgenError::invalid(
            kind,
            parameter,
            format!("must be at least {minimum} (got {value})"),
        ))
    }
}

/// Rounds half of a target average degree to the nearest count, never below
/// one; growth models add two degree units per attached edge.
pub(crate) fn half_degree(kind: ModelKind, average_degree: f64) -> Result<usize> {
    check_positive(kind, "average_degree", average_degree)?;
    let rounded = (average_degree / 2.0).round();
    // `usize::MAX as f64` rounds up, so anything below it converts exactly.
    if rounded >= usize::MAX as f64 {
        return Err(NetgenError::invalid(
            kind,
            "average_degree",
            format!("{average_degree} is too large for a per-vertex edge count"),
        ));
    }
    Ok((rounded as usize).max(1))
}

/// Adds the edges of a complete graph on vertices `0..size`.
pub(crate) fn seed_clique(builder: &mut crate::graph::GraphBuilder, size: usize) {
    for source in 0..size {
        for target in (source + 1)..size {
            builder.insert_unchecked(source, target);
        }
    }
}

#[cfg(test)]
mod tests;
