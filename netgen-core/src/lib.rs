//! Netgen core library: random-graph generators for complex-network
//! experiments.
//!
//! Every model is a typed record implementing [`Generator`]. Callers own a
//! [`RandomSource`] and pass it to each generation, so identical seeds and
//! parameters reproduce identical graphs. Models without a closed-form link
//! between their density parameter and the average degree are tuned by the
//! bounded [`Calibrator`]. [`generate`] dispatches on the string model
//! identifiers.
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "parallel")]
mod batch;
mod calibrate;
mod dispatch;
mod edgelist;
mod error;
mod graph;
pub mod models;
mod random;
#[cfg(test)]
mod test_utils;

#[cfg(feature = "parallel")]
pub use crate::batch::generate_batch;
pub use crate::{
    calibrate::{
        CalibrationOutcome, CalibrationRequest, CalibrationState, Calibrator,
        DEFAULT_MAX_CONNECTIVITY_RETRIES, DEFAULT_MAX_PROBES, DEFAULT_TOLERANCE, DensityModel,
    },
    dispatch::{ModelSpec, ParamValue, ParamValueParseError, ParameterSet, generate},
    edgelist::{MAX_EDGE_LIST_VERTICES, read_edge_list, write_edge_list},
    error::{EdgeListError, NetgenError, NetgenErrorCode, Result},
    graph::{Edge, Graph, GraphBuilder, Point},
    models::{
        BarabasiAlbert, BarabasiAlbertAverage, ConfigurationScaleFree, DegreeSequence,
        DrawnSequence, ErdosRenyi, ErdosRenyiAverage, Generator, HavelHakimi, ModelKind,
        ScaleFreeToRandom, SequenceRealizer, SpatialScaleFree, SpatialScaleFreeAverage,
        WattsStrogatz, WattsStrogatzAverage, Waxman, WaxmanAverage,
    },
    random::RandomSource,
};
