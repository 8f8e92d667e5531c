//! Error types for the netgen core library.
//!
//! Defines the generation error taxonomy, the edge-list I/O error and a
//! convenient result alias.

use std::{fmt, io};

use thiserror::Error;

use crate::models::ModelKind;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced while validating parameters or generating a graph.
///
/// A failed generation never yields a partial [`crate::Graph`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NetgenError {
    /// A required parameter was absent from a [`crate::ParameterSet`].
    #[error("model {model} requires parameter `{parameter}`")]
    MissingParameter {
        /// Model whose parameters were being parsed.
        model: ModelKind,
        /// Name of the absent parameter.
        parameter: &'static str,
    },
    /// A parameter was present but outside its valid range or of the wrong type.
    #[error("invalid parameter `{parameter}` for model {model}: {reason}")]
    InvalidModelParameter {
        /// Model whose parameters were rejected.
        model: ModelKind,
        /// Name of the offending parameter.
        parameter: String,
        /// Human-readable explanation.
        reason: String,
    },
    /// The dispatch key did not name a known model.
    #[error("unknown model `{model}`")]
    UnknownModel {
        /// The identifier supplied by the caller.
        model: String,
    },
    /// A degree sequence cannot be realized as a simple connected graph.
    #[error("degree sequence cannot be realized: {reason}")]
    UnrealizableSequence {
        /// Why the sequence was rejected.
        reason: String,
    },
    /// Weighted sampling received unusable weights.
    #[error("invalid sampling distribution: {reason}")]
    InvalidDistribution {
        /// Why the distribution was rejected.
        reason: String,
    },
    /// The density search ran out of probes before reaching the target.
    #[error(
        "calibration of {model} did not reach average degree {target} within {probes} probes (closest {closest})"
    )]
    CalibrationExhausted {
        /// Model being calibrated.
        model: ModelKind,
        /// Requested average degree.
        target: f64,
        /// Realized average degree closest to the target.
        closest: f64,
        /// Number of graphs generated during the search.
        probes: usize,
    },
    /// No connected graph was produced within the retry budget.
    #[error("model {model} produced no connected graph after {attempts} attempts")]
    ConnectivityUnattained {
        /// Model being regenerated.
        model: ModelKind,
        /// Number of graphs inspected.
        attempts: usize,
    },
    /// An edge referenced a vertex that the builder does not hold.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    VertexOutOfRange {
        /// The offending vertex id.
        vertex: usize,
        /// Number of vertices currently in the builder.
        vertex_count: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`NetgenError`] variants.
    enum NetgenErrorCode for NetgenError {
        /// A required parameter was absent.
        MissingParameter => MissingParameter { .. } => "NETGEN_MISSING_PARAMETER",
        /// A parameter was out of range or of the wrong type.
        InvalidModelParameter => InvalidModelParameter { .. } => "NETGEN_INVALID_MODEL_PARAMETER",
        /// The dispatch key did not name a known model.
        UnknownModel => UnknownModel { .. } => "NETGEN_UNKNOWN_MODEL",
        /// A degree sequence cannot be realized.
        UnrealizableSequence => UnrealizableSequence { .. } => "NETGEN_UNREALIZABLE_SEQUENCE",
        /// Weighted sampling received unusable weights.
        InvalidDistribution => InvalidDistribution { .. } => "NETGEN_INVALID_DISTRIBUTION",
        /// The density search ran out of probes.
        CalibrationExhausted => CalibrationExhausted { .. } => "NETGEN_CALIBRATION_EXHAUSTED",
        /// No connected graph within the retry budget.
        ConnectivityUnattained => ConnectivityUnattained { .. } => "NETGEN_CONNECTIVITY_UNATTAINED",
        /// An edge referenced an unknown vertex.
        VertexOutOfRange => VertexOutOfRange { .. } => "NETGEN_VERTEX_OUT_OF_RANGE",
    }
}

impl NetgenError {
    pub(crate) fn invalid(
        model: ModelKind,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidModelParameter {
            model,
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unrealizable(reason: impl Into<String>) -> Self {
        Self::UnrealizableSequence {
            reason: reason.into(),
        }
    }

    pub(crate) fn distribution(reason: impl Into<String>) -> Self {
        Self::InvalidDistribution {
            reason: reason.into(),
        }
    }
}

/// An error produced while reading an edge list.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EdgeListError {
    /// The underlying reader failed.
    #[error("failed to read edge list: {source}")]
    Io {
        /// Error raised by the reader.
        #[from]
        source: io::Error,
    },
    /// A non-comment line was not a pair of vertex ids.
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line number of the offending line.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, NetgenError>;
