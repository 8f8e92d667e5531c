use std::io;

use netgen_core::{EdgeListError, ModelKind, NetgenError, NetgenErrorCode};
use rstest::rstest;

#[rstest]
#[case(
    NetgenError::MissingParameter { model: ModelKind::ErdosRenyi, parameter: "probability" },
    NetgenErrorCode::MissingParameter,
    "NETGEN_MISSING_PARAMETER",
)]
#[case(
    NetgenError::InvalidModelParameter {
        model: ModelKind::Waxman,
        parameter: "beta".to_owned(),
        reason: "too large".to_owned(),
    },
    NetgenErrorCode::InvalidModelParameter,
    "NETGEN_INVALID_MODEL_PARAMETER",
)]
#[case(
    NetgenError::UnknownModel { model: "Lattice".to_owned() },
    NetgenErrorCode::UnknownModel,
    "NETGEN_UNKNOWN_MODEL",
)]
#[case(
    NetgenError::UnrealizableSequence { reason: "odd sum".to_owned() },
    NetgenErrorCode::UnrealizableSequence,
    "NETGEN_UNREALIZABLE_SEQUENCE",
)]
#[case(
    NetgenError::InvalidDistribution { reason: "all weights zero".to_owned() },
    NetgenErrorCode::InvalidDistribution,
    "NETGEN_INVALID_DISTRIBUTION",
)]
#[case(
    NetgenError::CalibrationExhausted {
        model: ModelKind::WaxmanAverage,
        target: 8.0,
        closest: 6.5,
        probes: 32,
    },
    NetgenErrorCode::CalibrationExhausted,
    "NETGEN_CALIBRATION_EXHAUSTED",
)]
#[case(
    NetgenError::ConnectivityUnattained { model: ModelKind::WaxmanAverage, attempts: 17 },
    NetgenErrorCode::ConnectivityUnattained,
    "NETGEN_CONNECTIVITY_UNATTAINED",
)]
#[case(
    NetgenError::VertexOutOfRange { vertex: 9, vertex_count: 3 },
    NetgenErrorCode::VertexOutOfRange,
    "NETGEN_VERTEX_OUT_OF_RANGE",
)]
fn returns_expected_netgen_code(
    #[case] error: NetgenError,
    #[case] expected: NetgenErrorCode,
    #[case] label: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), label);
    assert_eq!(expected.to_string(), label);
}

#[test]
fn messages_name_the_model_identifier() {
    let error = NetgenError::MissingParameter {
        model: ModelKind::WattsStrogatzAverage,
        parameter: "average_degree",
    };
    assert_eq!(
        error.to_string(),
        "model WS_avg requires parameter `average_degree`"
    );
}

#[test]
fn edge_list_errors_keep_their_source() {
    let error = EdgeListError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"));
    let source = std::error::Error::source(&error).expect("I/O source is kept");
    assert_eq!(source.to_string(), "truncated");

    let parse = EdgeListError::Parse {
        line: 4,
        reason: "expected two vertex ids".to_owned(),
    };
    assert_eq!(parse.to_string(), "line 4: expected two vertex ids");
}
