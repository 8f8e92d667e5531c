//! Unit tests for the CLI commands.

use super::commands::collect_parameters;
use super::{
    Cli, CliError, Command, ExecutionSummary, GenerateCommand, LccCommand, ParamAssignment,
    ParamAssignmentError, SummarySource, render_summary, run_cli,
};

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use netgen_core::{NetgenError, NetgenErrorCode, ParamValue, read_edge_list};
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tracing::Level;

use netgen_test_support::tracing::RecordingLayer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("create temporary directory")
}

fn generate_cli(model: &str, vertices: usize, params: &[&str], output: PathBuf) -> Cli {
    Cli {
        command: Command::Generate(GenerateCommand {
            model: model.to_owned(),
            vertices,
            params: params
                .iter()
                .map(|raw| raw.parse().expect("valid assignment"))
                .collect(),
            seed: Some(17),
            output,
        }),
    }
}

fn read_back(path: &Path) -> netgen_core::Graph {
    let text = fs::read_to_string(path).expect("output exists");
    read_edge_list(text.as_bytes()).expect("output is a valid edge list")
}

#[rstest]
#[case("p=0.5", "p", ParamValue::Float(0.5))]
#[case(" radius =3", "radius", ParamValue::Integer(3))]
#[case("directed=true", "directed", ParamValue::Bool(true))]
#[case("degrees=3,3,3,3", "degrees", ParamValue::Sequence(vec![3, 3, 3, 3]))]
fn parses_param_assignments(#[case] raw: &str, #[case] name: &str, #[case] value: ParamValue) {
    let assignment: ParamAssignment = raw.parse().expect("valid assignment");
    assert_eq!(assignment.name, name);
    assert_eq!(assignment.value, value);
}

#[rstest]
#[case("p", "MissingSeparator")]
#[case("=1", "EmptyName")]
#[case("p=often", "Value")]
fn rejects_malformed_assignments(#[case] raw: &str, #[case] variant: &str) {
    let err = raw.parse::<ParamAssignment>().expect_err("assignment is malformed");
    let matched = match err {
        ParamAssignmentError::MissingSeparator { .. } => "MissingSeparator",
        ParamAssignmentError::EmptyName { .. } => "EmptyName",
        ParamAssignmentError::Value(_) => "Value",
    };
    assert_eq!(matched, variant);
}

#[test]
fn duplicate_parameters_are_rejected() {
    let assignments = ["p=0.1", "p=0.2"]
        .iter()
        .map(|raw| raw.parse().expect("valid assignment"))
        .collect();
    let err = collect_parameters(assignments).expect_err("p repeats");
    assert!(matches!(err, CliError::DuplicateParameter { name } if name == "p"));
}

#[test]
fn parses_generate_arguments() {
    let cli = Cli::try_parse_from([
        "netgen",
        "generate",
        "WS",
        "--vertices",
        "30",
        "--param",
        "radius=2",
        "-p",
        "rewiring_probability=0.1",
        "--seed",
        "9",
        "--output",
        "ws.txt",
    ])
    .expect("arguments parse");
    let Command::Generate(command) = cli.command else {
        panic!("expected generate command");
    };
    assert_eq!(command.model, "WS");
    assert_eq!(command.vertices, 30);
    assert_eq!(command.params.len(), 2);
    assert_eq!(command.seed, Some(9));
    assert_eq!(command.output, PathBuf::from("ws.txt"));
}

#[test]
fn generate_requires_vertices() {
    let result = Cli::try_parse_from(["netgen", "generate", "ER", "--output", "er.txt"]);
    assert!(result.is_err());
}

#[rstest]
fn generate_writes_degree_sequence(temp_dir: TempDir) -> TestResult {
    let output = temp_dir.path().join("k4.txt");
    let summary = run_cli(generate_cli(
        "DegreeSequence",
        4,
        &["degrees=[3,3,3,3]"],
        output.clone(),
    ))?;
    assert_eq!(summary.vertices, 4);
    assert_eq!(summary.edges, 6);
    assert!(summary.connected);
    assert_eq!(
        summary.source,
        SummarySource::Generated {
            model: "DegreeSequence".to_owned(),
            seed: 17,
        }
    );
    assert_eq!(read_back(&output).edge_count(), 6);
    Ok(())
}

#[rstest]
fn generate_is_reproducible_for_a_seed(temp_dir: TempDir) -> TestResult {
    let first = temp_dir.path().join("first.txt");
    let second = temp_dir.path().join("second.txt");
    let params = ["average_degree=4", "rewiring_probability=0.2"];
    run_cli(generate_cli("WS_avg", 50, &params, first.clone()))?;
    run_cli(generate_cli("WS_avg", 50, &params, second.clone()))?;
    assert_eq!(fs::read_to_string(first)?, fs::read_to_string(second)?);
    Ok(())
}

#[rstest]
fn generate_surfaces_core_errors(temp_dir: TempDir) {
    let output = temp_dir.path().join("never.txt");
    let err = run_cli(generate_cli("Lattice", 10, &[], output.clone()))
        .expect_err("model is unknown");
    assert!(matches!(
        err,
        CliError::Core(NetgenError::UnknownModel { ref model }) if model == "Lattice"
    ));
    assert_eq!(err.code(), Some(NetgenErrorCode::UnknownModel));
    assert!(!output.exists());
}

#[rstest]
fn generate_reports_unwritable_output(temp_dir: TempDir) {
    let output = temp_dir.path().join("missing").join("er.txt");
    let err = run_cli(generate_cli("ER", 10, &["probability=0.5"], output.clone()))
        .expect_err("parent directory does not exist");
    assert!(matches!(err, CliError::Io { ref path, .. } if *path == output));
    assert_eq!(err.code(), None);
}

#[rstest]
fn lcc_keeps_largest_component(temp_dir: TempDir) -> TestResult {
    let input = temp_dir.path().join("split.txt");
    let output = temp_dir.path().join("lcc.txt");
    fs::write(&input, "# two pieces\n0 1\n3 4\n4 5\n5 3\n")?;
    let summary = run_cli(Cli {
        command: Command::Lcc(LccCommand {
            input: input.clone(),
            output: output.clone(),
        }),
    })?;
    assert_eq!(summary.vertices, 3);
    assert_eq!(summary.edges, 3);
    assert_eq!(
        summary.source,
        SummarySource::LargestComponent {
            input,
            original_vertices: 6,
            original_components: 3,
        }
    );
    assert_eq!(read_back(&output).edge_list(), [(0, 1), (1, 2), (0, 2)]);
    Ok(())
}

#[rstest]
fn lcc_reports_parse_errors_with_path(temp_dir: TempDir) -> TestResult {
    let input = temp_dir.path().join("broken.txt");
    fs::write(&input, "0 1\n1 x\n")?;
    let err = run_cli(Cli {
        command: Command::Lcc(LccCommand {
            input: input.clone(),
            output: temp_dir.path().join("out.txt"),
        }),
    })
    .expect_err("second line is malformed");
    assert!(matches!(err, CliError::EdgeList { ref path, .. } if *path == input));
    Ok(())
}

#[rstest]
fn lcc_reports_missing_input(temp_dir: TempDir) {
    let input = temp_dir.path().join("absent.txt");
    let err = run_cli(Cli {
        command: Command::Lcc(LccCommand {
            input: input.clone(),
            output: temp_dir.path().join("out.txt"),
        }),
    })
    .expect_err("input does not exist");
    assert!(matches!(err, CliError::Io { ref path, .. } if *path == input));
}

#[test]
fn render_summary_lists_generation_details() -> TestResult {
    let summary = ExecutionSummary {
        source: SummarySource::Generated {
            model: "ER".to_owned(),
            seed: 4,
        },
        output: PathBuf::from("er.txt"),
        vertices: 10,
        edges: 12,
        average_degree: 2.4,
        connected: false,
    };
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    assert_eq!(
        String::from_utf8(buffer)?,
        "model: ER\nseed: 4\nvertices: 10\nedges: 12\naverage degree: 2.4000\nconnected: false\noutput: er.txt\n"
    );
    Ok(())
}

#[rstest]
fn run_cli_records_command_spans(temp_dir: TempDir) {
    let output = temp_dir.path().join("ba.txt");
    let (result, layer) = RecordingLayer::capture(|| {
        run_cli(generate_cli("BA", 25, &["edges_per_vertex=2"], output))
    });
    result.expect("generation succeeds");

    let run = layer.span("cli.run").expect("cli.run span recorded");
    assert_eq!(run.field("command"), Some("generate"));
    let generate = layer.span("cli.generate").expect("cli.generate span recorded");
    assert_eq!(generate.field("model"), Some("BA"));
    assert_eq!(generate.field("seed"), Some("17"));
    let dispatch = layer.span("netgen.dispatch").expect("dispatch span recorded");
    assert_eq!(dispatch.field("vertices"), Some("25"));
    assert!(
        layer
            .events_at(Level::INFO)
            .iter()
            .any(|event| event.message() == Some("edge list written"))
    );
}

#[rstest]
fn failures_are_logged_as_errors(temp_dir: TempDir) {
    let output = temp_dir.path().join("never.txt");
    let (result, layer) =
        RecordingLayer::capture(|| run_cli(generate_cli("ER", 10, &[], output)));
    assert!(result.is_err());
    assert!(!layer.events_at(Level::ERROR).is_empty());
}
