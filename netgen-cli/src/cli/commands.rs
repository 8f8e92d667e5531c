//! Command implementations and argument parsing for the netgen CLI.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use netgen_core::{
    EdgeListError, Graph, NetgenError, NetgenErrorCode, ParamValue, ParamValueParseError,
    ParameterSet, RandomSource, generate, read_edge_list, write_edge_list,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "netgen", about = "Generate random networks as edge lists.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate one graph and write its edge list.
    Generate(GenerateCommand),
    /// Keep only the largest connected component of an edge list.
    Lcc(LccCommand),
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Model identifier, such as `ER`, `BA_avg` or `ConfigurationSF`.
    pub model: String,

    /// Number of vertices to generate.
    #[arg(short = 'n', long, value_parser = clap::value_parser!(usize))]
    pub vertices: usize,

    /// Model parameter as `name=value`; repeat for several.
    #[arg(short = 'p', long = "param")]
    pub params: Vec<ParamAssignment>,

    /// Seed for the random source; drawn from entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Destination of the edge list.
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Options accepted by the `lcc` command.
#[derive(Debug, Args, Clone)]
pub struct LccCommand {
    /// Edge list to read.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Destination of the reduced edge list.
    #[arg(short, long)]
    pub output: PathBuf,
}

/// A `name=value` pair given through `--param`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamAssignment {
    /// Parameter name.
    pub name: String,
    /// Parsed value.
    pub value: ParamValue,
}

/// A `--param` argument that could not be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParamAssignmentError {
    /// No `=` separated the name from the value.
    #[error("expected `name=value`, found `{raw}`")]
    MissingSeparator {
        /// The raw argument.
        raw: String,
    },
    /// The name before `=` was empty.
    #[error("parameter name is empty in `{raw}`")]
    EmptyName {
        /// The raw argument.
        raw: String,
    },
    /// The value did not parse.
    #[error(transparent)]
    Value(#[from] ParamValueParseError),
}

impl FromStr for ParamAssignment {
    type Err = ParamAssignmentError;

    /// Parses `name=value`, where the value follows [`ParamValue`]'s syntax.
    ///
    /// # Examples
    /// ```
    /// use netgen_cli::cli::ParamAssignment;
    /// use netgen_core::ParamValue;
    ///
    /// let assignment: ParamAssignment = "p=0.25".parse()?;
    /// assert_eq!(assignment.name, "p");
    /// assert_eq!(assignment.value, ParamValue::Float(0.25));
    /// # Ok::<(), netgen_cli::cli::ParamAssignmentError>(())
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let Some((name, value)) = raw.split_once('=') else {
            return Err(ParamAssignmentError::MissingSeparator {
                raw: raw.to_owned(),
            });
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(ParamAssignmentError::EmptyName {
                raw: raw.to_owned(),
            });
        }
        Ok(Self {
            name: name.to_owned(),
            value: value.parse()?,
        })
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be opened, created or written.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The same parameter was given twice.
    #[error("parameter `{name}` was given more than once")]
    DuplicateParameter {
        /// The repeated parameter name.
        name: String,
    },
    /// The input edge list was malformed.
    #[error("failed to read `{path}`: {source}")]
    EdgeList {
        /// Path of the edge list.
        path: PathBuf,
        /// Underlying read failure.
        #[source]
        source: EdgeListError,
    },
    /// Generation failed.
    #[error(transparent)]
    Core(#[from] NetgenError),
}

impl CliError {
    /// Returns the stable core error code when generation failed.
    #[must_use]
    pub const fn code(&self) -> Option<NetgenErrorCode> {
        match self {
            Self::Core(core) => Some(core.code()),
            _ => None,
        }
    }
}

/// Where the summarised graph came from.
#[derive(Debug, Clone, PartialEq)]
pub enum SummarySource {
    /// A freshly generated graph.
    Generated {
        /// Model identifier as given.
        model: String,
        /// Seed the random source was built from.
        seed: u64,
    },
    /// The largest component of an existing edge list.
    LargestComponent {
        /// Edge list that was reduced.
        input: PathBuf,
        /// Vertex count before reduction.
        original_vertices: usize,
        /// Component count before reduction.
        original_components: usize,
    },
}

/// Summarises the graph written by a CLI command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Origin of the graph.
    pub source: SummarySource,
    /// Edge list that was written.
    pub output: PathBuf,
    /// Vertices in the written graph.
    pub vertices: usize,
    /// Edges in the written graph.
    pub edges: usize,
    /// Mean degree of the written graph.
    pub average_degree: f64,
    /// Whether the written graph is connected.
    pub connected: bool,
}

impl ExecutionSummary {
    fn new(source: SummarySource, output: PathBuf, graph: &Graph) -> Self {
        Self {
            source,
            output,
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            average_degree: graph.average_degree(),
            connected: graph.is_connected(),
        }
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when generation, reading or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use netgen_cli::cli::{Cli, Command, GenerateCommand, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand {
///         model: "BA".to_owned(),
///         vertices: 20,
///         params: vec!["edges_per_vertex=2".parse()?],
///         seed: Some(3),
///         output: dir.path().join("ba.txt"),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.vertices, 20);
/// assert!(summary.connected);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Generate(command) => {
            span.record("command", field::display("generate"));
            run_generate(command)
        }
        Command::Lcc(command) => {
            span.record("command", field::display("lcc"));
            run_lcc(command)
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(model = %command.model, vertices = command.vertices, seed = field::Empty),
)]
pub(super) fn run_generate(command: GenerateCommand) -> Result<ExecutionSummary, CliError> {
    let GenerateCommand {
        model,
        vertices,
        params,
        seed,
        output,
    } = command;
    let params = collect_parameters(params)?;
    let seed = seed.unwrap_or_else(rand::random);
    Span::current().record("seed", seed);

    let mut rng = RandomSource::seed_from_u64(seed);
    let graph = generate(&model, vertices, &params, &mut rng)?;
    write_graph(&graph, &output)?;

    info!(
        output = %output.display(),
        edges = graph.edge_count(),
        "edge list written"
    );
    Ok(ExecutionSummary::new(
        SummarySource::Generated { model, seed },
        output,
        &graph,
    ))
}

#[instrument(
    name = "cli.lcc",
    err,
    skip(command),
    fields(input = %command.input.display(), output = %command.output.display()),
)]
pub(super) fn run_lcc(command: LccCommand) -> Result<ExecutionSummary, CliError> {
    let LccCommand { input, output } = command;
    let original = read_graph(&input)?;
    let largest = original.largest_component();
    write_graph(&largest, &output)?;

    info!(
        original_vertices = original.vertex_count(),
        kept_vertices = largest.vertex_count(),
        "largest component written"
    );
    Ok(ExecutionSummary::new(
        SummarySource::LargestComponent {
            input,
            original_vertices: original.vertex_count(),
            original_components: original.component_count(),
        },
        output,
        &largest,
    ))
}

pub(super) fn collect_parameters(
    assignments: Vec<ParamAssignment>,
) -> Result<ParameterSet, CliError> {
    let mut params = ParameterSet::new();
    for ParamAssignment { name, value } in assignments {
        if params.get(&name).is_some() {
            return Err(CliError::DuplicateParameter { name });
        }
        params.insert(name, value);
    }
    Ok(params)
}

fn read_graph(path: &Path) -> Result<Graph, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_edge_list(BufReader::new(file)).map_err(|source| CliError::EdgeList {
        path: path.to_path_buf(),
        source,
    })
}

fn write_graph(graph: &Graph, path: &Path) -> Result<(), CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    write_edge_list(graph, BufWriter::new(file)).map_err(io_error)
}

/// Writes a human-readable summary of `summary` to `writer`.
///
/// # Errors
/// Propagates I/O errors from `writer`.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match &summary.source {
        SummarySource::Generated { model, seed } => {
            writeln!(writer, "model: {model}")?;
            writeln!(writer, "seed: {seed}")?;
        }
        SummarySource::LargestComponent {
            input,
            original_vertices,
            original_components,
        } => {
            writeln!(writer, "input: {}", input.display())?;
            writeln!(
                writer,
                "input vertices: {original_vertices} in {original_components} components"
            )?;
        }
    }
    writeln!(writer, "vertices: {}", summary.vertices)?;
    writeln!(writer, "edges: {}", summary.edges)?;
    writeln!(writer, "average degree: {:.4}", summary.average_degree)?;
    writeln!(writer, "connected: {}", summary.connected)?;
    writeln!(writer, "output: {}", summary.output.display())?;
    Ok(())
}
