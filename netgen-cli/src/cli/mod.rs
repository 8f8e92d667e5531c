//! Command-line interface orchestration for netgen.
//!
//! `generate` runs one model through the dispatcher and writes its edge list;
//! `lcc` reduces an existing edge list to its largest connected component.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, GenerateCommand, LccCommand, ParamAssignment,
    ParamAssignmentError, SummarySource, render_summary, run_cli,
};

#[cfg(test)]
mod tests;
