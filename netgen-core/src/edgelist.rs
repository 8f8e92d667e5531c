//! Plain-text edge-list interchange: one `u v` pair per line.
//!
//! Readers skip blank lines and lines starting with `#`; vertex ids are
//! non-negative integers below [`MAX_EDGE_LIST_VERTICES`] and the vertex count
//! is one more than the largest id seen.

use std::io::{BufRead, Write};

use crate::{error::EdgeListError, graph::Graph, graph::GraphBuilder};

/// Largest vertex count [`read_edge_list`] will allocate; ids must be below it.
pub const MAX_EDGE_LIST_VERTICES: usize = 1 << 26;

/// Writes every edge of `graph` as a `source target` line.
///
/// # Errors
/// Propagates I/O errors from `writer`.
///
/// # Examples
/// ```
/// use netgen_core::{GraphBuilder, write_edge_list};
///
/// let mut builder = GraphBuilder::with_vertices(3, false);
/// builder.add_edge(0, 1)?;
/// builder.add_edge(2, 1)?;
/// let mut out = Vec::new();
/// write_edge_list(&builder.build(), &mut out)?;
/// assert_eq!(String::from_utf8(out)?, "0 1\n1 2\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_edge_list<W: Write>(graph: &Graph, mut writer: W) -> std::io::Result<()> {
    for edge in graph.edges() {
        writeln!(writer, "{} {}", edge.source(), edge.target())?;
    }
    writer.flush()
}

/// Reads an undirected graph from an edge list.
///
/// Duplicate pairs and self-loops are ignored. Isolated vertices above the
/// largest id cannot be represented and are lost.
///
/// # Errors
/// - [`EdgeListError::Io`] when reading fails.
/// - [`EdgeListError::Parse`] with the 1-based line number when a line is not
///   exactly two non-negative integers or an id reaches
///   [`MAX_EDGE_LIST_VERTICES`].
///
/// # Examples
/// ```
/// use netgen_core::read_edge_list;
///
/// let graph = read_edge_list("# triangle\n0 1\n1 2\n\n2 0\n".as_bytes())?;
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
/// # Ok::<(), netgen_core::EdgeListError>(())
/// ```
pub fn read_edge_list<R: BufRead>(reader: R) -> Result<Graph, EdgeListError> {
    let mut pairs = Vec::new();
    let mut vertex_count = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (source, target) = parse_pair(trimmed).map_err(|reason| EdgeListError::Parse {
            line: index + 1,
            reason,
        })?;
        vertex_count = vertex_count.max(source.max(target) + 1);
        pairs.push((source, target));
    }

    let mut builder = GraphBuilder::with_vertices(vertex_count, false);
    for (source, target) in pairs {
        builder.insert_unchecked(source, target);
    }
    Ok(builder.build())
}

fn parse_pair(line: &str) -> Result<(usize, usize), String> {
    let mut tokens = line.split_whitespace();
    let (Some(source), Some(target), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(format!("expected two vertex ids, found `{line}`"));
    };
    let parse = |token: &str| {
        let id = token
            .parse::<usize>()
            .map_err(|err| format!("invalid vertex id `{token}`: {err}"))?;
        if id >= MAX_EDGE_LIST_VERTICES {
            return Err(format!(
                "vertex id {id} exceeds the limit of {MAX_EDGE_LIST_VERTICES} vertices"
            ));
        }
        Ok(id)
    };
    Ok((parse(source)?, parse(target)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{BarabasiAlbert, Generator, RandomSource};

    #[test]
    fn round_trip_preserves_edges() {
        let mut rng = RandomSource::seed_from_u64(14);
        let graph = BarabasiAlbert::new(2)
            .expect("valid m")
            .generate(30, &mut rng)
            .expect("generation succeeds");
        let mut buffer = Vec::new();
        write_edge_list(&graph, &mut buffer).expect("write to memory");
        let restored = read_edge_list(buffer.as_slice()).expect("read back");
        assert_eq!(restored.edge_list(), graph.edge_list());
        assert_eq!(restored.vertex_count(), graph.vertex_count());
    }

    #[test]
    fn duplicates_and_self_loops_are_ignored() {
        let graph = read_edge_list("0 1\n1 0\n2 2\n".as_bytes()).expect("valid list");
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_list(), [(0, 1)]);
    }

    #[rstest]
    #[case::one_token("0 1\n3\n", 2)]
    #[case::three_tokens("0 1 2\n", 1)]
    #[case::negative("# header\n0 -1\n", 2)]
    #[case::word("\n\nfoo bar\n", 3)]
    #[case::id_overflows_usize("0 1\n0 18446744073709551615\n", 2)]
    #[case::id_beyond_usize("0 99999999999999999999999\n", 1)]
    #[case::id_too_large_to_allocate("0 1\n# big\n0 100000000000\n", 3)]
    #[case::id_at_limit("67108864 0\n", 1)]
    fn malformed_lines_report_their_number(#[case] input: &str, #[case] expected: usize) {
        let err = read_edge_list(input.as_bytes()).expect_err("input is malformed");
        assert!(
            matches!(err, EdgeListError::Parse { line, .. } if line == expected),
            "unexpected error {err:?}"
        );
    }

    #[test]
    fn empty_input_is_empty_graph() {
        let graph = read_edge_list("# nothing\n".as_bytes()).expect("valid list");
        assert_eq!(graph.vertex_count(), 0);
    }
}
