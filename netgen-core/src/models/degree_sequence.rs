//! Realization of exact degree sequences, explicit or drawn from a power law.

use std::collections::HashSet;

use tracing::{instrument, warn};

use crate::{
    error::{NetgenError, Result},
    graph::{DisjointSet, Graph, GraphBuilder},
    random::RandomSource,
};

use super::{Generator, ModelKind, check_at_least, check_positive};

/// Default number of double-edge swap attempts per edge.
const DEFAULT_SWAPS_PER_EDGE: usize = 10;

/// Turns a degree sequence into a simple connected graph with exactly those
/// degrees.
pub trait SequenceRealizer {
    /// Realizes `degrees`, where entry `v` is the degree of vertex `v`.
    ///
    /// # Errors
    /// Returns [`NetgenError::UnrealizableSequence`] when no simple connected
    /// graph has this degree sequence.
    fn realize(&self, degrees: &[usize], rng: &mut RandomSource) -> Result<Graph>;
}

/// Deterministic Havel–Hakimi construction followed by random
/// degree-preserving double-edge swaps and, if needed, swaps that merge
/// components.
///
/// Each swap replaces edges `(a, b)` and `(c, d)` by `(a, d)` and `(c, b)`,
/// so every degree is preserved. Merging picks an edge on a cycle, whose
/// removal keeps its component intact, and swaps it with an edge of another
/// component.
///
/// # Examples
/// ```
/// use netgen_core::{HavelHakimi, RandomSource, SequenceRealizer};
///
/// let mut rng = RandomSource::seed_from_u64(1);
/// let graph = HavelHakimi::default().realize(&[3, 3, 3, 3], &mut rng)?;
/// assert_eq!(graph.edge_count(), 6);
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HavelHakimi {
    swaps_per_edge: usize,
}

impl Default for HavelHakimi {
    fn default() -> Self {
        Self {
            swaps_per_edge: DEFAULT_SWAPS_PER_EDGE,
        }
    }
}

impl HavelHakimi {
    /// Sets how many random swaps are attempted per edge; zero keeps the
    /// deterministic construction apart from component merging.
    #[must_use]
    pub fn with_swaps_per_edge(mut self, swaps_per_edge: usize) -> Self {
        self.swaps_per_edge = swaps_per_edge;
        self
    }

    /// Returns the number of swap attempts per edge.
    #[must_use]
    pub fn swaps_per_edge(&self) -> usize {
        self.swaps_per_edge
    }
}

impl SequenceRealizer for HavelHakimi {
    fn realize(&self, degrees: &[usize], rng: &mut RandomSource) -> Result<Graph> {
        check_connected_sequence(degrees)?;
        let mut edges = EdgeSet::havel_hakimi(degrees)?;
        edges.shuffle(self.swaps_per_edge, rng)?;
        edges.merge_components(degrees.len())?;

        let mut builder = GraphBuilder::with_vertices(degrees.len(), false);
        for &(source, target) in &edges.edges {
            builder.insert_unchecked(source, target);
        }
        Ok(builder.build())
    }
}

/// Rejects sequences that cannot belong to a simple connected graph whatever
/// the wiring.
fn check_connected_sequence(degrees: &[usize]) -> Result<()> {
    let vertex_count = degrees.len();
    let total: usize = degrees.iter().sum();
    if total % 2 != 0 {
        return Err(NetgenError::unrealizable(format!(
            "degree sum {total} is odd"
        )));
    }
    if let Some((vertex, &degree)) = degrees
        .iter()
        .enumerate()
        .find(|&(_, &degree)| degree >= vertex_count)
    {
        return Err(NetgenError::unrealizable(format!(
            "vertex {vertex} has degree {degree} but only {} other vertices exist",
            vertex_count - 1
        )));
    }
    if vertex_count >= 2 {
        if let Some(vertex) = degrees.iter().position(|&degree| degree == 0) {
            return Err(NetgenError::unrealizable(format!(
                "vertex {vertex} has degree 0 and cannot be connected"
            )));
        }
        if total < 2 * (vertex_count - 1) {
            return Err(NetgenError::unrealizable(format!(
                "degree sum {total} is below the {} a connected graph on {vertex_count} vertices needs",
                2 * (vertex_count - 1)
            )));
        }
    }
    Ok(())
}

/// Undirected edges with a canonical membership index.
struct EdgeSet {
    edges: Vec<(usize, usize)>,
    index: HashSet<(usize, usize)>,
}

impl EdgeSet {
    /// Connects the vertex with the largest residual degree to the vertices
    /// with the next largest residuals until every residual is zero.
    fn havel_hakimi(degrees: &[usize]) -> Result<Self> {
        let mut residual = degrees.to_vec();
        let mut set = Self {
            edges: Vec::with_capacity(degrees.iter().sum::<usize>() / 2),
            index: HashSet::new(),
        };
        let mut order: Vec<usize> = (0..degrees.len()).collect();
        loop {
            order.sort_by(|&a, &b| residual[b].cmp(&residual[a]).then(a.cmp(&b)));
            let Some(&hub) = order.first() else {
                break;
            };
            let wanted = residual[hub];
            if wanted == 0 {
                break;
            }
            residual[hub] = 0;
            let partners = &order[1..];
            if partners
                .get(wanted - 1)
                .is_none_or(|&partner| residual[partner] == 0)
            {
                return Err(NetgenError::unrealizable(format!(
                    "sequence is not graphical: vertex {hub} needs {wanted} more neighbours"
                )));
            }
            for &partner in &partners[..wanted] {
                residual[partner] -= 1;
                set.insert(hub, partner);
            }
        }
        Ok(set)
    }

    fn insert(&mut self, source: usize, target: usize) {
        self.edges.push((source, target));
        self.index.insert(canonical(source, target));
    }

    fn contains(&self, source: usize, target: usize) -> bool {
        self.index.contains(&canonical(source, target))
    }

    fn replace(&mut self, position: usize, source: usize, target: usize) {
        let (old_source, old_target) = self.edges[position];
        self.index.remove(&canonical(old_source, old_target));
        self.index.insert(canonical(source, target));
        self.edges[position] = (source, target);
    }

    /// Attempts `swaps_per_edge · |E|` random double-edge swaps, skipping any
    /// that would create a self-loop or a duplicate edge.
    fn shuffle(&mut self, swaps_per_edge: usize, rng: &mut RandomSource) -> Result<()> {
        let edge_count = self.edges.len();
        if edge_count < 2 {
            return Ok(());
        }
        for _ in 0..swaps_per_edge * edge_count {
            let first = rng.index(edge_count)?;
            let second = rng.index(edge_count)?;
            if first == second {
                continue;
            }
            let (a, b) = self.edges[first];
            let (mut c, mut d) = self.edges[second];
            if rng.bernoulli(0.5) {
                std::mem::swap(&mut c, &mut d);
            }
            if a == d || c == b || self.contains(a, d) || self.contains(c, b) {
                continue;
            }
            self.replace(first, a, d);
            self.replace(second, c, b);
        }
        Ok(())
    }

    /// Joins components one at a time by swapping a cycle edge `(a, b)` with
    /// an edge `(c, d)` elsewhere into `(a, c)` and `(b, d)`.
    fn merge_components(&mut self, vertex_count: usize) -> Result<()> {
        loop {
            let mut components = DisjointSet::new(vertex_count);
            let mut cycle_edge = None;
            for (position, &(source, target)) in self.edges.iter().enumerate() {
                if !components.union(source, target) && cycle_edge.is_none() {
                    cycle_edge = Some(position);
                }
            }
            if components.components() <= 1 {
                return Ok(());
            }
            let Some(cycle_position) = cycle_edge else {
                return Err(NetgenError::unrealizable(
                    "every component is a tree, so components cannot be merged",
                ));
            };
            let (a, b) = self.edges[cycle_position];
            let home = components.find(a);
            let other = (0..self.edges.len()).find(|&position| {
                let (source, _) = self.edges[position];
                components.find(source) != home
            });
            let Some(other_position) = other else {
                return Err(NetgenError::unrealizable(
                    "disconnected vertices have no edges to swap",
                ));
            };
            let (c, d) = self.edges[other_position];
            self.replace(cycle_position, a, c);
            self.replace(other_position, b, d);
        }
    }
}

fn canonical(source: usize, target: usize) -> (usize, usize) {
    if source <= target {
        (source, target)
    } else {
        (target, source)
    }
}

/// Realizes an explicit degree sequence; the sequence length must equal the
/// requested vertex count.
///
/// # Examples
/// ```
/// use netgen_core::{DegreeSequence, Generator, RandomSource};
///
/// let mut rng = RandomSource::seed_from_u64(3);
/// let graph = DegreeSequence::new(vec![2, 2, 2, 2, 2])?.generate(5, &mut rng)?;
/// assert!(graph.is_connected());
/// assert_eq!(graph.degree_sequence(), &[2, 2, 2, 2, 2]);
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DegreeSequence<R = HavelHakimi> {
    degrees: Vec<usize>,
    realizer: R,
}

impl DegreeSequence {
    /// Creates the model with the default [`HavelHakimi`] realizer.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] for an empty sequence.
    pub fn new(degrees: Vec<usize>) -> Result<Self> {
        if degrees.is_empty() {
            return Err(NetgenError::invalid(
                ModelKind::DegreeSequence,
                "degrees",
                "sequence is empty",
            ));
        }
        Ok(Self {
            degrees,
            realizer: HavelHakimi::default(),
        })
    }
}

impl<R> DegreeSequence<R> {
    /// Replaces the realizer.
    #[must_use]
    pub fn with_realizer<S: SequenceRealizer>(self, realizer: S) -> DegreeSequence<S> {
        DegreeSequence {
            degrees: self.degrees,
            realizer,
        }
    }

    /// Returns the target degrees.
    #[must_use]
    pub fn degrees(&self) -> &[usize] {
        &self.degrees
    }
}

impl<R: SequenceRealizer> Generator for DegreeSequence<R> {
    fn kind(&self) -> ModelKind {
        ModelKind::DegreeSequence
    }

    #[instrument(
        name = "netgen.generate.degree_sequence",
        err,
        skip(self, rng),
        fields(length = self.degrees.len()),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        if self.degrees.len() != vertex_count {
            return Err(NetgenError::invalid(
                ModelKind::DegreeSequence,
                "degrees",
                format!(
                    "sequence has {} entries for {vertex_count} vertices",
                    self.degrees.len()
                ),
            ));
        }
        self.realizer.realize(&self.degrees, rng)
    }
}

/// A degree sequence drawn by [`ConfigurationScaleFree`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawnSequence {
    degrees: Vec<usize>,
    parity_adjusted: bool,
}

impl DrawnSequence {
    /// Returns the drawn degrees.
    #[must_use]
    pub fn degrees(&self) -> &[usize] {
        &self.degrees
    }

    /// Returns whether the first entry was incremented to make the sum even.
    #[must_use]
    pub fn parity_adjusted(&self) -> bool {
        self.parity_adjusted
    }

    /// Consumes the draw and returns the degrees.
    #[must_use]
    pub fn into_degrees(self) -> Vec<usize> {
        self.degrees
    }
}

/// Draws `n` degrees independently from `P(k) ∝ k^(−exponent)` over
/// `min_degree..n` and realizes them.
///
/// An odd draw has its first entry incremented so the sum is even; the
/// correction is logged at `warn` level and recorded in
/// [`DrawnSequence::parity_adjusted`].
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigurationScaleFree<R = HavelHakimi> {
    exponent: f64,
    min_degree: usize,
    realizer: R,
}

impl ConfigurationScaleFree {
    /// Creates the model with the default [`HavelHakimi`] realizer.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] when the exponent is not
    /// positive or `min_degree` is zero.
    pub fn new(exponent: f64, min_degree: usize) -> Result<Self> {
        let kind = ModelKind::ConfigurationScaleFree;
        check_positive(kind, "exponent", exponent)?;
        check_at_least(kind, "min_degree", min_degree, 1)?;
        Ok(Self {
            exponent,
            min_degree,
            realizer: HavelHakimi::default(),
        })
    }
}

impl<R> ConfigurationScaleFree<R> {
    /// Replaces the realizer.
    #[must_use]
    pub fn with_realizer<S: SequenceRealizer>(self, realizer: S) -> ConfigurationScaleFree<S> {
        ConfigurationScaleFree {
            exponent: self.exponent,
            min_degree: self.min_degree,
            realizer,
        }
    }

    /// Returns the power-law exponent.
    #[must_use]
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Returns the smallest degree that can be drawn.
    #[must_use]
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Draws the degree sequence for `vertex_count` vertices; its sum is
    /// always even.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidModelParameter`] when
    /// `min_degree ≥ vertex_count`, leaving no degree to draw.
    pub fn draw_degree_sequence(
        &self,
        vertex_count: usize,
        rng: &mut RandomSource,
    ) -> Result<DrawnSequence> {
        if self.min_degree >= vertex_count {
            return Err(NetgenError::invalid(
                ModelKind::ConfigurationScaleFree,
                "min_degree",
                format!(
                    "minimum degree {} leaves no admissible degree below {vertex_count}",
                    self.min_degree
                ),
            ));
        }
        let weights: Vec<f64> = (self.min_degree..vertex_count)
            .map(|degree| (degree as f64).powf(-self.exponent))
            .collect();
        let mut degrees: Vec<usize> = rng
            .choose_with_replacement(&weights, vertex_count)?
            .into_iter()
            .map(|offset| self.min_degree + offset)
            .collect();

        let total: usize = degrees.iter().sum();
        let parity_adjusted = total % 2 != 0;
        if parity_adjusted {
            degrees[0] += 1;
            warn!(
                original_sum = total,
                first_degree = degrees[0],
                "odd degree sum; incremented the first degree"
            );
        }
        Ok(DrawnSequence {
            degrees,
            parity_adjusted,
        })
    }
}

impl<R: SequenceRealizer> Generator for ConfigurationScaleFree<R> {
    fn kind(&self) -> ModelKind {
        ModelKind::ConfigurationScaleFree
    }

    #[instrument(
        name = "netgen.generate.configuration_sf",
        err,
        skip(self, rng),
        fields(exponent = self.exponent, min_degree = self.min_degree),
    )]
    fn generate(&self, vertex_count: usize, rng: &mut RandomSource) -> Result<Graph> {
        let drawn = self.draw_degree_sequence(vertex_count, rng)?;
        self.realizer.realize(drawn.degrees(), rng)
    }
}
