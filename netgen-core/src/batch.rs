//! Parallel generation of independent graphs from one model.

use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{error::Result, graph::Graph, models::Generator, random::RandomSource};

/// Generates `count` graphs of `vertex_count` vertices in parallel.
///
/// Graph `i` is drawn from [`RandomSource::for_worker`]`(base_seed, i)`, so
/// the batch is identical whatever the thread pool size or scheduling.
/// The first failure, in index order, is returned.
///
/// # Errors
/// Propagates the generator's error.
///
/// # Examples
/// ```
/// use netgen_core::{BarabasiAlbert, generate_batch};
///
/// let model = BarabasiAlbert::new(2)?;
/// let graphs = generate_batch(&model, 50, 7, 4)?;
/// assert_eq!(graphs.len(), 4);
/// assert_ne!(graphs[0].edge_list(), graphs[1].edge_list());
/// # Ok::<(), netgen_core::NetgenError>(())
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
#[instrument(
    name = "netgen.batch",
    err,
    skip(generator),
    fields(model = %generator.kind()),
)]
pub fn generate_batch<G: Generator + Sync + ?Sized>(
    generator: &G,
    vertex_count: usize,
    base_seed: u64,
    count: usize,
) -> Result<Vec<Graph>> {
    let graphs = (0..count)
        .into_par_iter()
        .map(|index| {
            let mut rng = RandomSource::for_worker(base_seed, index);
            generator.generate(vertex_count, &mut rng)
        })
        .collect::<Result<Vec<_>>>()?;
    info!(graphs = graphs.len(), "batch generated");
    Ok(graphs)
}
