//! Property suites over randomly drawn parameters and seeds.

mod common;

use netgen_core::{
    BarabasiAlbert, ConfigurationScaleFree, ErdosRenyi, Generator, RandomSource, WattsStrogatz,
};
use netgen_test_support::proptest_profile::ProptestRunProfile;
use proptest::{
    prop_assert, prop_assert_eq,
    strategy::Strategy,
    test_runner::{Config as ProptestConfig, TestCaseResult, TestRunner},
};

use common::assert_simple;

const DEFAULT_CASES: u32 = 64;

fn suite_config() -> ProptestConfig {
    let profile = ProptestRunProfile::load(DEFAULT_CASES, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

fn run<S, F>(strategy: S, property: F)
where
    S: Strategy,
    S::Value: std::fmt::Debug,
    F: Fn(S::Value) -> TestCaseResult,
{
    let mut runner = TestRunner::new(suite_config());
    if let Err(err) = runner.run(&strategy, property) {
        panic!("{err}");
    }
}

#[test]
fn drawn_degree_sequences_have_even_sums() {
    let strategy = (2.05_f64..3.5, 1_usize..4, 5_usize..200, proptest::num::u64::ANY);
    run(strategy, |(exponent, min_degree, vertex_count, seed)| {
        let model = ConfigurationScaleFree::new(exponent, min_degree).expect("valid parameters");
        let mut rng = RandomSource::seed_from_u64(seed);
        let drawn = model
            .draw_degree_sequence(vertex_count, &mut rng)
            .expect("min degree is below the vertex count");
        let total: usize = drawn.degrees().iter().sum();
        prop_assert_eq!(total % 2, 0);
        prop_assert_eq!(drawn.degrees().len(), vertex_count);
        prop_assert!(drawn.degrees().iter().all(|&degree| degree >= min_degree));
        prop_assert!(
            drawn.degrees()[1..]
                .iter()
                .all(|&degree| degree < vertex_count)
        );
        Ok(())
    });
}

#[test]
fn erdos_renyi_graphs_are_simple() {
    let strategy = (0.0_f64..=1.0, 0_usize..60, proptest::bool::ANY, proptest::num::u64::ANY);
    run(strategy, |(probability, vertex_count, directed, seed)| {
        let model = ErdosRenyi::new(probability)
            .expect("probability in range")
            .with_directed(directed)
            .with_force_connected(true);
        let graph = model
            .generate(vertex_count, &mut RandomSource::seed_from_u64(seed))
            .expect("generation succeeds");
        assert_simple(&graph);
        if vertex_count >= 2 {
            prop_assert!(graph.min_degree() >= Some(1));
        }
        Ok(())
    });
}

#[test]
fn preferential_attachment_adds_m_edges_per_vertex() {
    let strategy = (1_usize..5, 0_usize..80, proptest::num::u64::ANY);
    run(strategy, |(edges_per_vertex, extra, seed)| {
        let vertex_count = edges_per_vertex + 1 + extra;
        let graph = BarabasiAlbert::new(edges_per_vertex)
            .expect("valid m")
            .generate(vertex_count, &mut RandomSource::seed_from_u64(seed))
            .expect("generation succeeds");
        assert_simple(&graph);
        prop_assert!(graph.is_connected());
        prop_assert!(graph.min_degree() >= Some(edges_per_vertex));
        Ok(())
    });
}

#[test]
fn rewiring_preserves_the_edge_count() {
    let strategy = (1_usize..4, 0.0_f64..=1.0, 0_usize..40, proptest::num::u64::ANY);
    run(strategy, |(radius, rewiring, extra, seed)| {
        let vertex_count = 2 * radius + 1 + extra;
        let graph = WattsStrogatz::new(radius, rewiring)
            .expect("valid parameters")
            .generate(vertex_count, &mut RandomSource::seed_from_u64(seed))
            .expect("ring fits");
        assert_simple(&graph);
        prop_assert_eq!(graph.edge_count(), vertex_count * radius);
        Ok(())
    });
}

#[test]
fn largest_component_is_connected_and_dense() {
    let strategy = (0.0_f64..0.1, 1_usize..80, proptest::num::u64::ANY);
    run(strategy, |(probability, vertex_count, seed)| {
        let graph = ErdosRenyi::new(probability)
            .expect("probability in range")
            .generate(vertex_count, &mut RandomSource::seed_from_u64(seed))
            .expect("generation succeeds");
        let largest = graph.largest_component();
        prop_assert!(largest.is_connected());
        prop_assert!(largest.vertex_count() >= 1);
        prop_assert!(largest.vertex_count() <= graph.vertex_count());
        prop_assert!(
            largest
                .edges()
                .iter()
                .all(|edge| edge.source() < largest.vertex_count()
                    && edge.target() < largest.vertex_count())
        );
        assert_simple(&largest);
        Ok(())
    });
}
