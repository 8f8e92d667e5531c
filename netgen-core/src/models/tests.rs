//! Cross-model checks: simplicity, determinism and identifier parsing.

use rstest::rstest;

use super::*;
use crate::test_utils::assert_simple;

fn every_model() -> Vec<(ModelKind, Box<dyn Generator>)> {
    let models: Vec<Box<dyn Generator>> = vec![
        Box::new(ErdosRenyi::new(0.1).expect("valid").with_force_connected(true)),
        Box::new(ErdosRenyiAverage::new(4.0).expect("valid").with_directed(true)),
        Box::new(WattsStrogatz::new(2, 0.2).expect("valid")),
        Box::new(WattsStrogatzAverage::new(6.0, 0.5).expect("valid")),
        Box::new(BarabasiAlbert::new(2).expect("valid")),
        Box::new(
            BarabasiAlbertAverage::new(4.0)
                .expect("valid")
                .with_power(1.5)
                .expect("valid"),
        ),
        Box::new(ScaleFreeToRandom::new(0.3, 4, 2).expect("valid")),
        Box::new(Waxman::new(0.2, 0.4).expect("valid").with_force_connected(true)),
        Box::new(
            WaxmanAverage::new(5.0, 0.2)
                .expect("valid")
                .with_tolerance(0.2)
                .expect("valid"),
        ),
        Box::new(SpatialScaleFree::new(3, 2, 0.2).expect("valid")),
        Box::new(SpatialScaleFreeAverage::new(4.0, 0.3).expect("valid")),
        Box::new(DegreeSequence::new(vec![2; 80]).expect("valid")),
        Box::new(ConfigurationScaleFree::new(2.5, 2).expect("valid")),
    ];
    models.into_iter().map(|model| (model.kind(), model)).collect()
}

#[test]
fn every_kind_has_a_model() {
    let kinds: Vec<ModelKind> = every_model().into_iter().map(|(kind, _)| kind).collect();
    assert_eq!(kinds, ModelKind::ALL);
}

#[rstest]
#[case(5)]
#[case(99)]
fn every_model_is_simple_and_deterministic(#[case] seed: u64) {
    for (kind, model) in every_model() {
        let mut first = RandomSource::seed_from_u64(seed);
        let mut second = RandomSource::seed_from_u64(seed);
        let a = model
            .generate(80, &mut first)
            .unwrap_or_else(|err| panic!("{kind} failed: {err}"));
        let b = model
            .generate(80, &mut second)
            .unwrap_or_else(|err| panic!("{kind} failed: {err}"));
        assert_eq!(a.vertex_count(), 80, "{kind}");
        assert_eq!(a.edge_list(), b.edge_list(), "{kind} is not deterministic");
        assert_simple(&a);
    }
}

#[test]
fn identifiers_round_trip() {
    for kind in ModelKind::ALL {
        assert_eq!(kind.as_str().parse::<ModelKind>(), Ok(kind));
        assert_eq!(kind.to_string(), kind.as_str());
    }
}

#[rstest]
#[case("er")]
#[case("ER_AVG")]
#[case("")]
fn identifiers_are_case_sensitive(#[case] raw: &str) {
    assert_eq!(
        raw.parse::<ModelKind>(),
        Err(NetgenError::UnknownModel {
            model: raw.to_owned(),
        })
    );
}

#[rstest]
#[case(4.0, 2)]
#[case(5.0, 3)]
#[case(1.0, 1)]
#[case(0.2, 1)]
fn half_degree_rounds_and_floors_at_one(#[case] average: f64, #[case] expected: usize) {
    assert_eq!(
        half_degree(ModelKind::BarabasiAlbertAverage, average),
        Ok(expected)
    );
}

#[rstest]
#[case(0.0)]
#[case(-2.0)]
#[case(f64::INFINITY)]
#[case(1e30)]
#[case(f64::MAX)]
fn half_degree_rejects_unusable_targets(#[case] average: f64) {
    assert!(half_degree(ModelKind::WattsStrogatzAverage, average).is_err());
}
