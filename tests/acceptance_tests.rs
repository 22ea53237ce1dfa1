use metropolis::optimizer::{AcceptanceRule, AcceptanceTable, Verdict, MAX_TABLE_SIZE};
use metropolis::RandomSource;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn table_is_strictly_decreasing_inside_unit_interval(
        temperature in 0.2..50.0f64,
        max_delta in 1usize..100,
    ) {
        let table = AcceptanceTable::new(temperature, max_delta);
        prop_assert_eq!(table.lookup(0), Some(1.0));
        prop_assert_eq!(table.max_delta(), Some(max_delta));

        let mut prev = 1.0;
        for d in 1..=max_delta {
            let p = table.lookup(d).unwrap();
            prop_assert!(p > 0.0 && p < 1.0, "p({}) = {} at T={}", d, p, temperature);
            prop_assert!(p < prev, "table not decreasing at {}: {} >= {}", d, p, prev);
            prev = p;
        }
    }

    #[test]
    fn downhill_always_accepted(temperature in 0.0..10.0f64, delta in -1000i64..=0, seed in any::<u64>()) {
        let rule = AcceptanceRule::new(temperature, 20);
        let mut rng = RandomSource::with_seed(seed);
        prop_assert_eq!(rule.judge(delta, &mut rng), Verdict::Accept);
    }
}

#[test]
fn test_zero_temperature_rejects_uphill_without_drawing() {
    let rule = AcceptanceRule::new(0.0, 20);
    let mut rng = RandomSource::with_seed(11);
    let mut reference = rng.clone();

    for delta in 1..50i64 {
        assert_eq!(rule.judge(delta, &mut rng), Verdict::Reject);
    }
    assert_eq!(rule.judge(0i64, &mut rng), Verdict::Accept);
    assert_eq!(rule.judge(-3i64, &mut rng), Verdict::Accept);
    assert_eq!(rule.judge(0.5f64, &mut rng), Verdict::Reject);

    // The stream was never consumed.
    assert_eq!(rng.uniform(), reference.uniform());
}

#[test]
fn test_delta_beyond_table_uses_exact_probability() {
    // exp(-50 / 1000) is about 0.95; a zero entry would reject everything.
    let rule = AcceptanceRule::new(1000.0, 2);
    let mut rng = RandomSource::with_seed(5);

    let mut accepted = 0;
    for _ in 0..2000 {
        let verdict = rule.judge(50i64, &mut rng);
        assert!(verdict.outside_table(), "delta 50 should bypass a size-2 table");
        if verdict.accepted() {
            accepted += 1;
        }
    }
    assert!(accepted > 1800, "only {} of 2000 accepted", accepted);
}

#[test]
fn test_continuous_energy_matches_boltzmann_rate() {
    let rule = AcceptanceRule::new(1.0, 0);
    let mut rng = RandomSource::with_seed(99);
    let trials = 20_000;
    let accepted = (0..trials)
        .filter(|_| rule.judge(1.0f64, &mut rng).accepted())
        .count();
    let rate = accepted as f64 / trials as f64;
    let expected = (-1.0f64).exp();
    assert!(
        (rate - expected).abs() < 0.02,
        "acceptance rate {} far from {}",
        rate,
        expected
    );
}

#[test]
fn test_table_matches_direct_formula() {
    let table = AcceptanceTable::new(0.39, 20);
    for d in 0..=20 {
        let direct = table.probability(d as f64);
        assert!((table.lookup(d).unwrap() - direct).abs() < 1e-15);
    }
    assert_eq!(table.lookup(21), None);
}

#[test]
fn test_oversized_table_is_clamped() {
    let table = AcceptanceTable::new(1.0, usize::MAX);
    assert_eq!(table.max_delta(), Some(MAX_TABLE_SIZE));
    assert_eq!(table.lookup(MAX_TABLE_SIZE + 1), None);

    let rule = AcceptanceRule::new(1e9, usize::MAX);
    let mut rng = RandomSource::with_seed(2);
    let verdict = rule.judge((MAX_TABLE_SIZE as i64) * 4, &mut rng);
    assert!(verdict.outside_table());
}
