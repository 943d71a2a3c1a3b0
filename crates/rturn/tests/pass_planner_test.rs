use rturn::*;

/// Passes that fit strictly between stock and target, counted directly.
fn expected_pass_count(stock: f64, target: f64, step: f64) -> usize {
    let mut count = 0;
    while stock - (count + 1) as f64 * step > target {
        count += 1;
    }
    count
}

#[test]
fn test_passes_strictly_decreasing_and_above_target() {
    let cases = [
        (22.0, 20.0, 0.2, 1.0),
        (30.0, 20.0, 0.5, 0.25),
        (22.0, 20.0, 0.2, 0.3),
        (100.0, 12.5, 0.0, 2.0),
        (40.0, 36.0, 1.0, 0.125),
    ];

    for (stock, finish, allowance, step) in cases {
        let passes = plan_roughing_passes(stock, finish, allowance, step)
            .expect("valid parameters should plan");
        let target = round3(finish + allowance);

        assert!(
            passes.windows(2).all(|w| w[0] > w[1]),
            "passes should be strictly decreasing: {passes:?}"
        );
        assert!(
            passes.iter().all(|d| *d > target),
            "every pass should stay above {target}: {passes:?}"
        );
        if let Some(first) = passes.first() {
            assert!(*first < stock, "first pass should cut into the stock");
        }
    }
}

#[test]
fn test_pass_count_at_exact_multiples() {
    // 22 -> 20 in steps of 1: 21 is kept, 20 equals the target and is not.
    let passes = plan_roughing_passes(22.0, 20.0, 0.0, 1.0).unwrap();
    assert_eq!(passes, vec![21.0]);
    assert_eq!(passes.len(), expected_pass_count(22.0, 20.0, 1.0));

    // 22 -> 20.5 in steps of 0.5: 21.5 and 21.0.
    let passes = plan_roughing_passes(22.0, 20.0, 0.5, 0.5).unwrap();
    assert_eq!(passes, vec![21.5, 21.0]);

    // One quarter lower target lets 20.5 through.
    let passes = plan_roughing_passes(22.0, 20.0, 0.25, 0.5).unwrap();
    assert_eq!(passes, vec![21.5, 21.0, 20.5]);
    assert_eq!(passes.len(), expected_pass_count(22.0, 20.25, 0.5));
}

#[test]
fn test_pass_count_matches_step_count() {
    for (stock, target, step) in [(30.0, 20.0, 0.25), (50.0, 10.0, 4.0), (50.0, 10.5, 4.0)] {
        let passes = plan_roughing_passes(stock, target, 0.0, step).unwrap();
        assert_eq!(
            passes.len(),
            expected_pass_count(stock, target, step),
            "stock {stock}, target {target}, step {step}"
        );
    }
}

#[test]
fn test_inexact_step_does_not_reach_target() {
    // 0.3 is not representable; rounding keeps the schedule on the 0.001 grid.
    let passes = plan_roughing_passes(22.0, 20.0, 0.2, 0.3).unwrap();
    assert_eq!(passes, vec![21.7, 21.4, 21.1, 20.8, 20.5]);
}

#[test]
fn test_stock_below_target_plans_nothing() {
    let passes = plan_roughing_passes(20.1, 20.0, 0.2, 1.0).unwrap();
    assert!(passes.is_empty());
}

#[test]
fn test_non_positive_step_fails_fast() {
    for step in [0.0, -1.0] {
        let err = plan_roughing_passes(22.0, 20.0, 0.2, step).unwrap_err();
        assert!(
            matches!(err, ConfigurationError::NonPositive { name: "rough_step", .. }),
            "step {step} should be rejected, got {err:?}"
        );
    }

    let err = plan_roughing_passes(22.0, 20.0, 0.2, f64::INFINITY).unwrap_err();
    assert_eq!(err, ConfigurationError::NotFinite { name: "rough_step" });
}

#[test]
fn test_step_lost_in_large_diameter_fails() {
    // At 1e15 the f64 spacing is 0.125, so a 0.01 step never moves the diameter.
    let err = plan_roughing_passes(1e15 + 2.0, 1e15, 0.2, 0.01).unwrap_err();
    assert!(
        matches!(err, ConfigurationError::BelowResolution { name: "rough_step", .. }),
        "unresolvable step should be rejected, got {err:?}"
    );
}

#[test]
fn test_pass_count_is_capped() {
    // 2e6 mm of allowance at the finest step is about 2e9 passes.
    let err = plan_roughing_passes(2_000_022.0, 20.0, 0.2, MIN_ROUGH_STEP).unwrap_err();
    assert!(
        matches!(err, ConfigurationError::TooManyPasses { limit: MAX_ROUGH_PASSES, .. }),
        "oversized plan should be rejected, got {err:?}"
    );

    // Just under the limit still plans: 120 -> 20.2 at 0.001 is 99,799 passes.
    let passes = plan_roughing_passes(120.0, 20.0, 0.2, MIN_ROUGH_STEP).unwrap();
    assert!(passes.len() > 99_000 && passes.len() < MAX_ROUGH_PASSES);
}

#[test]
fn test_non_finite_diameters_rejected() {
    let err = plan_roughing_passes(f64::NAN, 20.0, 0.2, 1.0).unwrap_err();
    assert_eq!(err, ConfigurationError::NotFinite { name: "stock_diameter" });

    let err = plan_roughing_passes(22.0, 20.0, f64::INFINITY, 1.0).unwrap_err();
    assert_eq!(err, ConfigurationError::NotFinite { name: "finish_allowance" });
}
