use crate::error::ConfigurationError;
use tracing::debug;

/// Smallest roughing step the three-decimal output can express.
pub const MIN_ROUGH_STEP: f64 = 0.001;

/// Most roughing passes a single plan may contain.
pub const MAX_ROUGH_PASSES: usize = 100_000;

/// Round to the three decimals every emitted coordinate carries.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Plan roughing diameters from `stock_diameter` down towards the pre-finish
/// diameter `finish_diameter + finish_allowance`.
///
/// Each pass removes `rough_step` from the previous diameter. A pass is kept
/// only while its rounded diameter stays strictly above the rounded pre-finish
/// diameter, so the result is strictly decreasing and may be empty.
///
/// Fails when the plan would exceed [`MAX_ROUGH_PASSES`], or when a step no
/// longer changes the rounded diameter (diameters too large for `f64` to
/// resolve the step).
pub fn plan_roughing_passes(
    stock_diameter: f64,
    finish_diameter: f64,
    finish_allowance: f64,
    rough_step: f64,
) -> Result<Vec<f64>, ConfigurationError> {
    for (name, value) in [
        ("stock_diameter", stock_diameter),
        ("finish_diameter", finish_diameter),
        ("finish_allowance", finish_allowance),
        ("rough_step", rough_step),
    ] {
        if !value.is_finite() {
            return Err(ConfigurationError::NotFinite { name });
        }
    }
    if rough_step <= 0.0 {
        return Err(ConfigurationError::NonPositive {
            name: "rough_step",
            value: rough_step,
        });
    }
    if rough_step < MIN_ROUGH_STEP {
        return Err(ConfigurationError::BelowResolution {
            name: "rough_step",
            value: rough_step,
        });
    }

    let target = round3(finish_diameter + finish_allowance);
    let estimate = ((stock_diameter - target) / rough_step).ceil();
    if estimate > MAX_ROUGH_PASSES as f64 {
        return Err(ConfigurationError::TooManyPasses {
            passes: estimate,
            limit: MAX_ROUGH_PASSES,
        });
    }

    let mut diameters = Vec::new();
    let mut current = stock_diameter;
    loop {
        let next = round3(current - rough_step);
        if next <= target {
            break;
        }
        if next >= current {
            return Err(ConfigurationError::BelowResolution {
                name: "rough_step",
                value: rough_step,
            });
        }
        diameters.push(next);
        current = next;
    }

    debug!(
        stock_diameter,
        target,
        passes = diameters.len(),
        "planned roughing passes"
    );
    Ok(diameters)
}
