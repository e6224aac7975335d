pub mod errors;
pub mod utils;
pub mod models;
pub mod interactions;
pub mod scheduling;
pub mod apis;

/// Fails the test when `actual` is not within `tolerance` of `expected`.
#[cfg(test)]
pub(crate) fn assert_close(actual: f64, expected: f64, tolerance: f64, context: Option<&str>) {
    let difference = (actual - expected).abs();
    assert!(
        difference < tolerance,
        "{}: got {}, expected {} (off by {}, tolerance {})",
        context.unwrap_or("values differ"),
        actual,
        expected,
        difference,
        tolerance
    );
}
