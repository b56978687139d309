//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the usize range, returning 0 for non-finite or negative values.
#[must_use]
pub fn round_f64_to_usize(value: f64) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = cast::<usize, f64>(usize::MAX).unwrap_or(f64::MAX);
    cast::<f64, usize>(value.min(max).round()).unwrap_or(usize::MAX)
}

/// Convert a usize to f64 for ratio math.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(f64::MAX)
}

/// Percentage of `current` over `total`, clamped to `[0, 100]`.
///
/// A non-positive total reads as complete.
#[must_use]
pub fn percent_of(current: f64, total: f64) -> f64 {
    if !current.is_finite() || !total.is_finite() {
        return 0.0;
    }
    if total <= 0.0 {
        return 100.0;
    }
    (current / total * 100.0).clamp(0.0, 100.0)
}

/// Render a mile or hour amount for narration: whole numbers print bare,
/// anything else keeps at most two decimals.
#[must_use]
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        return format!("{rounded:.0}");
    }
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_handles_fractions_and_garbage() {
        assert_eq!(round_f64_to_usize(1.0), 1);
        assert_eq!(round_f64_to_usize(0.25), 0);
        assert_eq!(round_f64_to_usize(3.6), 4);
        assert_eq!(round_f64_to_usize(-2.0), 0);
        assert_eq!(round_f64_to_usize(f64::NAN), 0);
        assert_eq!(round_f64_to_usize(f64::INFINITY), 0);
        assert!((usize_to_f64(40) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_clamps_to_bounds() {
        assert!((percent_of(25.0, 100.0) - 25.0).abs() < f64::EPSILON);
        assert!((percent_of(150.0, 100.0) - 100.0).abs() < f64::EPSILON);
        assert!((percent_of(-5.0, 100.0)).abs() < f64::EPSILON);
        assert!((percent_of(1.0, 0.0) - 100.0).abs() < f64::EPSILON);
        assert!((percent_of(f64::NAN, 10.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn amounts_drop_needless_decimals() {
        assert_eq!(format_amount(24.0), "24");
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(8.0 / 3.0), "2.67");
        assert_eq!(format_amount(0.004), "0");
        assert_eq!(format_amount(f64::INFINITY), "0");
    }
}
