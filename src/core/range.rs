use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Plan returned for an empty or all-zero axis.
pub const EMPTY_AXIS_PLAN: AxisPlan = AxisPlan {
    max_value: 10.0,
    tick_step: 1.0,
};

/// Lower bound for the end of a percentage axis before rounding.
pub const PERCENT_AXIS_FLOOR: f64 = 100.0;
pub const PERCENT_AXIS_STEP: f64 = 10.0;

/// Rounded axis maximum with its tick step.
///
/// `tick_step` is never below 1, so ticks are always integral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisPlan {
    pub max_value: f64,
    pub tick_step: f64,
}

/// Computes the "nice" maximum and tick step for a data maximum.
///
/// The maximum is the smallest multiple of the step strictly above `data_max`.
/// The step is half the leading power of ten (`734` plans with step `50`),
/// or `1` below two digits. Negative and non-finite maxima plan like zero.
#[must_use]
pub fn nice_range(data_max: f64) -> AxisPlan {
    if !data_max.is_finite() || data_max <= 0.0 {
        return EMPTY_AXIS_PLAN;
    }

    let magnitude = leading_power_of_ten(data_max.floor());
    let tick_step = if magnitude >= 10.0 {
        magnitude / 2.0
    } else {
        1.0
    };
    AxisPlan {
        max_value: ((data_max / tick_step).floor() + 1.0) * tick_step,
        tick_step,
    }
}

/// Plans a percentage axis: at least 100, rounded up past the next multiple of 10.
#[must_use]
pub fn percentage_range(data_max: f64) -> AxisPlan {
    let floor = if data_max.is_finite() {
        data_max.max(PERCENT_AXIS_FLOOR)
    } else {
        PERCENT_AXIS_FLOOR
    };
    AxisPlan {
        max_value: ((floor / PERCENT_AXIS_STEP).floor() + 1.0) * PERCENT_AXIS_STEP,
        tick_step: PERCENT_AXIS_STEP,
    }
}

/// `10^(digits - 1)` for the integer part of a value `>= 0`.
fn leading_power_of_ten(whole: f64) -> f64 {
    if whole < 10.0 {
        return 1.0;
    }
    let mut exponent = whole.log10().floor() as i32;
    // log10 can land one off next to exact powers of ten.
    if 10f64.powi(exponent) > whole {
        exponent -= 1;
    } else if 10f64.powi(exponent + 1) <= whole {
        exponent += 1;
    }
    10f64.powi(exponent)
}

/// Largest finite value in `values`, or `0.0` when there is none.
#[must_use]
pub fn finite_max(values: impl IntoIterator<Item = f64>) -> f64 {
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .map(OrderedFloat)
        .max()
        .map_or(0.0, |max| max.0)
}

/// Every multiple of `step` from 0 up to `end` inclusive.
#[must_use]
pub fn tick_marks(end: f64, step: f64) -> Vec<f64> {
    if !end.is_finite() || end < 0.0 || !step.is_finite() || step <= 0.0 {
        return Vec::new();
    }
    let mut count = (end / step).floor() as usize;
    // Division can round up onto the next multiple.
    if count as f64 * step > end {
        count = count.saturating_sub(1);
    }
    (0..=count).map(|index| index as f64 * step).collect()
}

/// How an axis turns a data maximum into a visible range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisPolicy {
    /// `nice_range` followed by the configured headroom multiplier.
    Nice,
    /// `percentage_range` without headroom.
    Percentage,
}

/// Visible numeric range of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub start: f64,
    pub end: f64,
}

impl AxisRange {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }
}

/// Fully resolved axis: plan, range and tick positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisState {
    pub plan: AxisPlan,
    pub range: AxisRange,
    pub ticks: Vec<f64>,
}

impl AxisPolicy {
    /// Resolves the axis for `data_max`. `headroom` only applies to `Nice`.
    #[must_use]
    pub fn resolve(self, data_max: f64, headroom: f64) -> AxisState {
        let (plan, end) = match self {
            Self::Nice => {
                let plan = nice_range(data_max);
                (plan, plan.max_value * headroom)
            }
            Self::Percentage => {
                let plan = percentage_range(data_max);
                (plan, plan.max_value)
            }
        };
        AxisState {
            plan,
            range: AxisRange::new(0.0, end),
            ticks: tick_marks(end, plan.tick_step),
        }
    }
}

impl Default for AxisState {
    fn default() -> Self {
        AxisPolicy::Nice.resolve(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisPolicy, finite_max, leading_power_of_ten, nice_range, percentage_range, tick_marks};

    #[test]
    fn leading_power_is_exact_at_powers_of_ten() {
        assert_eq!(leading_power_of_ten(9.0), 1.0);
        assert_eq!(leading_power_of_ten(10.0), 10.0);
        assert_eq!(leading_power_of_ten(999.0), 100.0);
        assert_eq!(leading_power_of_ten(1000.0), 1000.0);
        assert_eq!(leading_power_of_ten(1_000_000.0), 1_000_000.0);
    }

    #[test]
    fn single_digit_values_use_unit_step() {
        let plan = nice_range(7.4);
        assert_eq!(plan.tick_step, 1.0);
        assert_eq!(plan.max_value, 8.0);

        let fraction = nice_range(0.3);
        assert_eq!(fraction.tick_step, 1.0);
        assert_eq!(fraction.max_value, 1.0);
    }

    #[test]
    fn exact_multiple_still_gets_a_tick_above() {
        let plan = nice_range(50.0);
        assert_eq!(plan.tick_step, 5.0);
        assert_eq!(plan.max_value, 55.0);
    }

    #[test]
    fn negative_and_nan_maxima_plan_like_zero() {
        assert_eq!(nice_range(-40.0), nice_range(0.0));
        assert_eq!(nice_range(f64::NAN), nice_range(0.0));
    }

    #[test]
    fn percentage_axis_rounds_past_next_ten() {
        assert_eq!(percentage_range(33.3).max_value, 110.0);
        assert_eq!(percentage_range(100.0).max_value, 110.0);
        assert_eq!(percentage_range(123.4).max_value, 130.0);
        assert_eq!(percentage_range(f64::NAN).max_value, 110.0);
    }

    #[test]
    fn tick_marks_are_inclusive_and_stop_at_end() {
        assert_eq!(tick_marks(10.5, 5.0), vec![0.0, 5.0, 10.0]);
        assert_eq!(tick_marks(10.0, 5.0), vec![0.0, 5.0, 10.0]);
        assert!(tick_marks(10.0, 0.0).is_empty());
    }

    #[test]
    fn nice_policy_applies_headroom_to_range_only() {
        let axis = AxisPolicy::Nice.resolve(734.0, 1.05);
        assert_eq!(axis.plan.max_value, 750.0);
        assert!((axis.range.end - 787.5).abs() <= 1e-9);
        assert_eq!(axis.ticks.last().copied(), Some(750.0));
        assert_eq!(axis.ticks.len(), 16);
    }

    #[test]
    fn percentage_policy_ignores_headroom() {
        let axis = AxisPolicy::Percentage.resolve(42.0, 1.05);
        assert_eq!(axis.range.end, 110.0);
        assert_eq!(axis.ticks.len(), 12);
    }

    #[test]
    fn finite_max_skips_nan_and_defaults_to_zero() {
        assert_eq!(finite_max([1.0, f64::NAN, 3.0]), 3.0);
        assert_eq!(finite_max([f64::NAN]), 0.0);
        assert_eq!(finite_max(std::iter::empty()), 0.0);
    }
}
