use proptest::prelude::*;
use resell_dashboard::core::{AxisPolicy, nice_range, percentage_range};

proptest! {
    #[test]
    fn nice_max_is_strictly_above_data_max(data_max in 0.000_1f64..1_000_000_000.0) {
        let plan = nice_range(data_max);
        prop_assert!(plan.max_value > data_max);
    }

    #[test]
    fn nice_max_is_a_multiple_of_tick_step(data_max in 0.000_1f64..1_000_000_000.0) {
        let plan = nice_range(data_max);
        prop_assert!(plan.tick_step >= 1.0);
        prop_assert_eq!(plan.max_value % plan.tick_step, 0.0);
    }

    #[test]
    fn nice_max_adds_at_most_one_step(data_max in 0.000_1f64..1_000_000_000.0) {
        let plan = nice_range(data_max);
        prop_assert!(plan.max_value - data_max <= plan.tick_step * (1.0 + 1e-9));
    }

    #[test]
    fn percentage_end_is_multiple_of_ten_and_at_least_one_hundred(
        data_max in -1_000.0f64..10_000.0
    ) {
        let plan = percentage_range(data_max);
        prop_assert!(plan.max_value >= 100.0);
        prop_assert_eq!(plan.max_value % 10.0, 0.0);
    }

    #[test]
    fn resolved_ticks_are_ascending_multiples_within_range(
        data_max in 0.0f64..1_000_000.0,
        headroom in 1.0f64..1.5
    ) {
        for policy in [AxisPolicy::Nice, AxisPolicy::Percentage] {
            let axis = policy.resolve(data_max, headroom);
            prop_assert_eq!(axis.ticks.first().copied(), Some(0.0));
            for pair in axis.ticks.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], axis.plan.tick_step);
            }
            let last = axis.ticks.last().copied().unwrap_or_default();
            prop_assert!(last <= axis.range.end);
            prop_assert!(last + axis.plan.tick_step > axis.range.end);
        }
    }
}
