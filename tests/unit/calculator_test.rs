// Property-based tests for the derived-metric calculator
//
// - rates are "0%" exactly when the denominator is zero
// - otherwise they are n/d*100 rounded to one decimal
// - deltas never panic, whatever the inputs

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use shop_report::core::{Percentage, PointDelta};
use shop_report::metrics::PeriodAggregate;
use shop_report::reports::services::calculator::{
    avg_price, count_delta, delta, rate, rate_delta, MetricValue, PeriodMetrics,
};

#[test]
fn test_documented_examples() {
    assert_eq!(rate(50, 100).to_string(), "50.0%");
    assert_eq!(rate(7, 0).to_string(), "0%");
    assert_eq!(
        rate_delta(Percentage::from_points(10.0), Percentage::from_points(30.0)).to_string(),
        "20%"
    );
    assert_eq!(
        rate_delta(Percentage::NoBase, Percentage::NoBase).to_string(),
        "0%"
    );
    assert_eq!(avg_price(dec!(100), 0), Decimal::ZERO);
    assert_eq!(avg_price(dec!(150), 3), dec!(50.00));
}

#[test]
fn test_absent_period_yields_zero_metrics() {
    let metrics = PeriodMetrics::new(PeriodAggregate::empty(42));
    assert_eq!(metrics.order_rate, Percentage::NoBase);
    assert_eq!(metrics.review_rate.to_string(), "0%");
    assert_eq!(metrics.avg_order_value, Decimal::ZERO);
    assert_eq!(metrics.promotion_click_price, Decimal::ZERO);
}

#[test]
fn test_metric_value_deltas_by_kind() {
    let count = MetricValue::Count(10).delta_to(&MetricValue::Count(15));
    assert_eq!(count.spreadsheet_value(), 5.0);

    let money = MetricValue::Money(dec!(10.50)).delta_to(&MetricValue::Money(dec!(8.25)));
    assert_eq!(money.spreadsheet_value(), -2.25);

    let points = MetricValue::Rate(Percentage::from_points(12.5))
        .delta_to(&MetricValue::Rate(Percentage::from_points(10.0)));
    assert_eq!(points.spreadsheet_value(), -0.025);
}

proptest! {
    #[test]
    fn test_rate_is_no_base_iff_denominator_is_zero(
        numerator in 0i64..1_000_000,
        denominator in 0i64..1_000_000
    ) {
        let result = rate(numerator, denominator);
        prop_assert_eq!(result == Percentage::NoBase, denominator == 0);
    }

    #[test]
    fn test_rate_is_rounded_to_one_decimal(
        numerator in 0i64..1_000_000,
        denominator in 1i64..1_000_000
    ) {
        let exact = numerator as f64 / denominator as f64 * 100.0;
        let points = rate(numerator, denominator).points();
        prop_assert!((points - exact).abs() <= 0.05 + 1e-9, "{} vs {}", points, exact);
        prop_assert!(((points * 10.0).round() - points * 10.0).abs() < 1e-6);
        prop_assert!(rate(numerator, denominator).to_string().ends_with('%'));
        prop_assert!(!rate(numerator, denominator).to_string().starts_with('-'));
    }

    #[test]
    fn test_rate_delta_is_antisymmetric(a in 0.0f64..100.0, b in 0.0f64..100.0) {
        let a = Percentage::from_points(a);
        let b = Percentage::from_points(b);
        let forward = rate_delta(a, b).points();
        let backward = rate_delta(b, a).points();
        prop_assert!((forward + backward).abs() < 1e-9);
        prop_assert_eq!(rate_delta(a, a), PointDelta::default());
    }

    #[test]
    fn test_count_delta_never_panics(a in any::<i64>(), b in any::<i64>()) {
        let _ = count_delta(a, b);
    }

    #[test]
    fn test_money_delta_has_at_most_two_decimals(
        a in -1_000_000_000i64..1_000_000_000,
        b in -1_000_000_000i64..1_000_000_000
    ) {
        let a = Decimal::new(a, 3);
        let b = Decimal::new(b, 3);
        let result = delta(a, b, 2);
        prop_assert!(result.scale() <= 2);
        prop_assert!((result - (b - a)).abs() <= dec!(0.005));
    }

    #[test]
    fn test_avg_price_is_zero_without_units(total in 0i64..1_000_000_000, count in -10i64..=0) {
        prop_assert_eq!(avg_price(Decimal::new(total, 2), count), Decimal::ZERO);
    }
}
