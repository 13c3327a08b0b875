use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{Percentage, PointDelta};
use crate::modules::metrics::PeriodAggregate;

/// `numerator / denominator` in percent points, `NoBase` when the
/// denominator is zero or negative
pub fn rate(numerator: i64, denominator: i64) -> Percentage {
    if denominator <= 0 {
        return Percentage::NoBase;
    }
    Percentage::from_points(numerator as f64 / denominator as f64 * 100.0)
}

/// Average amount per unit rounded to cents, zero when there are no units
pub fn avg_price(total: Decimal, count: i64) -> Decimal {
    if count <= 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count)).round_dp(2)
}

/// Percentage-point difference `b - a`
pub fn rate_delta(a: Percentage, b: Percentage) -> PointDelta {
    PointDelta::between(a, b)
}

/// `b - a` rounded to `decimals` places
pub fn delta(a: Decimal, b: Decimal, decimals: u32) -> Decimal {
    b.saturating_sub(a).round_dp(decimals)
}

/// `b - a` for counters
pub fn count_delta(a: i64, b: i64) -> i64 {
    b.saturating_sub(a)
}

/// Decimal to spreadsheet number
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// One metric value, typed by how it is computed and rendered
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(i64),
    Money(Decimal),
    Rate(Percentage),
}

impl MetricValue {
    fn amount(&self) -> Decimal {
        match self {
            MetricValue::Count(value) => Decimal::from(*value),
            MetricValue::Money(value) => *value,
            MetricValue::Rate(rate) => Decimal::from_f64(rate.points()).unwrap_or_default(),
        }
    }

    /// Period-over-period change from `self` to `later`
    pub fn delta_to(&self, later: &MetricValue) -> MetricDelta {
        match (self, later) {
            (MetricValue::Count(a), MetricValue::Count(b)) => MetricDelta::Count(count_delta(*a, *b)),
            (MetricValue::Money(a), MetricValue::Money(b)) => MetricDelta::Money(delta(*a, *b, 2)),
            (MetricValue::Rate(a), MetricValue::Rate(b)) => MetricDelta::Points(rate_delta(*a, *b)),
            (a, b) => MetricDelta::Money(delta(a.amount(), b.amount(), 2)),
        }
    }
}

/// Change between two [`MetricValue`]s of the same metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricDelta {
    Count(i64),
    Money(Decimal),
    Points(PointDelta),
}

impl MetricDelta {
    /// Value a spreadsheet subtraction of the two cells evaluates to
    pub fn spreadsheet_value(&self) -> f64 {
        match self {
            MetricDelta::Count(value) => *value as f64,
            MetricDelta::Money(value) => to_f64(*value),
            MetricDelta::Points(points) => points.fraction(),
        }
    }
}

/// A period aggregate together with its derived ratios
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodMetrics {
    #[serde(flatten)]
    pub raw: PeriodAggregate,
    /// visits / exposure
    pub exposure_visit_rate: Percentage,
    /// order users / visits
    pub order_rate: Percentage,
    /// discounted verified amount / verify users
    pub avg_order_value: Decimal,
    /// promotion cost / promotion clicks
    pub promotion_click_price: Decimal,
    /// promotion orders / promotion clicks
    pub promotion_order_rate: Percentage,
    /// new collects / visits
    pub collect_rate: Percentage,
    /// new good reviews / verify users
    pub review_rate: Percentage,
}

impl PeriodMetrics {
    pub fn new(raw: PeriodAggregate) -> Self {
        Self {
            exposure_visit_rate: rate(raw.visit_users, raw.exposure_users),
            order_rate: rate(raw.order_users, raw.visit_users),
            avg_order_value: avg_price(raw.verify_after_discount, raw.verify_users),
            promotion_click_price: avg_price(raw.promotion_cost, raw.promotion_clicks),
            promotion_order_rate: rate(raw.promotion_orders, raw.promotion_clicks),
            collect_rate: rate(raw.new_collect, raw.visit_users),
            review_rate: rate(raw.new_good_reviews, raw.verify_users),
            raw,
        }
    }
}

impl From<PeriodAggregate> for PeriodMetrics {
    fn from(raw: PeriodAggregate) -> Self {
        Self::new(raw)
    }
}
