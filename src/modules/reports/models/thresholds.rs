use serde::Serialize;

use crate::core::{AppError, Percentage, Result};

/// Fixed business rules behind the daily qualification flags
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualificationThresholds {
    /// Minimum review rate, percent points
    pub review_rate: f64,
    /// Minimum collect rate, percent points
    pub collect_rate: f64,
    /// Minimum coupon orders over the trailing seven days
    pub weekly_coupon_orders: i64,
    /// Minimum promotion-channel orders over the trailing seven days
    pub weekly_promotion_orders: i64,
}

impl Default for QualificationThresholds {
    fn default() -> Self {
        Self {
            review_rate: 30.0,
            collect_rate: 40.0,
            weekly_coupon_orders: 10,
            weekly_promotion_orders: 10,
        }
    }
}

impl QualificationThresholds {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("REVIEW_RATE_THRESHOLD", self.review_rate),
            ("COLLECT_RATE_THRESHOLD", self.collect_rate),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(AppError::Configuration(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }

        if self.weekly_coupon_orders < 0 || self.weekly_promotion_orders < 0 {
            return Err(AppError::Configuration(
                "Order-count thresholds cannot be negative".to_string(),
            ));
        }

        Ok(())
    }

    pub fn review_rate_met(&self, rate: Percentage) -> bool {
        rate.meets(self.review_rate)
    }

    pub fn collect_rate_met(&self, rate: Percentage) -> bool {
        rate.meets(self.collect_rate)
    }

    pub fn coupon_orders_met(&self, orders: i64) -> bool {
        orders >= self.weekly_coupon_orders
    }

    pub fn promotion_orders_met(&self, orders: i64) -> bool {
        orders >= self.weekly_promotion_orders
    }

    /// Criterion text shown next to a rate check (`≥30%`)
    pub fn rate_criterion(threshold: f64) -> String {
        format!("≥{}%", threshold)
    }

    /// Criterion text shown next to a count check (`≥10单`)
    pub fn count_criterion(threshold: i64) -> String {
        format!("≥{}单", threshold)
    }
}
