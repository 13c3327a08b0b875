use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::ShopId;

/// Summed metrics for one store over one inclusive date range.
///
/// A store missing from a period is represented by [`PeriodAggregate::empty`],
/// so every downstream computation sees zeros instead of an absent record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodAggregate {
    pub shop_id: ShopId,
    pub shop_name: String,

    // Organic traffic and conversion
    pub exposure_users: i64,
    pub visit_users: i64,
    pub order_users: i64,
    pub order_coupon_count: i64,
    pub verify_users: i64,
    pub verify_coupon_count: i64,
    pub coupon_orders: i64,
    pub consult_users: i64,
    pub new_collect: i64,
    pub new_good_reviews: i64,

    // Monetary amounts
    pub order_sale_amount: Decimal,
    pub verify_sale_amount: Decimal,
    pub verify_after_discount: Decimal,
    pub promotion_cost: Decimal,

    // Promotion channel
    pub promotion_exposure: i64,
    pub promotion_clicks: i64,
    pub promotion_orders: i64,
    pub view_groupbuy: i64,
    pub phone_clicks: i64,
    pub address_clicks: i64,

    // Store ranking stats
    pub order_user_rank: Option<i64>,
    pub verify_amount_rank: Option<i64>,
    pub force_offline_count: i64,

    /// Intent conversion rate, stored preformatted by the upstream collector
    pub intent_rate: Option<String>,
}

impl PeriodAggregate {
    /// All-zero record for a store with no rows in a period
    pub fn empty(shop_id: ShopId) -> Self {
        Self {
            shop_id,
            ..Self::default()
        }
    }

    /// Whether the store had any stored name in this period
    pub fn has_name(&self) -> bool {
        !self.shop_name.trim().is_empty()
    }
}
