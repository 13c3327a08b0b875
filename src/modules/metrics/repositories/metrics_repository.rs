// Grouped-sum queries over the daily metric tables.
//
// Sources, joined per (store, date) with the core table left-preserved:
// - kewen_daily_report      core daily metrics
// - promotion_daily_report  promotion-channel daily metrics
// - store_stats             business-district ranking and offline stats

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use tracing::debug;

use crate::core::{DateRange, Result, ShopId};
use crate::modules::metrics::models::PeriodAggregate;

/// Read-only access to per-store period aggregates
#[async_trait]
pub trait MetricsRepository: Send + Sync {
    /// Sum every metric per store over `range` (inclusive on both ends).
    ///
    /// `shop_filter` restricts the result to the given ids; `None` or an empty
    /// slice means all stores. An empty map means no rows matched.
    async fn fetch_period_aggregates(
        &self,
        range: DateRange,
        shop_filter: Option<&[ShopId]>,
    ) -> Result<BTreeMap<ShopId, PeriodAggregate>>;
}

const AGGREGATE_SELECT: &str = r#"
    SELECT
        CAST(k.shop_id AS SIGNED) AS shop_id,
        MAX(k.shop_name) AS shop_name,
        CAST(COALESCE(SUM(k.exposure_users), 0) AS SIGNED) AS exposure_users,
        CAST(COALESCE(SUM(k.visit_users), 0) AS SIGNED) AS visit_users,
        CAST(COALESCE(SUM(k.order_users), 0) AS SIGNED) AS order_users,
        CAST(COALESCE(SUM(k.order_coupon_count), 0) AS SIGNED) AS order_coupon_count,
        CAST(COALESCE(SUM(k.verify_person_count), 0) AS SIGNED) AS verify_users,
        CAST(COALESCE(SUM(k.verify_coupon_count), 0) AS SIGNED) AS verify_coupon_count,
        CAST(COALESCE(SUM(k.coupon_pay_order_count), 0) AS SIGNED) AS coupon_orders,
        CAST(COALESCE(SUM(k.consult_users), 0) AS SIGNED) AS consult_users,
        CAST(COALESCE(SUM(k.new_collect_users), 0) AS SIGNED) AS new_collect,
        CAST(COALESCE(SUM(k.new_good_review_count), 0) AS SIGNED) AS new_good_reviews,
        CAST(COALESCE(SUM(k.order_sale_amount), 0) AS DECIMAL(18, 2)) AS order_sale_amount,
        CAST(COALESCE(SUM(k.verify_sale_amount), 0) AS DECIMAL(18, 2)) AS verify_sale_amount,
        CAST(COALESCE(SUM(k.verify_after_discount), 0) AS DECIMAL(18, 2)) AS verify_after_discount,
        CAST(COALESCE(SUM(k.promotion_cost), 0) AS DECIMAL(18, 2)) AS promotion_cost,
        CAST(COALESCE(SUM(k.promotion_exposure_count), 0) AS SIGNED) AS promotion_exposure,
        CAST(COALESCE(SUM(k.promotion_click_count), 0) AS SIGNED) AS promotion_clicks,
        CAST(COALESCE(SUM(p.order_count), 0) AS SIGNED) AS promotion_orders,
        CAST(COALESCE(SUM(p.view_groupbuy_count), 0) AS SIGNED) AS view_groupbuy,
        CAST(COALESCE(SUM(p.view_phone_count), 0) AS SIGNED) AS phone_clicks,
        CAST(COALESCE(SUM(p.view_address_count), 0) AS SIGNED) AS address_clicks,
        CAST(MIN(s.order_user_rank) AS SIGNED) AS order_user_rank,
        CAST(MIN(s.verify_amount_rank) AS SIGNED) AS verify_amount_rank,
        CAST(COALESCE(SUM(s.force_offline_count), 0) AS SIGNED) AS force_offline_count,
        CAST(MAX(k.intent_rate) AS CHAR) AS intent_rate
    FROM kewen_daily_report k
    LEFT JOIN promotion_daily_report p
        ON k.shop_id = p.shop_id AND k.report_date = p.report_date
    LEFT JOIN store_stats s
        ON k.shop_id = s.store_id AND k.report_date = s.date
"#;

/// Build the grouped aggregate query for one period
fn build_aggregate_query<'a>(
    range: DateRange,
    shop_filter: Option<&'a [ShopId]>,
) -> QueryBuilder<'a, MySql> {
    let mut builder = QueryBuilder::new(AGGREGATE_SELECT);
    builder
        .push(" WHERE k.report_date BETWEEN ")
        .push_bind(range.start)
        .push(" AND ")
        .push_bind(range.end);

    if let Some(ids) = shop_filter.filter(|ids| !ids.is_empty()) {
        builder.push(" AND k.shop_id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
    }

    builder.push(" GROUP BY k.shop_id ORDER BY k.shop_id");
    builder
}

pub struct MySqlMetricsRepository {
    pool: MySqlPool,
}

impl MySqlMetricsRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetricsRepository for MySqlMetricsRepository {
    async fn fetch_period_aggregates(
        &self,
        range: DateRange,
        shop_filter: Option<&[ShopId]>,
    ) -> Result<BTreeMap<ShopId, PeriodAggregate>> {
        let rows = build_aggregate_query(range, shop_filter)
            .build_query_as::<PeriodAggregateRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(range = %range, rows = rows.len(), "Fetched period aggregates");

        Ok(rows
            .into_iter()
            .map(|row| (row.shop_id, PeriodAggregate::from(row)))
            .collect())
    }
}

/// Database row representation of one grouped aggregate
#[derive(sqlx::FromRow)]
struct PeriodAggregateRow {
    shop_id: i64,
    shop_name: Option<String>,
    exposure_users: i64,
    visit_users: i64,
    order_users: i64,
    order_coupon_count: i64,
    verify_users: i64,
    verify_coupon_count: i64,
    coupon_orders: i64,
    consult_users: i64,
    new_collect: i64,
    new_good_reviews: i64,
    order_sale_amount: Decimal,
    verify_sale_amount: Decimal,
    verify_after_discount: Decimal,
    promotion_cost: Decimal,
    promotion_exposure: i64,
    promotion_clicks: i64,
    promotion_orders: i64,
    view_groupbuy: i64,
    phone_clicks: i64,
    address_clicks: i64,
    order_user_rank: Option<i64>,
    verify_amount_rank: Option<i64>,
    force_offline_count: i64,
    intent_rate: Option<String>,
}

impl From<PeriodAggregateRow> for PeriodAggregate {
    fn from(row: PeriodAggregateRow) -> Self {
        PeriodAggregate {
            shop_id: row.shop_id,
            shop_name: row.shop_name.unwrap_or_default(),
            exposure_users: row.exposure_users,
            visit_users: row.visit_users,
            order_users: row.order_users,
            order_coupon_count: row.order_coupon_count,
            verify_users: row.verify_users,
            verify_coupon_count: row.verify_coupon_count,
            coupon_orders: row.coupon_orders,
            consult_users: row.consult_users,
            new_collect: row.new_collect,
            new_good_reviews: row.new_good_reviews,
            order_sale_amount: row.order_sale_amount,
            verify_sale_amount: row.verify_sale_amount,
            verify_after_discount: row.verify_after_discount,
            promotion_cost: row.promotion_cost,
            promotion_exposure: row.promotion_exposure,
            promotion_clicks: row.promotion_clicks,
            promotion_orders: row.promotion_orders,
            view_groupbuy: row.view_groupbuy,
            phone_clicks: row.phone_clicks,
            address_clicks: row.address_clicks,
            order_user_rank: row.order_user_rank,
            verify_amount_rank: row.verify_amount_rank,
            force_offline_count: row.force_offline_count,
            intent_rate: row.intent_rate.filter(|rate| !rate.trim().is_empty()),
        }
    }
}
