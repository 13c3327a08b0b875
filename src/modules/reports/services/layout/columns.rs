//! Column schemas and how metric values render into cells.

use rust_decimal::Decimal;

use crate::modules::reports::models::{Cell, CellStyle, CellValue};
use crate::modules::reports::services::calculator::{to_f64, MetricDelta, MetricValue, PeriodMetrics};

/// Label of the delta rows and delta column
pub const DELTA_LABEL: &str = "差值";
pub const STORE_LABEL: &str = "门店";
pub const PERIOD_LABEL: &str = "数据周期";

pub const MONEY_FORMAT: &str = "0.00";
pub const PERCENT_FORMAT: &str = "0.0%";

/// Every metric shown on comparison reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    VerifyAfterDiscount,
    ExposureUsers,
    VisitUsers,
    ExposureVisitRate,
    OrderUsers,
    OrderCoupons,
    OrderRate,
    VerifyUsers,
    VerifyCoupons,
    OrderSaleAmount,
    VerifySaleAmount,
    CouponOrders,
    PhoneClicks,
    AvgOrderValue,
    PromotionCost,
    PromotionExposure,
    PromotionClicks,
    PromotionClickPrice,
    PromotionOrders,
    PromotionOrderRate,
    ViewGroupbuy,
    ViewPhone,
    ConsultUsers,
    AddressClicks,
    NewCollect,
    CollectRate,
    NewGoodReviews,
    ReviewRate,
}

pub const CORE_METRICS: [Metric; 14] = [
    Metric::VerifyAfterDiscount,
    Metric::ExposureUsers,
    Metric::VisitUsers,
    Metric::ExposureVisitRate,
    Metric::OrderUsers,
    Metric::OrderCoupons,
    Metric::OrderRate,
    Metric::VerifyUsers,
    Metric::VerifyCoupons,
    Metric::OrderSaleAmount,
    Metric::VerifySaleAmount,
    Metric::CouponOrders,
    Metric::PhoneClicks,
    Metric::AvgOrderValue,
];

pub const PROMOTION_METRICS: [Metric; 14] = [
    Metric::PromotionCost,
    Metric::PromotionExposure,
    Metric::PromotionClicks,
    Metric::PromotionClickPrice,
    Metric::PromotionOrders,
    Metric::PromotionOrderRate,
    Metric::ViewGroupbuy,
    Metric::ViewPhone,
    Metric::ConsultUsers,
    Metric::AddressClicks,
    Metric::NewCollect,
    Metric::CollectRate,
    Metric::NewGoodReviews,
    Metric::ReviewRate,
];

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::VerifyAfterDiscount => "优惠后核销额",
            Metric::ExposureUsers => "曝光人数",
            Metric::VisitUsers => "访问人数",
            Metric::ExposureVisitRate => "曝光访问转化率",
            Metric::OrderUsers => "下单人数",
            Metric::OrderCoupons => "下单券数",
            Metric::OrderRate => "下单转化率",
            Metric::VerifyUsers => "核销人数",
            Metric::VerifyCoupons => "核销券数",
            Metric::OrderSaleAmount => "下单售价金额",
            Metric::VerifySaleAmount => "核销售价金额",
            Metric::CouponOrders => "优惠码订单",
            Metric::PhoneClicks => "电话点击",
            Metric::AvgOrderValue => "客单价",
            Metric::PromotionCost => "推广通花费",
            Metric::PromotionExposure => "推广通曝光",
            Metric::PromotionClicks => "推广通点击",
            Metric::PromotionClickPrice => "推广通点击均价",
            Metric::PromotionOrders => "推广通订单量",
            Metric::PromotionOrderRate => "推广通下单转化率",
            Metric::ViewGroupbuy => "推广通查看团购",
            Metric::ViewPhone => "推广通查看电话",
            Metric::ConsultUsers => "在线咨询",
            Metric::AddressClicks => "地址点击",
            Metric::NewCollect => "门店收藏",
            Metric::CollectRate => "收藏率",
            Metric::NewGoodReviews => "新增好评数",
            Metric::ReviewRate => "留评率",
        }
    }

    pub fn value(&self, period: &PeriodMetrics) -> MetricValue {
        let raw = &period.raw;
        match self {
            Metric::VerifyAfterDiscount => MetricValue::Money(raw.verify_after_discount),
            Metric::ExposureUsers => MetricValue::Count(raw.exposure_users),
            Metric::VisitUsers => MetricValue::Count(raw.visit_users),
            Metric::ExposureVisitRate => MetricValue::Rate(period.exposure_visit_rate),
            Metric::OrderUsers => MetricValue::Count(raw.order_users),
            Metric::OrderCoupons => MetricValue::Count(raw.order_coupon_count),
            Metric::OrderRate => MetricValue::Rate(period.order_rate),
            Metric::VerifyUsers => MetricValue::Count(raw.verify_users),
            Metric::VerifyCoupons => MetricValue::Count(raw.verify_coupon_count),
            Metric::OrderSaleAmount => MetricValue::Money(raw.order_sale_amount),
            Metric::VerifySaleAmount => MetricValue::Money(raw.verify_sale_amount),
            Metric::CouponOrders => MetricValue::Count(raw.coupon_orders),
            Metric::PhoneClicks | Metric::ViewPhone => MetricValue::Count(raw.phone_clicks),
            Metric::AvgOrderValue => MetricValue::Money(period.avg_order_value),
            Metric::PromotionCost => MetricValue::Money(raw.promotion_cost),
            Metric::PromotionExposure => MetricValue::Count(raw.promotion_exposure),
            Metric::PromotionClicks => MetricValue::Count(raw.promotion_clicks),
            Metric::PromotionClickPrice => MetricValue::Money(period.promotion_click_price),
            Metric::PromotionOrders => MetricValue::Count(raw.promotion_orders),
            Metric::PromotionOrderRate => MetricValue::Rate(period.promotion_order_rate),
            Metric::ViewGroupbuy => MetricValue::Count(raw.view_groupbuy),
            Metric::ConsultUsers => MetricValue::Count(raw.consult_users),
            Metric::AddressClicks => MetricValue::Count(raw.address_clicks),
            Metric::NewCollect => MetricValue::Count(raw.new_collect),
            Metric::CollectRate => MetricValue::Rate(period.collect_rate),
            Metric::NewGoodReviews => MetricValue::Count(raw.new_good_reviews),
            Metric::ReviewRate => MetricValue::Rate(period.review_rate),
        }
    }
}

/// `门店 | 数据周期 | <metric labels>`
pub fn block_header(metrics: &[Metric]) -> Vec<Cell> {
    [STORE_LABEL, PERIOD_LABEL]
        .into_iter()
        .chain(metrics.iter().map(Metric::label))
        .map(Cell::from)
        .collect()
}

pub const WIDE_LEADING: [&str; 6] = ["序号", "运营", "城市", "销售", STORE_LABEL, PERIOD_LABEL];

/// 34-column header of the custom wide sheet
pub fn wide_header(core: &[Metric], promotion: &[Metric]) -> Vec<Cell> {
    WIDE_LEADING
        .into_iter()
        .chain(core.iter().chain(promotion).map(Metric::label))
        .map(Cell::from)
        .collect()
}

pub fn money(amount: Decimal) -> f64 {
    to_f64(amount.round_dp(2))
}

/// Static summary cell: rates render as text
pub fn summary_value(value: MetricValue) -> Cell {
    match value {
        MetricValue::Count(count) => Cell::new(count),
        MetricValue::Money(amount) => Cell::new(CellValue::Number(money(amount))),
        MetricValue::Rate(rate) => Cell::new(rate.to_string()),
    }
}

/// Static summary delta cell: point deltas render as text
pub fn summary_delta(delta: MetricDelta) -> Cell {
    match delta {
        MetricDelta::Count(count) => Cell::new(count),
        MetricDelta::Money(amount) => Cell::new(CellValue::Number(money(amount))),
        MetricDelta::Points(points) => Cell::new(points.to_string()),
    }
}

/// Number format matching a metric value's kind
pub fn number_format(value: &MetricValue) -> Option<&'static str> {
    match value {
        MetricValue::Count(_) => None,
        MetricValue::Money(_) => Some(MONEY_FORMAT),
        MetricValue::Rate(_) => Some(PERCENT_FORMAT),
    }
}

fn with_format(value: CellValue, format: Option<&'static str>) -> Cell {
    let style = match format {
        Some(format) => CellStyle::default().num_format(format),
        None => CellStyle::default(),
    };
    Cell::styled(value, style)
}

/// Numeric detail cell: rates become fractions under a percent format
pub fn detail_value(value: MetricValue) -> Cell {
    let format = number_format(&value);
    let cell_value = match value {
        MetricValue::Count(count) => CellValue::Integer(count),
        MetricValue::Money(amount) => CellValue::Number(money(amount)),
        MetricValue::Rate(rate) => CellValue::Percent(rate.fraction()),
    };
    with_format(cell_value, format)
}

/// Live `=C{row}-B{row}` delta with its evaluated value cached
pub fn detail_delta_formula(row: usize, first: MetricValue, second: MetricValue) -> Cell {
    let cached = first.delta_to(&second).spreadsheet_value();
    with_format(
        CellValue::Formula {
            expression: format!("=C{row}-B{row}"),
            cached,
        },
        number_format(&first),
    )
}
