use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::{dates, ShopId};
use crate::modules::metrics::PeriodAggregate;
use crate::modules::reports::models::{
    Cell, CellStyle, CellValue, QualificationThresholds, ReportDocument, RowKind, Sheet,
};
use crate::modules::reports::services::calculator::PeriodMetrics;
use crate::modules::stores::{StoreDirectory, StoreProfile};

use super::columns::{money, MONEY_FORMAT};
use super::styles;

pub const SUMMARY_HEADERS: [&str; 23] = [
    "星期",
    "日期",
    "序号",
    "运营",
    "城市",
    "销售",
    "门店",
    "曝光人数",
    "访问人数",
    "下单人数",
    "核销人数",
    "下单券数",
    "核销券数",
    "电话点击",
    "地址点击",
    "推广通消耗",
    "好评",
    "意向转化率",
    "下单售价金额",
    "核销售价金额",
    "优惠后核销金额",
    "下单人数商圈排名",
    "核销金额商圈排名",
];

pub const SUMMARY_WIDTHS: [f64; 23] = [
    6.0, 8.0, 5.0, 12.0, 8.0, 8.0, 35.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 12.0,
    8.0, 12.0, 12.0, 12.0, 12.0, 14.0, 14.0,
];

pub const DETAIL_HEADERS: [&str; 5] = ["分类", "指标", "数值", "达标标准", "结果"];
pub const DETAIL_WIDTHS: [f64; 5] = [14.0, 22.0, 16.0, 16.0, 14.0];

const QUALIFIED: &str = "达标";
const NOT_QUALIFIED: &str = "未达标";

/// Days in the trailing window behind the weekly checks and the offline warning
pub const TRAILING_DAYS: i64 = 7;

/// Inputs of a single-period (daily) report
#[derive(Debug, Clone, Copy)]
pub struct SinglePeriodInput<'a> {
    pub date: NaiveDate,
    /// Stores with rows on `date`
    pub day: &'a BTreeMap<ShopId, PeriodAggregate>,
    /// Same stores summed over the trailing window ending on `date`
    pub trailing: &'a BTreeMap<ShopId, PeriodAggregate>,
    pub directory: &'a StoreDirectory,
}

/// `第N名` below 100, `大于100名` from 100, `--` when unranked
pub fn format_rank(rank: Option<i64>) -> String {
    match rank {
        Some(rank) if rank > 0 && rank < 100 => format!("第{}名", rank),
        Some(rank) if rank >= 100 => "大于100名".to_string(),
        _ => "--".to_string(),
    }
}

pub fn display_name(aggregate: &PeriodAggregate) -> String {
    if aggregate.has_name() {
        aggregate.shop_name.clone()
    } else {
        format!("门店{}", aggregate.shop_id)
    }
}

fn money_cell(amount: Decimal) -> Cell {
    Cell::new(CellValue::Number(money(amount)))
}

fn money_detail(amount: Decimal) -> Cell {
    Cell::styled(
        CellValue::Number(money(amount)),
        CellStyle::default().num_format(MONEY_FORMAT),
    )
}

fn flag_cell(qualified: bool) -> Cell {
    Cell::styled(
        if qualified { QUALIFIED } else { NOT_QUALIFIED },
        styles::flag(!qualified),
    )
}

/// Build the daily document, `None` when no store has rows on the day
pub fn render(
    input: &SinglePeriodInput<'_>,
    summary_title: &str,
    thresholds: &QualificationThresholds,
) -> Option<ReportDocument> {
    if input.day.is_empty() {
        return None;
    }

    let weekday = dates::weekday_label(input.date);
    let month_day = dates::month_day_label(input.date);

    let mut document = ReportDocument::new();

    let summary = document.add_sheet(summary_title);
    summary.set_widths(&SUMMARY_WIDTHS);
    summary.push_cells(
        RowKind::Header,
        SUMMARY_HEADERS.into_iter().map(Cell::from).collect(),
    );

    for (seq, (shop_id, aggregate)) in input.day.iter().enumerate() {
        let profile = input.directory.profile(*shop_id);
        summary.push_cells(
            RowKind::Data,
            summary_row(aggregate, &profile, weekday, &month_day, seq as i64 + 1),
        );
    }
    styles::apply_grid(summary);

    for (shop_id, aggregate) in input.day {
        let name = display_name(aggregate);
        let profile = input.directory.profile(*shop_id);
        let trailing = input
            .trailing
            .get(shop_id)
            .cloned()
            .unwrap_or_else(|| PeriodAggregate::empty(*shop_id));

        let sheet = document.add_sheet(&name);
        sheet.set_widths(&DETAIL_WIDTHS);
        fill_detail(
            sheet,
            DetailContext {
                name: &name,
                date: input.date,
                weekday,
                profile: &profile,
                day: PeriodMetrics::new(aggregate.clone()),
                trailing: &trailing,
                thresholds,
            },
        );
        styles::apply_key_value(sheet);
    }

    Some(document)
}

fn summary_row(
    aggregate: &PeriodAggregate,
    profile: &StoreProfile,
    weekday: &str,
    month_day: &str,
    seq: i64,
) -> Vec<Cell> {
    vec![
        weekday.into(),
        month_day.into(),
        seq.into(),
        profile.operator.as_str().into(),
        profile.city.as_str().into(),
        profile.sales.as_str().into(),
        display_name(aggregate).into(),
        aggregate.exposure_users.into(),
        aggregate.visit_users.into(),
        aggregate.order_users.into(),
        aggregate.verify_users.into(),
        aggregate.order_coupon_count.into(),
        aggregate.verify_coupon_count.into(),
        aggregate.phone_clicks.into(),
        aggregate.address_clicks.into(),
        money_cell(aggregate.promotion_cost),
        aggregate.new_good_reviews.into(),
        intent_rate(aggregate).into(),
        money_cell(aggregate.order_sale_amount),
        money_cell(aggregate.verify_sale_amount),
        money_cell(aggregate.verify_after_discount),
        format_rank(aggregate.order_user_rank).into(),
        format_rank(aggregate.verify_amount_rank).into(),
    ]
}

fn intent_rate(aggregate: &PeriodAggregate) -> String {
    aggregate
        .intent_rate
        .as_deref()
        .map(str::trim)
        .filter(|rate| !rate.is_empty())
        .unwrap_or("0%")
        .to_string()
}

struct DetailContext<'a> {
    name: &'a str,
    date: NaiveDate,
    weekday: &'a str,
    profile: &'a StoreProfile,
    day: PeriodMetrics,
    trailing: &'a PeriodAggregate,
    thresholds: &'a QualificationThresholds,
}

fn push_pair(sheet: &mut Sheet, category: &str, label: &str, value: Cell) {
    sheet.push_cells(RowKind::Data, vec![category.into(), label.into(), value]);
}

fn fill_detail(sheet: &mut Sheet, ctx: DetailContext<'_>) {
    let raw = &ctx.day.raw;

    sheet.push_cells(
        RowKind::Header,
        DETAIL_HEADERS.into_iter().map(Cell::from).collect(),
    );

    let info = "门店信息";
    push_pair(sheet, info, "门店名称", ctx.name.into());
    push_pair(sheet, info, "门店ID", raw.shop_id.into());
    push_pair(sheet, info, "日期", ctx.date.format("%Y-%m-%d").to_string().into());
    push_pair(sheet, info, "星期", ctx.weekday.into());
    push_pair(sheet, info, "运营", ctx.profile.operator.as_str().into());
    push_pair(sheet, info, "销售", ctx.profile.sales.as_str().into());
    push_pair(sheet, info, "城市", ctx.profile.city.as_str().into());
    push_pair(sheet, info, "区县", ctx.profile.district.as_str().into());
    push_pair(sheet, info, "区域", ctx.profile.region.as_str().into());

    let ops = "经营数据";
    push_pair(sheet, ops, "曝光人数", raw.exposure_users.into());
    push_pair(sheet, ops, "访问人数", raw.visit_users.into());
    push_pair(sheet, ops, "曝光访问转化率", ctx.day.exposure_visit_rate.to_string().into());
    push_pair(sheet, ops, "下单人数", raw.order_users.into());
    push_pair(sheet, ops, "下单转化率", ctx.day.order_rate.to_string().into());
    push_pair(sheet, ops, "下单券数", raw.order_coupon_count.into());
    push_pair(sheet, ops, "核销人数", raw.verify_users.into());
    push_pair(sheet, ops, "核销券数", raw.verify_coupon_count.into());
    push_pair(sheet, ops, "下单售价金额", money_detail(raw.order_sale_amount));
    push_pair(sheet, ops, "核销售价金额", money_detail(raw.verify_sale_amount));
    push_pair(sheet, ops, "优惠后核销金额", money_detail(raw.verify_after_discount));
    push_pair(sheet, ops, "客单价", money_detail(ctx.day.avg_order_value));
    push_pair(sheet, ops, "优惠码订单", raw.coupon_orders.into());
    push_pair(sheet, ops, "在线咨询", raw.consult_users.into());
    push_pair(sheet, ops, "门店收藏", raw.new_collect.into());
    push_pair(sheet, ops, "新增好评数", raw.new_good_reviews.into());
    push_pair(sheet, ops, "意向转化率", intent_rate(raw).into());
    push_pair(sheet, ops, "下单人数商圈排名", format_rank(raw.order_user_rank).into());
    push_pair(sheet, ops, "核销金额商圈排名", format_rank(raw.verify_amount_rank).into());

    let promo = "推广数据";
    push_pair(sheet, promo, "推广通消耗", money_detail(raw.promotion_cost));
    push_pair(sheet, promo, "推广通点击", raw.promotion_clicks.into());
    push_pair(sheet, promo, "电话点击", raw.phone_clicks.into());
    push_pair(sheet, promo, "地址点击", raw.address_clicks.into());

    let checks = "达标考核";
    let thresholds = ctx.thresholds;
    sheet.push_cells(
        RowKind::Data,
        vec![
            checks.into(),
            "留评率".into(),
            ctx.day.review_rate.to_string().into(),
            QualificationThresholds::rate_criterion(thresholds.review_rate).into(),
            flag_cell(thresholds.review_rate_met(ctx.day.review_rate)),
        ],
    );
    sheet.push_cells(
        RowKind::Data,
        vec![
            checks.into(),
            "收藏率".into(),
            ctx.day.collect_rate.to_string().into(),
            QualificationThresholds::rate_criterion(thresholds.collect_rate).into(),
            flag_cell(thresholds.collect_rate_met(ctx.day.collect_rate)),
        ],
    );
    sheet.push_cells(
        RowKind::Data,
        vec![
            checks.into(),
            "近7日优惠码订单".into(),
            ctx.trailing.coupon_orders.into(),
            QualificationThresholds::count_criterion(thresholds.weekly_coupon_orders).into(),
            flag_cell(thresholds.coupon_orders_met(ctx.trailing.coupon_orders)),
        ],
    );
    sheet.push_cells(
        RowKind::Data,
        vec![
            checks.into(),
            "近7日推广通订单".into(),
            ctx.trailing.promotion_orders.into(),
            QualificationThresholds::count_criterion(thresholds.weekly_promotion_orders).into(),
            flag_cell(thresholds.promotion_orders_met(ctx.trailing.promotion_orders)),
        ],
    );

    let offline = ctx.trailing.force_offline_count;
    let banner = if offline > 0 {
        format!("近7日被强制下线{}次", offline)
    } else {
        "近7日无强制下线".to_string()
    };
    sheet.push_cells(
        RowKind::Data,
        vec![
            "预警".into(),
            "强制下线".into(),
            offline.into(),
            "0次".into(),
            Cell::styled(banner, styles::flag(offline > 0)),
        ],
    );
}
