use std::collections::{BTreeMap, BTreeSet};

use crate::core::{DateRange, ShopId};
use crate::modules::metrics::PeriodAggregate;
use crate::modules::reports::models::{Cell, ReportDocument, Row, RowKind, Sheet};
use crate::modules::reports::services::calculator::PeriodMetrics;
use crate::modules::stores::{StoreDirectory, StoreProfile};

use super::columns::{
    block_header, detail_delta_formula, detail_value, summary_delta, summary_value, wide_header,
    Metric, DELTA_LABEL,
};
use super::shape::ComparisonShape;
use super::styles;

const SUMMARY_STORE_WIDTH: f64 = 40.0;
const SUMMARY_WIDTH: f64 = 15.0;
const WIDE_STORE_COLUMN: usize = 4;
const WIDE_STORE_WIDTH: f64 = 40.0;
const WIDE_WIDTH: f64 = 12.0;
const DETAIL_WIDTHS: [f64; 4] = [22.0, 26.0, 26.0, 14.0];

/// Inputs of a two-period comparison report
#[derive(Debug, Clone, Copy)]
pub struct ComparisonInput<'a> {
    pub first: DateRange,
    pub second: DateRange,
    pub first_data: &'a BTreeMap<ShopId, PeriodAggregate>,
    pub second_data: &'a BTreeMap<ShopId, PeriodAggregate>,
    pub directory: &'a StoreDirectory,
}

/// One store's two periods, absent periods defaulted to zeros
#[derive(Debug, Clone)]
pub struct StoreComparison {
    pub shop_id: ShopId,
    pub name: String,
    pub profile: StoreProfile,
    pub first: PeriodMetrics,
    pub second: PeriodMetrics,
}

impl StoreComparison {
    fn values(&self, metrics: &[Metric], second: bool) -> Vec<Cell> {
        let period = if second { &self.second } else { &self.first };
        metrics
            .iter()
            .map(|metric| summary_value(metric.value(period)))
            .collect()
    }

    fn deltas(&self, metrics: &[Metric]) -> Vec<Cell> {
        metrics
            .iter()
            .map(|metric| {
                let first = metric.value(&self.first);
                summary_delta(first.delta_to(&metric.value(&self.second)))
            })
            .collect()
    }
}

/// Union of both periods' stores in ascending id order
pub fn align(input: &ComparisonInput<'_>) -> Vec<StoreComparison> {
    let ids: BTreeSet<ShopId> = input
        .first_data
        .keys()
        .chain(input.second_data.keys())
        .copied()
        .collect();

    ids.into_iter()
        .map(|shop_id| {
            let first = input.first_data.get(&shop_id);
            let second = input.second_data.get(&shop_id);

            let name = second
                .filter(|aggregate| aggregate.has_name())
                .or_else(|| first.filter(|aggregate| aggregate.has_name()))
                .map(|aggregate| aggregate.shop_name.clone())
                .unwrap_or_else(|| format!("门店{}", shop_id));

            let load = |aggregate: Option<&PeriodAggregate>| {
                PeriodMetrics::new(
                    aggregate
                        .cloned()
                        .unwrap_or_else(|| PeriodAggregate::empty(shop_id)),
                )
            };

            StoreComparison {
                shop_id,
                name,
                profile: input.directory.profile(shop_id),
                first: load(first),
                second: load(second),
            }
        })
        .collect()
}

/// Build a comparison document, `None` when neither period has any store
pub fn render(
    input: &ComparisonInput<'_>,
    shape: &ComparisonShape,
    summary_title: &str,
) -> Option<ReportDocument> {
    let stores = align(input);
    if stores.is_empty() {
        return None;
    }

    let first_label = input.first.label();
    let second_label = input.second.label();

    let mut document = ReportDocument::new();

    if let Some(wide_title) = shape.wide_title {
        let sheet = document.add_sheet(wide_title);
        fill_wide(sheet, shape, &stores, &first_label, &second_label);
        styles::apply_grid(sheet);
    }

    let summary = document.add_sheet(summary_title);
    fill_summary(summary, shape, &stores, &first_label, &second_label);
    styles::apply_grid(summary);

    for store in &stores {
        let sheet = document.add_sheet(&store.name);
        fill_detail(sheet, shape, store, &first_label, &second_label);
        styles::apply_grid(sheet);
    }

    Some(document)
}

fn labeled(name: &str, period: &str, values: Vec<Cell>) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(values.len() + 2);
    cells.push(name.into());
    cells.push(period.into());
    cells.extend(values);
    cells
}

/// Period A, period B and delta rows for one metric group
fn push_block(
    sheet: &mut Sheet,
    store: &StoreComparison,
    metrics: &[Metric],
    first_label: &str,
    second_label: &str,
) {
    sheet.push_cells(
        RowKind::Data,
        labeled(&store.name, first_label, store.values(metrics, false)),
    );
    sheet.push_cells(
        RowKind::Data,
        labeled(&store.name, second_label, store.values(metrics, true)),
    );
    sheet.push_cells(
        RowKind::Delta,
        labeled(&store.name, DELTA_LABEL, store.deltas(metrics)),
    );
}

fn fill_summary(
    sheet: &mut Sheet,
    shape: &ComparisonShape,
    stores: &[StoreComparison],
    first_label: &str,
    second_label: &str,
) {
    let columns = shape.core_metrics.len().max(shape.promotion_metrics.len()) + 2;
    let mut widths = vec![SUMMARY_WIDTH; columns];
    widths[0] = SUMMARY_STORE_WIDTH;
    sheet.set_widths(&widths);

    sheet.push_cells(RowKind::Header, block_header(shape.core_metrics));

    for store in stores {
        push_block(sheet, store, shape.core_metrics, first_label, second_label);
        sheet.push_cells(RowKind::Header, block_header(shape.promotion_metrics));
        push_block(sheet, store, shape.promotion_metrics, first_label, second_label);
        sheet.push(Row::blank());
    }
}

fn fill_wide(
    sheet: &mut Sheet,
    shape: &ComparisonShape,
    stores: &[StoreComparison],
    first_label: &str,
    second_label: &str,
) {
    let header = wide_header(shape.core_metrics, shape.promotion_metrics);
    let mut widths = vec![WIDE_WIDTH; header.len()];
    if let Some(width) = widths.get_mut(WIDE_STORE_COLUMN) {
        *width = WIDE_STORE_WIDTH;
    }
    sheet.set_widths(&widths);

    sheet.push_cells(RowKind::Header, header.clone());

    let metrics: Vec<Metric> = shape
        .core_metrics
        .iter()
        .chain(shape.promotion_metrics)
        .copied()
        .collect();

    for (index, store) in stores.iter().enumerate() {
        let leading = |period: &str| -> Vec<Cell> {
            vec![
                (index as i64 + 1).into(),
                store.profile.operator.as_str().into(),
                store.profile.city.as_str().into(),
                store.profile.sales.as_str().into(),
                store.name.as_str().into(),
                period.into(),
            ]
        };

        let mut first = leading(first_label);
        first.extend(store.values(&metrics, false));
        sheet.push_cells(RowKind::Data, first);

        let mut second = leading(second_label);
        second.extend(store.values(&metrics, true));
        sheet.push_cells(RowKind::Data, second);

        let mut delta = leading(DELTA_LABEL);
        delta.extend(store.deltas(&metrics));
        sheet.push_cells(RowKind::Delta, delta);

        sheet.push_cells(RowKind::Header, header.clone());
    }
}

fn fill_detail(
    sheet: &mut Sheet,
    shape: &ComparisonShape,
    store: &StoreComparison,
    first_label: &str,
    second_label: &str,
) {
    sheet.set_widths(&DETAIL_WIDTHS);
    sheet.push_cells(
        RowKind::Header,
        vec![
            "指标".into(),
            first_label.into(),
            second_label.into(),
            DELTA_LABEL.into(),
        ],
    );

    let groups = [shape.core_metrics, shape.promotion_metrics];
    for (section, metrics) in shape.detail_sections.iter().zip(groups) {
        sheet.push_cells(RowKind::Section, vec![(*section).into()]);

        for metric in metrics {
            let first = metric.value(&store.first);
            let second = metric.value(&store.second);
            let row = sheet.next_row_number();
            sheet.push_cells(
                RowKind::Data,
                vec![
                    metric.label().into(),
                    detail_value(first),
                    detail_value(second),
                    detail_delta_formula(row, first, second),
                ],
            );
        }
    }
}
