use crate::modules::reports::models::ReportKind;

use super::columns::{Metric, CORE_METRICS, PROMOTION_METRICS};

/// Metric groups and extra sheets of a two-period comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonShape {
    /// Leading 34-column sheet carrying operator/city/sales columns
    pub wide_title: Option<&'static str>,
    pub core_metrics: &'static [Metric],
    pub promotion_metrics: &'static [Metric],
    /// Section rows of the comparison detail sheet
    pub detail_sections: [&'static str; 2],
}

/// Which renderer a report kind goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFamily {
    /// One summary row and one key/value detail sheet per store
    SinglePeriod,
    /// Period A / period B / delta blocks per store
    Comparison(&'static ComparisonShape),
}

/// Everything that varies between report kinds, handed to the layout engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportShape {
    pub family: LayoutFamily,
    /// Summary sheet title, `None` to use the report kind label
    pub summary_title: Option<&'static str>,
}

/// Shared by weekly and monthly reports; only the caller's ranges differ
pub const PERIOD_COMPARISON: ComparisonShape = ComparisonShape {
    wide_title: None,
    core_metrics: &CORE_METRICS,
    promotion_metrics: &PROMOTION_METRICS,
    detail_sections: ["门店干预数据", "推广通数据"],
};

pub const CUSTOM_COMPARISON: ComparisonShape = ComparisonShape {
    wide_title: Some("自定义报表"),
    ..PERIOD_COMPARISON
};

const DAILY: ReportShape = ReportShape {
    family: LayoutFamily::SinglePeriod,
    summary_title: None,
};

const PERIOD: ReportShape = ReportShape {
    family: LayoutFamily::Comparison(&PERIOD_COMPARISON),
    summary_title: None,
};

const CUSTOM: ReportShape = ReportShape {
    family: LayoutFamily::Comparison(&CUSTOM_COMPARISON),
    summary_title: Some("对比汇总"),
};

impl ReportShape {
    pub fn for_kind(kind: ReportKind) -> &'static ReportShape {
        match kind {
            ReportKind::Daily => &DAILY,
            ReportKind::Weekly | ReportKind::Monthly => &PERIOD,
            ReportKind::Custom => &CUSTOM,
        }
    }

    pub fn summary_title(&self, kind: ReportKind) -> &'static str {
        self.summary_title.unwrap_or_else(|| kind.label())
    }
}
