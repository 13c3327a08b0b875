//! Report layout engine.
//!
//! Turns aligned period aggregates plus store metadata into a
//! [`ReportDocument`]. Each report kind is described by a [`ReportShape`]
//! whose [`LayoutFamily`] picks the renderer; weekly and monthly reports
//! share one shape.

pub mod columns;
pub mod comparison;
pub mod shape;
pub mod single_period;
pub mod styles;

pub use comparison::{ComparisonInput, StoreComparison};
pub use shape::{ComparisonShape, LayoutFamily, ReportShape};
pub use single_period::{SinglePeriodInput, TRAILING_DAYS};

use crate::modules::reports::models::{QualificationThresholds, ReportDocument};

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    thresholds: QualificationThresholds,
}

impl LayoutEngine {
    pub fn new(thresholds: QualificationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &QualificationThresholds {
        &self.thresholds
    }

    /// Daily layout, `None` when the day has no stores
    pub fn single_period(
        &self,
        summary_title: &str,
        input: &SinglePeriodInput<'_>,
    ) -> Option<ReportDocument> {
        single_period::render(input, summary_title, &self.thresholds)
    }

    /// Comparison layout, `None` when both periods are empty
    pub fn comparison(
        &self,
        layout: &ComparisonShape,
        summary_title: &str,
        input: &ComparisonInput<'_>,
    ) -> Option<ReportDocument> {
        comparison::render(input, layout, summary_title)
    }
}
