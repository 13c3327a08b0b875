use crate::core::{AppError, Result};
use crate::modules::reports::models::QualificationThresholds;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Report output and business-rule configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Directory generated workbooks are written to
    pub output_dir: PathBuf,
    pub thresholds: QualificationThresholds,
}

fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", name))),
        Err(_) => Ok(default),
    }
}

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = QualificationThresholds::default();

        Ok(ReportConfig {
            output_dir: env::var("REPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./reports")),
            thresholds: QualificationThresholds {
                review_rate: parse_or("REVIEW_RATE_THRESHOLD", defaults.review_rate)?,
                collect_rate: parse_or("COLLECT_RATE_THRESHOLD", defaults.collect_rate)?,
                weekly_coupon_orders: parse_or(
                    "WEEKLY_COUPON_ORDER_THRESHOLD",
                    defaults.weekly_coupon_orders,
                )?,
                weekly_promotion_orders: parse_or(
                    "WEEKLY_PROMOTION_ORDER_THRESHOLD",
                    defaults.weekly_promotion_orders,
                )?,
            },
        })
    }

    /// Create the output directory if it does not exist yet
    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}
