use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{AppError, DateRange, ShopId};

/// Report kinds accepted by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl ReportKind {
    /// Sheet and file-name label
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Daily => "日报",
            ReportKind::Weekly => "周报",
            ReportKind::Monthly => "月报",
            ReportKind::Custom => "自定义报表",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Daily => write!(f, "daily"),
            ReportKind::Weekly => write!(f, "weekly"),
            ReportKind::Monthly => write!(f, "monthly"),
            ReportKind::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for ReportKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(ReportKind::Daily),
            "weekly" => Ok(ReportKind::Weekly),
            "monthly" => Ok(ReportKind::Monthly),
            "custom" => Ok(ReportKind::Custom),
            other => Err(AppError::validation(format!("未知的报表类型: {}", other))),
        }
    }
}

/// A validated report request: date ranges resolved, ready for the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReportRequest {
    Daily {
        date: NaiveDate,
    },
    Weekly {
        first: DateRange,
        second: DateRange,
    },
    Monthly {
        first: DateRange,
        second: DateRange,
    },
    Custom {
        first: DateRange,
        second: DateRange,
        /// Empty means all stores
        shop_ids: Vec<ShopId>,
    },
}

impl ReportRequest {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRequest::Daily { .. } => ReportKind::Daily,
            ReportRequest::Weekly { .. } => ReportKind::Weekly,
            ReportRequest::Monthly { .. } => ReportKind::Monthly,
            ReportRequest::Custom { .. } => ReportKind::Custom,
        }
    }

    /// The two compared periods, `None` for the single-period daily report
    pub fn periods(&self) -> Option<(DateRange, DateRange)> {
        match self {
            ReportRequest::Daily { .. } => None,
            ReportRequest::Weekly { first, second }
            | ReportRequest::Monthly { first, second }
            | ReportRequest::Custom { first, second, .. } => Some((*first, *second)),
        }
    }

    /// Explicit store allowlist, if any
    pub fn shop_filter(&self) -> Option<&[ShopId]> {
        match self {
            ReportRequest::Custom { shop_ids, .. } if !shop_ids.is_empty() => {
                Some(shop_ids.as_slice())
            }
            _ => None,
        }
    }
}
