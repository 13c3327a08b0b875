pub mod period_aggregate;

pub use period_aggregate::PeriodAggregate;
