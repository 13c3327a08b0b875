pub mod dates;
pub mod error;
pub mod percentage;

pub use dates::DateRange;
pub use error::{AppError, Result};
pub use percentage::{Percentage, PointDelta};

/// Store identifier shared by every source table
pub type ShopId = i64;
