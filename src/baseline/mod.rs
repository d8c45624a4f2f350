pub mod estimator;
pub mod memory;
pub mod source;

pub use estimator::estimate_baseline;
pub use memory::InMemoryMarts;
pub use source::{CohortRetention, DateRange, HistoricalMarts, OrderTotals, TrafficTotals};
