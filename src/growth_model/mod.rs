pub mod engine;
pub mod facade;
pub mod input;
pub mod types;

pub use engine::compute;
pub use facade::compute_from_payload;
pub use input::GrowthModelInputPayload;
pub use types::{GrowthModelInput, GrowthModelOutput, GrowthModelSummary, MonthlyProjection};
