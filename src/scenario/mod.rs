pub mod repository;
pub mod store;
pub mod types;

pub use repository::{InMemoryScenarioRepository, ScenarioRepository};
pub use store::ScenarioStore;
pub use types::{CreateScenarioRequest, SavedScenario, ScenarioWithBreakdown, UpdateScenarioRequest};
