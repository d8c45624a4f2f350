use tracing::debug;

use super::engine;
use super::input::GrowthModelInputPayload;
use super::types::GrowthModelOutput;
use crate::error::Result;

/// Stateless compute for interactive what-if calls. Validates the same
/// required fields as scenario creation, then runs a fresh simulation.
/// No persistence and no caching.
pub fn compute_from_payload(payload: GrowthModelInputPayload) -> Result<GrowthModelOutput> {
    let input = payload.into_input()?;
    let output = engine::compute(&input);
    debug!(
        horizon_months = input.horizon_months,
        projected_revenue = output.projected_revenue,
        break_even_month = ?output.break_even_month,
        "Computed growth model"
    );
    Ok(output)
}
