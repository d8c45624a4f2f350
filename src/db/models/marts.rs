use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::baseline::CohortRetention;

/// Row of the `cohort` mart
#[derive(Debug, FromRow)]
pub struct CohortModel {
    pub cohort_month: NaiveDate,
    pub size: i64,
    pub d30_retention: Decimal,
}

impl From<CohortModel> for CohortRetention {
    fn from(model: CohortModel) -> Self {
        Self {
            cohort_month: model.cohort_month,
            size: model.size,
            d30_retention: model.d30_retention,
        }
    }
}
