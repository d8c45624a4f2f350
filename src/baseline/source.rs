use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::error::Result;

/// Inclusive date window over the fact tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Exactly `days` calendar days ending on `as_of`, both ends inclusive
    pub fn trailing(as_of: NaiveDate, days: i64) -> Self {
        Self {
            start: as_of - Duration::days(days.max(1) - 1),
            end: as_of,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderTotals {
    pub revenue_net: Decimal,
    pub cogs: Decimal,
    pub order_count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficTotals {
    pub sessions: i64,
    pub purchases: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortRetention {
    pub cohort_month: NaiveDate,
    pub size: i64,
    pub d30_retention: Decimal, // fraction of the cohort ordering again within 30 days
}

/// Read-only aggregate queries over the historical marts (`factSpend`,
/// `factOrder`, `factTraffic`, `Cohort`, `dimCustomer`).
///
/// The queries touch disjoint tables and may run concurrently.
#[async_trait]
pub trait HistoricalMarts: Send + Sync {
    async fn total_spend(&self, range: DateRange) -> Result<Decimal>;

    async fn order_totals(&self, range: DateRange) -> Result<OrderTotals>;

    async fn traffic_totals(&self, range: DateRange) -> Result<TrafficTotals>;

    /// Most recent cohort with a positive size, if any
    async fn latest_cohort(&self) -> Result<Option<CohortRetention>>;

    /// Customers whose first order date falls inside `range`
    async fn new_customer_count(&self, range: DateRange) -> Result<i64>;
}
