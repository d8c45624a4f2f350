use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::source::{CohortRetention, DateRange, HistoricalMarts, OrderTotals, TrafficTotals};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct SpendRow {
    pub date: NaiveDate,
    pub spend: Decimal,
}

#[derive(Debug, Clone)]
pub struct OrderRow {
    pub order_date: NaiveDate,
    pub revenue_net: Decimal,
    pub cogs: Decimal,
}

#[derive(Debug, Clone)]
pub struct TrafficRow {
    pub date: NaiveDate,
    pub sessions: i64,
    pub purchases: i64,
}

/// Marts held in memory. Backs demo mode and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarts {
    pub spend: Vec<SpendRow>,
    pub orders: Vec<OrderRow>,
    pub traffic: Vec<TrafficRow>,
    pub cohorts: Vec<CohortRetention>,
    pub customer_first_orders: Vec<NaiveDate>,
}

impl InMemoryMarts {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoricalMarts for InMemoryMarts {
    async fn total_spend(&self, range: DateRange) -> Result<Decimal> {
        Ok(self
            .spend
            .iter()
            .filter(|row| range.contains(row.date))
            .map(|row| row.spend)
            .sum())
    }

    async fn order_totals(&self, range: DateRange) -> Result<OrderTotals> {
        let totals = self
            .orders
            .iter()
            .filter(|row| range.contains(row.order_date))
            .fold(OrderTotals::default(), |mut acc, row| {
                acc.revenue_net += row.revenue_net;
                acc.cogs += row.cogs;
                acc.order_count += 1;
                acc
            });
        Ok(totals)
    }

    async fn traffic_totals(&self, range: DateRange) -> Result<TrafficTotals> {
        let totals = self
            .traffic
            .iter()
            .filter(|row| range.contains(row.date))
            .fold(TrafficTotals::default(), |mut acc, row| {
                acc.sessions += row.sessions;
                acc.purchases += row.purchases;
                acc
            });
        Ok(totals)
    }

    async fn latest_cohort(&self) -> Result<Option<CohortRetention>> {
        Ok(self
            .cohorts
            .iter()
            .filter(|cohort| cohort.size > 0)
            .max_by_key(|cohort| cohort.cohort_month)
            .copied())
    }

    async fn new_customer_count(&self, range: DateRange) -> Result<i64> {
        Ok(self
            .customer_first_orders
            .iter()
            .filter(|date| range.contains(**date))
            .count() as i64)
    }
}
