use serde::Deserialize;

use super::types::GrowthModelInput;
use crate::error::GrowthModelError;

pub const DEFAULT_RETURN_RATE: f64 = 0.20;
pub const DEFAULT_AVG_ORDERS_PER_CUSTOMER: f64 = 1.3;
pub const DEFAULT_HORIZON_MONTHS: u32 = 6;
/// Longest accepted projection; the cohort loop is quadratic in the horizon
pub const MAX_HORIZON_MONTHS: u32 = 120;

/// Request body for compute/create/update. Every field is optional so a single
/// validation pass can report all missing fields at once.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrowthModelInputPayload {
    pub monthly_budget: Option<f64>,
    pub target_cac: Option<f64>,
    pub expected_cvr: Option<f64>,
    pub avg_order_value: Option<f64>,
    pub cogs_percent: Option<f64>,
    pub monthly_traffic: Option<i64>,
    pub return_rate: Option<f64>,
    pub avg_orders_per_customer: Option<f64>,
    pub horizon_months: Option<i64>,
}

impl GrowthModelInputPayload {
    /// Names (wire spelling) of required fields that are absent
    pub fn missing_required(&self) -> Vec<String> {
        let required = [
            ("monthlyBudget", self.monthly_budget.is_none()),
            ("targetCac", self.target_cac.is_none()),
            ("expectedCvr", self.expected_cvr.is_none()),
            ("avgOrderValue", self.avg_order_value.is_none()),
            ("cogsPercent", self.cogs_percent.is_none()),
        ];
        required
            .iter()
            .filter(|(_, missing)| *missing)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Names of supplied fields whose value is outside the accepted range
    pub fn invalid_fields(&self) -> Vec<String> {
        let mut invalid = Vec::new();
        let mut check = |name: &str, value: Option<f64>, ok: fn(f64) -> bool| {
            if let Some(v) = value {
                if !v.is_finite() || !ok(v) {
                    invalid.push(name.to_string());
                }
            }
        };

        check("monthlyBudget", self.monthly_budget, |v: f64| v >= 0.0);
        check("targetCac", self.target_cac, |v: f64| v >= 0.0);
        check("expectedCvr", self.expected_cvr, is_fraction);
        check("avgOrderValue", self.avg_order_value, |v: f64| v > 0.0);
        check("cogsPercent", self.cogs_percent, is_fraction);
        check("returnRate", self.return_rate, is_fraction);
        check("avgOrdersPerCustomer", self.avg_orders_per_customer, |v: f64| v >= 0.0);

        if matches!(self.monthly_traffic, Some(t) if t < 0) {
            invalid.push("monthlyTraffic".to_string());
        }
        if matches!(self.horizon_months, Some(h) if h < 1 || h > MAX_HORIZON_MONTHS as i64) {
            invalid.push("horizonMonths".to_string());
        }
        invalid
    }

    /// Validate a payload that has to stand on its own (compute, create)
    pub fn validate_complete(&self) -> Result<(), GrowthModelError> {
        let missing = self.missing_required();
        let invalid = self.invalid_fields();
        if missing.is_empty() && invalid.is_empty() {
            Ok(())
        } else {
            Err(GrowthModelError::Validation { missing, invalid })
        }
    }

    /// Build a full input, falling back to defaults for optional fields.
    /// Runs `validate_complete` first.
    pub fn into_input(self) -> Result<GrowthModelInput, GrowthModelError> {
        self.validate_complete()?;
        let base = GrowthModelInput {
            monthly_budget: 0.0,
            target_cac: 0.0,
            expected_cvr: 0.0,
            avg_order_value: 0.0,
            cogs_percent: 0.0,
            monthly_traffic: None,
            return_rate: DEFAULT_RETURN_RATE,
            avg_orders_per_customer: DEFAULT_AVG_ORDERS_PER_CUSTOMER,
            horizon_months: DEFAULT_HORIZON_MONTHS,
        };
        Ok(self.merge_over(&base))
    }

    /// Field-by-field overlay: absent fields keep `prior`'s value.
    /// Callers validate first; horizon is assumed in range.
    pub fn merge_over(&self, prior: &GrowthModelInput) -> GrowthModelInput {
        GrowthModelInput {
            monthly_budget: self.monthly_budget.unwrap_or(prior.monthly_budget),
            target_cac: self.target_cac.unwrap_or(prior.target_cac),
            expected_cvr: self.expected_cvr.unwrap_or(prior.expected_cvr),
            avg_order_value: self.avg_order_value.unwrap_or(prior.avg_order_value),
            cogs_percent: self.cogs_percent.unwrap_or(prior.cogs_percent),
            monthly_traffic: self.monthly_traffic.or(prior.monthly_traffic),
            return_rate: self.return_rate.unwrap_or(prior.return_rate),
            avg_orders_per_customer: self
                .avg_orders_per_customer
                .unwrap_or(prior.avg_orders_per_customer),
            horizon_months: self
                .horizon_months
                .and_then(|h| u32::try_from(h).ok())
                .unwrap_or(prior.horizon_months),
        }
    }
}

impl From<&GrowthModelInput> for GrowthModelInputPayload {
    fn from(input: &GrowthModelInput) -> Self {
        Self {
            monthly_budget: Some(input.monthly_budget),
            target_cac: Some(input.target_cac),
            expected_cvr: Some(input.expected_cvr),
            avg_order_value: Some(input.avg_order_value),
            cogs_percent: Some(input.cogs_percent),
            monthly_traffic: input.monthly_traffic,
            return_rate: Some(input.return_rate),
            avg_orders_per_customer: Some(input.avg_orders_per_customer),
            horizon_months: Some(input.horizon_months as i64),
        }
    }
}

fn is_fraction(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_only() -> GrowthModelInputPayload {
        GrowthModelInputPayload {
            monthly_budget: Some(10_000.0),
            target_cac: Some(50.0),
            expected_cvr: Some(0.025),
            avg_order_value: Some(100.0),
            cogs_percent: Some(0.4),
            ..Default::default()
        }
    }

    #[test]
    fn empty_payload_names_every_required_field() {
        let err = GrowthModelInputPayload::default()
            .validate_complete()
            .expect_err("empty payload must be rejected");
        match err {
            GrowthModelError::Validation { missing, invalid } => {
                assert_eq!(
                    missing,
                    vec!["monthlyBudget", "targetCac", "expectedCvr", "avgOrderValue", "cogsPercent"]
                );
                assert!(invalid.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn parses_camel_case_json() {
        let payload: GrowthModelInputPayload = serde_json::from_str(
            r#"{"monthlyBudget": 5000, "targetCac": 40, "horizonMonths": 9, "monthlyTraffic": 1200}"#,
        )
        .expect("valid json");
        assert_eq!(payload.monthly_budget, Some(5000.0));
        assert_eq!(payload.target_cac, Some(40.0));
        assert_eq!(payload.horizon_months, Some(9));
        assert_eq!(payload.monthly_traffic, Some(1200));
        assert_eq!(payload.missing_required(), vec!["expectedCvr", "avgOrderValue", "cogsPercent"]);
    }

    #[test]
    fn optional_fields_fall_back_to_defaults() {
        let input = required_only().into_input().expect("valid payload");
        assert_eq!(input.return_rate, DEFAULT_RETURN_RATE);
        assert_eq!(input.avg_orders_per_customer, DEFAULT_AVG_ORDERS_PER_CUSTOMER);
        assert_eq!(input.horizon_months, DEFAULT_HORIZON_MONTHS);
        assert_eq!(input.monthly_traffic, None);
        assert_eq!(input.monthly_budget, 10_000.0);
    }

    #[test]
    fn out_of_range_values_are_reported_together() {
        let payload = GrowthModelInputPayload {
            monthly_budget: Some(-1.0),
            cogs_percent: Some(1.5),
            horizon_months: Some(0),
            ..required_only()
        };
        match payload.validate_complete() {
            Err(GrowthModelError::Validation { missing, invalid }) => {
                assert!(missing.is_empty());
                assert_eq!(invalid, vec!["monthlyBudget", "cogsPercent", "horizonMonths"]);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn horizon_above_cap_is_invalid() {
        let at_cap = GrowthModelInputPayload {
            horizon_months: Some(MAX_HORIZON_MONTHS as i64),
            ..required_only()
        };
        assert!(at_cap.invalid_fields().is_empty());

        let over_cap = GrowthModelInputPayload {
            horizon_months: Some(MAX_HORIZON_MONTHS as i64 + 1),
            ..required_only()
        };
        assert_eq!(over_cap.invalid_fields(), vec!["horizonMonths"]);

        let huge = GrowthModelInputPayload {
            horizon_months: Some(60_000),
            ..required_only()
        };
        assert!(matches!(
            huge.into_input(),
            Err(GrowthModelError::Validation { invalid, .. }) if invalid == vec!["horizonMonths"]
        ));
    }

    #[test]
    fn merge_keeps_absent_fields() {
        let prior = required_only().into_input().expect("valid payload");
        let patch = GrowthModelInputPayload {
            monthly_budget: Some(20_000.0),
            horizon_months: Some(12),
            ..Default::default()
        };
        let merged = patch.merge_over(&prior);
        assert_eq!(merged.monthly_budget, 20_000.0);
        assert_eq!(merged.horizon_months, 12);
        assert_eq!(merged.target_cac, prior.target_cac);
        assert_eq!(merged.cogs_percent, prior.cogs_percent);
        assert_eq!(merged.return_rate, prior.return_rate);
    }
}
