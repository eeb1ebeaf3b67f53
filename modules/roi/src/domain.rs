//! ROI calculator data model.

use serde::{Deserialize, Serialize};

/// Assumption set for one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryProfile {
    pub key: String,
    pub label: String,
    /// Share of labor cost expected to be saved by automation.
    pub savings_rate: f64,
    /// Plus/minus range expressing conservative vs aggressive scenarios.
    pub variance: f64,
    pub description: Option<String>,
}

/// Inputs collected from the calculator form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiInputs {
    /// Manual hours a team spends each week.
    pub hours_per_week: f64,
    /// Fully-loaded hourly labor rate.
    pub labor_rate: f64,
    /// Monthly investment in the automation platform.
    pub tool_cost: f64,
    /// Industry profile key selecting the assumption set.
    pub industry: String,
}

impl RoiInputs {
    /// Range checks matching the calculator form limits.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=80.0).contains(&self.hours_per_week) {
            return Err("hours_per_week must be between 0 and 80".to_owned());
        }
        if !(0.0..=1000.0).contains(&self.labor_rate) {
            return Err("labor_rate must be between 0 and 1000".to_owned());
        }
        if !(0.0..=10000.0).contains(&self.tool_cost) {
            return Err("tool_cost must be between 0 and 10000".to_owned());
        }
        Ok(())
    }
}

/// Dataset entry for the bar chart visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiChartBar {
    pub name: String,
    pub annual: f64,
}

/// Key KPIs surfaced to the end user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiMetrics {
    pub annual_labor_cost: f64,
    pub annual_savings_low: f64,
    pub annual_savings_expected: f64,
    pub annual_savings_high: f64,
    pub monthly_savings: f64,
    pub annual_tool_cost: f64,
    pub net_annual_savings: f64,
    pub payback_months: Option<f64>,
}

/// Short-form insights rendered in the UI or email copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiNarrative {
    pub headline: String,
    pub highlights: Vec<String>,
}

/// Canonical ROI payload returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiCalculationResult {
    pub profile: IndustryProfile,
    pub inputs: RoiInputs,
    pub metrics: RoiMetrics,
    pub chart: Vec<RoiChartBar>,
    pub narrative: RoiNarrative,
}
