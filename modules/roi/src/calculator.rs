//! ROI math and narrative generation.

use std::sync::LazyLock;

use crate::domain::{
    IndustryProfile, RoiCalculationResult, RoiChartBar, RoiInputs, RoiMetrics, RoiNarrative,
};

/// Baseline industry assumptions. Rates represent the share of labor
/// hours that can realistically be automated today.
static INDUSTRY_PROFILES: LazyLock<Vec<IndustryProfile>> = LazyLock::new(|| {
    vec![
        profile(
            "general",
            "General / Services",
            0.7,
            0.07,
            "Knowledge work teams replacing repetitive admin steps",
        ),
        profile(
            "manufacturing",
            "Manufacturing",
            0.78,
            0.06,
            "High-volume production flows with QA loops",
        ),
        profile(
            "retail",
            "Retail / E-commerce",
            0.65,
            0.08,
            "Ops teams automating catalog + support work",
        ),
        profile(
            "automotive",
            "Automotive",
            0.8,
            0.05,
            "Dealership + service teams orchestrating lead follow-up",
        ),
        profile(
            "personal_care",
            "Personal Care",
            0.6,
            0.1,
            "Studios + clinics automating scheduling + reminders",
        ),
    ]
});

fn profile(
    key: &str,
    label: &str,
    savings_rate: f64,
    variance: f64,
    description: &str,
) -> IndustryProfile {
    IndustryProfile {
        key: key.to_owned(),
        label: label.to_owned(),
        savings_rate,
        variance,
        description: Some(description.to_owned()),
    }
}

/// All known industry profiles, `general` first.
#[must_use]
pub fn industry_profiles() -> &'static [IndustryProfile] {
    &INDUSTRY_PROFILES
}

fn profile_for(industry: &str) -> &'static IndustryProfile {
    INDUSTRY_PROFILES
        .iter()
        .find(|p| p.key == industry)
        .unwrap_or(&INDUSTRY_PROFILES[0])
}

/// Calculate automation ROI. Unknown industries fall back to the
/// general profile.
#[must_use]
pub fn calculate(inputs: &RoiInputs) -> RoiCalculationResult {
    let profile = profile_for(&inputs.industry);
    let hours_per_year = inputs.hours_per_week * 52.0;
    let annual_labor_cost = hours_per_year * inputs.labor_rate;
    let savings_expected = annual_labor_cost * profile.savings_rate;
    let savings_low = annual_labor_cost * (profile.savings_rate - profile.variance).max(0.0);
    let savings_high = annual_labor_cost * (profile.savings_rate + profile.variance).min(0.95);
    let monthly_savings = savings_expected / 12.0;
    let annual_tool_cost = inputs.tool_cost * 12.0;
    let net_annual_savings = savings_expected - annual_tool_cost;
    let net_monthly_savings = monthly_savings - inputs.tool_cost;
    let payback_months =
        (net_monthly_savings > 0.0).then(|| inputs.tool_cost / net_monthly_savings);

    let automated_cost = annual_labor_cost - savings_expected + annual_tool_cost;

    let narrative = RoiNarrative {
        headline: format!(
            "{} in net savings within year one",
            usd(net_annual_savings)
        ),
        highlights: vec![
            format!(
                "Automating {:.0} hrs/week in {} unlocks {}/month",
                inputs.hours_per_week,
                profile.label,
                usd(monthly_savings)
            ),
            payback_months.map_or_else(
                || "Savings offset the investment immediately".to_owned(),
                |months| format!("Payback expected in {months:.1} months"),
            ),
            format!("Annual tool spend assumed at {}", usd(annual_tool_cost)),
        ],
    };

    RoiCalculationResult {
        profile: profile.clone(),
        inputs: inputs.clone(),
        metrics: RoiMetrics {
            annual_labor_cost,
            annual_savings_low: savings_low,
            annual_savings_expected: savings_expected,
            annual_savings_high: savings_high,
            monthly_savings,
            annual_tool_cost,
            net_annual_savings,
            payback_months,
        },
        chart: vec![
            RoiChartBar {
                name: "Current Cost".to_owned(),
                annual: annual_labor_cost,
            },
            RoiChartBar {
                name: "Automated Cost".to_owned(),
                annual: automated_cost.max(0.0),
            },
        ],
        narrative,
    }
}

/// Render a dollar amount rounded to whole dollars with thousands
/// separators, e.g. `$17,000`.
fn usd(value: f64) -> String {
    let rounded = value.round() as i64;
    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("$-{grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(industry: &str) -> RoiInputs {
        RoiInputs {
            hours_per_week: 10.0,
            labor_rate: 50.0,
            tool_cost: 100.0,
            industry: industry.to_owned(),
        }
    }

    #[test]
    fn general_profile_math() {
        let result = calculate(&inputs("general"));
        let m = &result.metrics;

        // 10 hrs/week * 52 * $50 = $26,000 annual labor cost.
        assert_eq!(m.annual_labor_cost, 26_000.0);
        assert_eq!(m.annual_savings_expected, 26_000.0 * 0.7);
        assert_eq!(m.annual_savings_low, 26_000.0 * 0.63);
        assert!((m.annual_savings_high - 26_000.0 * 0.77).abs() < 1e-9);
        assert_eq!(m.annual_tool_cost, 1_200.0);
        assert_eq!(m.net_annual_savings, 18_200.0 - 1_200.0);

        let payback = m.payback_months.unwrap();
        let net_monthly = 18_200.0 / 12.0 - 100.0;
        assert!((payback - 100.0 / net_monthly).abs() < 1e-9);
    }

    #[test]
    fn unknown_industry_falls_back_to_general() {
        let result = calculate(&inputs("space-mining"));
        assert_eq!(result.profile.key, "general");
    }

    #[test]
    fn no_payback_when_tool_cost_exceeds_savings() {
        let result = calculate(&RoiInputs {
            hours_per_week: 1.0,
            labor_rate: 10.0,
            tool_cost: 1_000.0,
            industry: "general".to_owned(),
        });
        assert!(result.metrics.payback_months.is_none());
        assert_eq!(
            result.narrative.highlights[1],
            "Savings offset the investment immediately"
        );
    }

    #[test]
    fn savings_high_is_capped() {
        // Automotive: 0.8 + 0.05 = 0.85, under the 0.95 cap.
        let result = calculate(&inputs("automotive"));
        assert!(
            (result.metrics.annual_savings_high - 26_000.0 * 0.85).abs() < 1e-9
        );
    }

    #[test]
    fn chart_never_goes_negative() {
        let result = calculate(&RoiInputs {
            hours_per_week: 0.0,
            labor_rate: 0.0,
            tool_cost: 0.0,
            industry: "general".to_owned(),
        });
        assert!(result.chart.iter().all(|bar| bar.annual >= 0.0));
    }

    #[test]
    fn usd_groups_thousands() {
        assert_eq!(usd(17_000.0), "$17,000");
        assert_eq!(usd(1_234_567.4), "$1,234,567");
        assert_eq!(usd(999.0), "$999");
        assert_eq!(usd(-1_200.0), "$-1,200");
        assert_eq!(usd(0.0), "$0");
    }

    #[test]
    fn profiles_start_with_general() {
        assert_eq!(industry_profiles()[0].key, "general");
        assert_eq!(industry_profiles().len(), 5);
    }
}
