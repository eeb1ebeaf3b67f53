//! Automation ROI calculator module.

pub mod api;
pub mod calculator;
pub mod domain;

pub use api::route_group;
pub use calculator::{calculate, industry_profiles};
pub use domain::{
    IndustryProfile, RoiCalculationResult, RoiChartBar, RoiInputs, RoiMetrics, RoiNarrative,
};
