//! Lead intake module: authenticated submission plus a live stream.

pub mod api;
pub mod domain;

pub use api::route_group;
pub use domain::{LeadContact, LeadSubmissionRequest, LeadSubmissionResponse};
