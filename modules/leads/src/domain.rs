//! Lead intake data model.

use roi::{RoiCalculationResult, RoiInputs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadContact {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub notes: Option<String>,
}

impl LeadContact {
    /// Form-level checks applied before the lead is recorded.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().len() < 2 {
            return Err("name must be at least 2 characters".to_owned());
        }
        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid_email {
            return Err("email is not a valid address".to_owned());
        }
        if self.company.trim().len() < 2 {
            return Err("company must be at least 2 characters".to_owned());
        }
        if self.phone.trim().len() < 5 {
            return Err("phone must be at least 5 characters".to_owned());
        }
        if self.notes.as_ref().is_some_and(|n| n.len() > 1000) {
            return Err("notes must be at most 1000 characters".to_owned());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSubmissionRequest {
    pub contact: LeadContact,
    pub inputs: RoiInputs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSubmissionResponse {
    pub roi: RoiCalculationResult,
    pub message: String,
}
