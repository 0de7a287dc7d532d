//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One employee's annual tax declaration.
///
/// Identity is the `(employee_id, calendar_year)` pair; at most one record
/// exists per pair. The financial fields are opaque scalars carried through
/// storage and rendering without interpretation. Wire format is camelCase
/// JSON; columns are snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaxFormRecord {
    pub employee_id: i64,
    pub calendar_year: i64,
    pub employee_name: String,
    pub company: String,
    pub department: String,
    pub date: String,

    /// Marital-status code, known domain {1,2,3,4}
    pub status: i64,
    /// Derived label; overwritten from `status` on every write unless the
    /// code is unknown
    #[serde(default)]
    pub status_desc: Option<String>,

    // Allowance flags and amounts
    #[serde(default)]
    pub child_allowance: Option<bool>,
    #[serde(default)]
    pub amt_child_allowance: Option<f64>,
    #[serde(default)]
    pub child_in_after_2018: Option<bool>,
    #[serde(default)]
    pub amt_child_in_after_2018: Option<f64>,
    #[serde(default)]
    pub parental_care_taxpayer_father: Option<bool>,
    #[serde(default)]
    pub amt_parental_care_taxpayer_father: Option<f64>,
    #[serde(default)]
    pub parental_care_taxpayer_mother: Option<bool>,
    #[serde(default)]
    pub amt_parental_care_taxpayer_mother: Option<f64>,
    #[serde(default)]
    pub parental_care_spouse_father: Option<bool>,
    #[serde(default)]
    pub amt_parental_care_spouse_father: Option<f64>,
    #[serde(default)]
    pub parental_care_spouse_mother: Option<bool>,
    #[serde(default)]
    pub amt_parental_care_spouse_mother: Option<f64>,
    #[serde(default)]
    pub disabled_person_support: Option<bool>,
    #[serde(default)]
    pub amt_disabled_person_support: Option<f64>,

    // Insurance and deduction amounts
    #[serde(default)]
    pub health_insurance_taxpayer_father: Option<f64>,
    #[serde(default)]
    pub health_insurance_taxpayer_mother: Option<f64>,
    #[serde(default)]
    pub health_insurance_taxpayer_spouse_father: Option<f64>,
    #[serde(default)]
    pub health_insurance_taxpayer_spouse_mother: Option<f64>,
    #[serde(default)]
    pub life_insurance_paid: Option<f64>,
    #[serde(default)]
    pub pension_insurance_paid: Option<f64>,
    #[serde(default)]
    pub rmf: Option<f64>,
    #[serde(default)]
    pub ssf: Option<f64>,
    #[serde(default)]
    pub interest_pd_on_loan_purchase: Option<f64>,
    #[serde(default)]
    pub donation_supporting_educ_sports: Option<f64>,
    #[serde(default)]
    pub other_donation: Option<f64>,
    #[serde(default)]
    pub health_insurance_taxpayer: Option<f64>,

    // Carry-over amounts from a previous employer
    #[serde(default)]
    pub taxable_income_earned_prev_comp: Option<f64>,
    #[serde(default)]
    pub withholding_tax_prev_comp: Option<f64>,
    #[serde(default)]
    pub ss_prev_comp: Option<f64>,
    #[serde(default)]
    pub pf_prev_comp: Option<f64>,

    // Audit trail, set by the service
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub updated_datetime: Option<DateTime<Utc>>,
}

/// One transaction-log row, written after every successful create/update
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransactionLogEntry {
    pub action: String,
    pub subject: String,
    pub logged_at: DateTime<Utc>,
}

/// One error-log row, written when a write-path failure is caught
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ErrorLogEntry {
    pub message: String,
    pub subject: String,
    pub logged_at: DateTime<Utc>,
}
