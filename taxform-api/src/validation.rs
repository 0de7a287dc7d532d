//! Request validation pipeline
//!
//! Two validation stages gate every write:
//! 1. Structural: the raw JSON body is checked against a fixed schema and
//!    every defect is reported, not just the first.
//! 2. Semantic: the parsed record is checked for domain rules the schema
//!    cannot express.
//!
//! The schema requires every field the typed parse requires, so a body that
//! passes stage 1 always deserializes; a parse failure after a clean
//! structural pass is an internal defect, never a user error.

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use taxform_common::db::TaxFormRecord;
use taxform_common::error::ValidationIssue;

/// JSON Schema for the tax-form request body.
///
/// Required fields and primitive types mirror the non-optional fields of
/// [`TaxFormRecord`]; all other fields are typed but optional.
static REQUEST_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "required": [
            "employeeId",
            "calendarYear",
            "employeeName",
            "company",
            "department",
            "date",
            "status"
        ],
        "properties": {
            "employeeId": { "type": "integer" },
            "calendarYear": { "type": "integer" },
            "employeeName": { "type": "string" },
            "company": { "type": "string" },
            "department": { "type": "string" },
            "date": { "type": "string" },
            "status": { "type": "integer" },
            "statusDesc": { "type": ["string", "null"] },

            "childAllowance": { "type": ["boolean", "null"] },
            "amtChildAllowance": { "type": ["number", "null"] },
            "childInAfter2018": { "type": ["boolean", "null"] },
            "amtChildInAfter2018": { "type": ["number", "null"] },
            "parentalCareTaxpayerFather": { "type": ["boolean", "null"] },
            "amtParentalCareTaxpayerFather": { "type": ["number", "null"] },
            "parentalCareTaxpayerMother": { "type": ["boolean", "null"] },
            "amtParentalCareTaxpayerMother": { "type": ["number", "null"] },
            "parentalCareSpouseFather": { "type": ["boolean", "null"] },
            "amtParentalCareSpouseFather": { "type": ["number", "null"] },
            "parentalCareSpouseMother": { "type": ["boolean", "null"] },
            "amtParentalCareSpouseMother": { "type": ["number", "null"] },
            "disabledPersonSupport": { "type": ["boolean", "null"] },
            "amtDisabledPersonSupport": { "type": ["number", "null"] },

            "healthInsuranceTaxpayerFather": { "type": ["number", "null"] },
            "healthInsuranceTaxpayerMother": { "type": ["number", "null"] },
            "healthInsuranceTaxpayerSpouseFather": { "type": ["number", "null"] },
            "healthInsuranceTaxpayerSpouseMother": { "type": ["number", "null"] },
            "lifeInsurancePaid": { "type": ["number", "null"] },
            "pensionInsurancePaid": { "type": ["number", "null"] },
            "rmf": { "type": ["number", "null"] },
            "ssf": { "type": ["number", "null"] },
            "interestPdOnLoanPurchase": { "type": ["number", "null"] },
            "donationSupportingEducSports": { "type": ["number", "null"] },
            "otherDonation": { "type": ["number", "null"] },
            "healthInsuranceTaxpayer": { "type": ["number", "null"] },
            "taxableIncomeEarnedPrevComp": { "type": ["number", "null"] },
            "withholdingTaxPrevComp": { "type": ["number", "null"] },
            "ssPrevComp": { "type": ["number", "null"] },
            "pfPrevComp": { "type": ["number", "null"] },

            "createdBy": { "type": ["string", "null"] },
            "createdDatetime": { "type": ["string", "null"], "format": "date-time" },
            "updatedBy": { "type": ["string", "null"] },
            "updatedDatetime": { "type": ["string", "null"], "format": "date-time" }
        }
    })
});

/// Schema validator, compiled once at first use
static VALIDATOR: Lazy<Validator> = Lazy::new(|| {
    jsonschema::options()
        .should_validate_formats(true)
        .build(&REQUEST_SCHEMA)
        .expect("request schema is well-formed")
});

/// Stage 1: structural validation of the raw request body.
///
/// Exhaustive: returns every defect found. An empty vector means the body
/// is guaranteed to deserialize into [`TaxFormRecord`].
pub fn validate_schema(body: &Value) -> Vec<ValidationIssue> {
    VALIDATOR
        .iter_errors(body)
        .map(|error| ValidationIssue {
            message: error.to_string(),
            path: error.instance_path.to_string(),
        })
        .collect()
}

/// Stage 2 (semantic): domain rules beyond what the schema expresses.
///
/// Exhaustive like the structural stage. Status codes outside {1,2,3,4} are
/// deliberately not flagged here; an unknown code is a no-op for the label
/// resolver, not an error.
pub fn validate_model(record: &TaxFormRecord) -> Vec<String> {
    let mut errors = Vec::new();

    if record.employee_id < 1 {
        errors.push(format!("employeeId must be positive, got {}", record.employee_id));
    }
    if !(1990..=2100).contains(&record.calendar_year) {
        errors.push(format!(
            "calendarYear must be between 1990 and 2100, got {}",
            record.calendar_year
        ));
    }
    if record.employee_name.trim().is_empty() {
        errors.push("employeeName must not be blank".to_string());
    }
    if chrono::NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").is_err() {
        errors.push(format!("date must be YYYY-MM-DD, got '{}'", record.date));
    }

    for (label, amount) in amount_fields(record) {
        if let Some(value) = amount {
            if value < 0.0 {
                errors.push(format!("{} must not be negative, got {}", label, value));
            }
        }
    }

    for (flag_label, flag, amount) in allowance_pairs(record) {
        if flag == Some(false) && amount.map_or(false, |a| a > 0.0) {
            errors.push(format!(
                "{} amount supplied while the allowance flag is false",
                flag_label
            ));
        }
    }

    errors
}

/// Every amount field with its wire name, for range checks
fn amount_fields(record: &TaxFormRecord) -> [(&'static str, Option<f64>); 23] {
    [
        ("amtChildAllowance", record.amt_child_allowance),
        ("amtChildInAfter2018", record.amt_child_in_after_2018),
        ("amtParentalCareTaxpayerFather", record.amt_parental_care_taxpayer_father),
        ("amtParentalCareTaxpayerMother", record.amt_parental_care_taxpayer_mother),
        ("amtParentalCareSpouseFather", record.amt_parental_care_spouse_father),
        ("amtParentalCareSpouseMother", record.amt_parental_care_spouse_mother),
        ("amtDisabledPersonSupport", record.amt_disabled_person_support),
        ("healthInsuranceTaxpayerFather", record.health_insurance_taxpayer_father),
        ("healthInsuranceTaxpayerMother", record.health_insurance_taxpayer_mother),
        (
            "healthInsuranceTaxpayerSpouseFather",
            record.health_insurance_taxpayer_spouse_father,
        ),
        (
            "healthInsuranceTaxpayerSpouseMother",
            record.health_insurance_taxpayer_spouse_mother,
        ),
        ("lifeInsurancePaid", record.life_insurance_paid),
        ("pensionInsurancePaid", record.pension_insurance_paid),
        ("rmf", record.rmf),
        ("ssf", record.ssf),
        ("interestPdOnLoanPurchase", record.interest_pd_on_loan_purchase),
        ("donationSupportingEducSports", record.donation_supporting_educ_sports),
        ("otherDonation", record.other_donation),
        ("healthInsuranceTaxpayer", record.health_insurance_taxpayer),
        ("taxableIncomeEarnedPrevComp", record.taxable_income_earned_prev_comp),
        ("withholdingTaxPrevComp", record.withholding_tax_prev_comp),
        ("ssPrevComp", record.ss_prev_comp),
        ("pfPrevComp", record.pf_prev_comp),
    ]
}

/// Flag/amount pairs that must agree
fn allowance_pairs(record: &TaxFormRecord) -> [(&'static str, Option<bool>, Option<f64>); 7] {
    [
        ("childAllowance", record.child_allowance, record.amt_child_allowance),
        ("childInAfter2018", record.child_in_after_2018, record.amt_child_in_after_2018),
        (
            "parentalCareTaxpayerFather",
            record.parental_care_taxpayer_father,
            record.amt_parental_care_taxpayer_father,
        ),
        (
            "parentalCareTaxpayerMother",
            record.parental_care_taxpayer_mother,
            record.amt_parental_care_taxpayer_mother,
        ),
        (
            "parentalCareSpouseFather",
            record.parental_care_spouse_father,
            record.amt_parental_care_spouse_father,
        ),
        (
            "parentalCareSpouseMother",
            record.parental_care_spouse_mother,
            record.amt_parental_care_spouse_mother,
        ),
        (
            "disabledPersonSupport",
            record.disabled_person_support,
            record.amt_disabled_person_support,
        ),
    ]
}
