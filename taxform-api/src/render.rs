//! Tax-form document rendering
//!
//! `render_lines` is the behavioral contract: one `"<Label>: <value>"` line
//! per record field, in fixed order, with absent values rendered as empty
//! strings so the line count is constant across records. `render_pdf` lays
//! those lines out as a paginated PDF. Rendering is pure with respect to the
//! record, so batch report generation can run each record independently.

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use taxform_common::db::TaxFormRecord;
use taxform_common::{Error, Result};

/// Number of lines in every rendered document
pub const REPORT_LINE_COUNT: usize = 42;

/// Lines per PDF page at the fixed leading
const LINES_PER_PAGE: usize = 44;

/// Every field of the record as a `(label, value)` pair, in render order.
///
/// The order is fixed: identity/descriptive header, status, financial fields
/// in declaration order, audit trail last. Downstream consumers rely on this
/// enumeration being complete and stable.
pub fn field_lines(form: &TaxFormRecord) -> Vec<(String, String)> {
    let mut lines: Vec<(String, String)> = Vec::with_capacity(REPORT_LINE_COUNT);
    let mut push = |label: &str, value: String| lines.push((label.to_string(), value));

    push("Employee Name", form.employee_name.clone());
    push("Calendar Year", form.calendar_year.to_string());
    push("Company", form.company.clone());
    push("Date", form.date.clone());
    push("Employee ID", form.employee_id.to_string());
    push("Department", form.department.clone());
    push("Status", form.status.to_string());
    push("Status Description", opt_str(&form.status_desc));
    push("Child Allowance", opt_bool(form.child_allowance));
    push("Amount Child Allowance", opt_num(form.amt_child_allowance));
    push("Child in After 2018", opt_bool(form.child_in_after_2018));
    push("Amount Child in After 2018", opt_num(form.amt_child_in_after_2018));
    push("Parental Care Taxpayer Father", opt_bool(form.parental_care_taxpayer_father));
    push(
        "Amount Parental Care Taxpayer Father",
        opt_num(form.amt_parental_care_taxpayer_father),
    );
    push("Parental Care Taxpayer Mother", opt_bool(form.parental_care_taxpayer_mother));
    push(
        "Amount Parental Care Taxpayer Mother",
        opt_num(form.amt_parental_care_taxpayer_mother),
    );
    push("Parental Care Spouse Father", opt_bool(form.parental_care_spouse_father));
    push(
        "Amount Parental Care Spouse Father",
        opt_num(form.amt_parental_care_spouse_father),
    );
    push("Parental Care Spouse Mother", opt_bool(form.parental_care_spouse_mother));
    push(
        "Amount Parental Care Spouse Mother",
        opt_num(form.amt_parental_care_spouse_mother),
    );
    push("Disabled Person Support", opt_bool(form.disabled_person_support));
    push("Amount Disabled Person Support", opt_num(form.amt_disabled_person_support));
    push(
        "Health Insurance Taxpayer Father",
        opt_num(form.health_insurance_taxpayer_father),
    );
    push(
        "Health Insurance Taxpayer Mother",
        opt_num(form.health_insurance_taxpayer_mother),
    );
    push(
        "Health Insurance Taxpayer Spouse Father",
        opt_num(form.health_insurance_taxpayer_spouse_father),
    );
    push(
        "Health Insurance Taxpayer Spouse Mother",
        opt_num(form.health_insurance_taxpayer_spouse_mother),
    );
    push("Life Insurance Paid", opt_num(form.life_insurance_paid));
    push("Pension Insurance Paid", opt_num(form.pension_insurance_paid));
    push("RMF", opt_num(form.rmf));
    push("SSF", opt_num(form.ssf));
    push("Interest Paid on Loan Purchase", opt_num(form.interest_pd_on_loan_purchase));
    push(
        "Donation Supporting Education/Sports",
        opt_num(form.donation_supporting_educ_sports),
    );
    push("Other Donation", opt_num(form.other_donation));
    push("Health Insurance Taxpayer", opt_num(form.health_insurance_taxpayer));
    push(
        "Taxable Income Earned from Previous Company",
        opt_num(form.taxable_income_earned_prev_comp),
    );
    push(
        "Withholding Tax from Previous Company",
        opt_num(form.withholding_tax_prev_comp),
    );
    push("SS from Previous Company", opt_num(form.ss_prev_comp));
    push("PF from Previous Company", opt_num(form.pf_prev_comp));
    push("Updated By", opt_str(&form.updated_by));
    push("Updated Datetime", opt_datetime(form.updated_datetime));
    push("Created By", opt_str(&form.created_by));
    push("Created Datetime", opt_datetime(form.created_datetime));

    lines
}

/// Render a record as its fixed-order text lines
pub fn render_lines(form: &TaxFormRecord) -> Vec<String> {
    field_lines(form)
        .into_iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect()
}

/// Render a record as a paginated PDF document
pub fn render_pdf(form: &TaxFormRecord) -> Result<Vec<u8>> {
    let lines = render_lines(form);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for chunk in lines.chunks(LINES_PER_PAGE) {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 11.into()]),
            Operation::new("TL", vec![16.into()]),
            Operation::new("Td", vec![36.into(), 756.into()]),
        ];
        for line in chunk {
            operations.push(Operation::new("Tj", vec![Object::string_literal(line.as_str())]));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| Error::Internal(format!("PDF content encoding failed: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| Error::Internal(format!("PDF serialization failed: {}", e)))?;
    Ok(bytes)
}

fn opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_bool(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_num(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_datetime(value: Option<DateTime<Utc>>) -> String {
    value.map(|v| v.to_rfc3339()).unwrap_or_default()
}
