//! Record-service facade
//!
//! Orchestrates the write pipeline (schema validation, parse, model
//! validation, duplicate fast-path, status resolution, persistence, audit
//! emission) and the filtered/paginated read path. Steps within one request
//! run strictly in that order; nothing here retries, a storage failure
//! propagates as-is after the error-log row is written.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::warn;

use taxform_common::db::TaxFormRecord;
use taxform_common::{resolve_status, Error, Result};

use crate::validation;

/// Optional filters and pagination for the read path.
///
/// All fields are optional; omitted `page_number` means the full result set.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxFormFilter {
    pub year: Option<i64>,
    pub company: Option<String>,
    pub employee_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

/// Facade over storage and audit collaborators
#[derive(Clone)]
pub struct TaxFormService {
    pool: SqlitePool,
    default_page_size: i64,
}

impl TaxFormService {
    pub fn new(pool: SqlitePool, default_page_size: i64) -> Self {
        Self {
            pool,
            default_page_size,
        }
    }

    /// Fetch records matching the filter, in `(employee_id, calendar_year)`
    /// order, unmodified.
    pub async fn list(&self, filter: &TaxFormFilter) -> Result<Vec<TaxFormRecord>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM tax_forms WHERE 1 = 1");

        if let Some(year) = filter.year {
            query.push(" AND calendar_year = ").push_bind(year);
        }
        if let Some(company) = &filter.company {
            query.push(" AND company = ").push_bind(company);
        }
        if let Some(employee_id) = filter.employee_id {
            query.push(" AND employee_id = ").push_bind(employee_id);
        }
        if let Some(start_date) = &filter.start_date {
            query.push(" AND date >= ").push_bind(start_date);
        }
        if let Some(end_date) = &filter.end_date {
            query.push(" AND date <= ").push_bind(end_date);
        }

        query.push(" ORDER BY employee_id, calendar_year");

        if let Some(page_number) = filter.page_number {
            let page_size = filter.page_size.unwrap_or(self.default_page_size).max(1);
            let offset = (page_number.max(1) - 1) * page_size;
            query.push(" LIMIT ").push_bind(page_size);
            query.push(" OFFSET ").push_bind(offset);
        }

        let records = query
            .build_query_as::<TaxFormRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    /// Whether a record already exists for this employee and year
    pub async fn exists(&self, employee_id: i64, calendar_year: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tax_forms WHERE employee_id = ? AND calendar_year = ?",
        )
        .bind(employee_id)
        .bind(calendar_year)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Create a record from a raw JSON body.
    ///
    /// Full write pipeline: schema check, parse, model check, duplicate
    /// fast-path, status resolution, insert, transaction log.
    pub async fn create(&self, body: Value) -> Result<TaxFormRecord> {
        let mut form = self.validate(body)?;

        // Advisory duplicate check; the UNIQUE constraint still backstops a
        // lost race with the storage-constraint error instead.
        if self.exists(form.employee_id, form.calendar_year).await? {
            return Err(Error::Duplicate);
        }

        form.status_desc = resolve_status(form.status, form.status_desc.take());

        if let Err(e) = self.insert(&form).await {
            self.log_write_failure(&e, &form.employee_name).await;
            return Err(e);
        }

        let logged_at = form.created_datetime.unwrap_or_else(Utc::now);
        self.log_transaction("Create", &form.employee_name, logged_at)
            .await?;

        Ok(form)
    }

    /// Update an existing record from a raw JSON body.
    ///
    /// Same pipeline as create without the duplicate check; the record's
    /// creation audit fields are never touched.
    pub async fn update(&self, body: Value) -> Result<TaxFormRecord> {
        let mut form = self.validate(body)?;

        form.status_desc = resolve_status(form.status, form.status_desc.take());

        if let Err(e) = self.apply_update(&form).await {
            self.log_write_failure(&e, &form.employee_name).await;
            return Err(e);
        }

        let logged_at = form.updated_datetime.unwrap_or_else(Utc::now);
        self.log_transaction("Update", &form.employee_name, logged_at)
            .await?;

        Ok(form)
    }

    /// Stages 1-3 of the write pipeline, shared by create and update
    fn validate(&self, body: Value) -> Result<TaxFormRecord> {
        let issues = validation::validate_schema(&body);
        if !issues.is_empty() {
            return Err(Error::Validation(issues));
        }

        // The schema requires everything the typed shape requires, so this
        // parse cannot fail on user input.
        let form: TaxFormRecord = serde_json::from_value(body)
            .map_err(|e| Error::Internal(format!("Schema-validated body failed to parse: {}", e)))?;

        let messages = validation::validate_model(&form);
        if !messages.is_empty() {
            return Err(Error::Model(messages));
        }

        Ok(form)
    }

    async fn insert(&self, form: &TaxFormRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tax_forms (
                employee_id, calendar_year, employee_name, company, department, date,
                status, status_desc,
                child_allowance, amt_child_allowance,
                child_in_after_2018, amt_child_in_after_2018,
                parental_care_taxpayer_father, amt_parental_care_taxpayer_father,
                parental_care_taxpayer_mother, amt_parental_care_taxpayer_mother,
                parental_care_spouse_father, amt_parental_care_spouse_father,
                parental_care_spouse_mother, amt_parental_care_spouse_mother,
                disabled_person_support, amt_disabled_person_support,
                health_insurance_taxpayer_father, health_insurance_taxpayer_mother,
                health_insurance_taxpayer_spouse_father, health_insurance_taxpayer_spouse_mother,
                life_insurance_paid, pension_insurance_paid, rmf, ssf,
                interest_pd_on_loan_purchase, donation_supporting_educ_sports,
                other_donation, health_insurance_taxpayer,
                taxable_income_earned_prev_comp, withholding_tax_prev_comp,
                ss_prev_comp, pf_prev_comp,
                created_by, created_datetime, updated_by, updated_datetime
            ) VALUES (
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
            )
            "#,
        )
        .bind(form.employee_id)
        .bind(form.calendar_year)
        .bind(&form.employee_name)
        .bind(&form.company)
        .bind(&form.department)
        .bind(&form.date)
        .bind(form.status)
        .bind(&form.status_desc)
        .bind(form.child_allowance)
        .bind(form.amt_child_allowance)
        .bind(form.child_in_after_2018)
        .bind(form.amt_child_in_after_2018)
        .bind(form.parental_care_taxpayer_father)
        .bind(form.amt_parental_care_taxpayer_father)
        .bind(form.parental_care_taxpayer_mother)
        .bind(form.amt_parental_care_taxpayer_mother)
        .bind(form.parental_care_spouse_father)
        .bind(form.amt_parental_care_spouse_father)
        .bind(form.parental_care_spouse_mother)
        .bind(form.amt_parental_care_spouse_mother)
        .bind(form.disabled_person_support)
        .bind(form.amt_disabled_person_support)
        .bind(form.health_insurance_taxpayer_father)
        .bind(form.health_insurance_taxpayer_mother)
        .bind(form.health_insurance_taxpayer_spouse_father)
        .bind(form.health_insurance_taxpayer_spouse_mother)
        .bind(form.life_insurance_paid)
        .bind(form.pension_insurance_paid)
        .bind(form.rmf)
        .bind(form.ssf)
        .bind(form.interest_pd_on_loan_purchase)
        .bind(form.donation_supporting_educ_sports)
        .bind(form.other_donation)
        .bind(form.health_insurance_taxpayer)
        .bind(form.taxable_income_earned_prev_comp)
        .bind(form.withholding_tax_prev_comp)
        .bind(form.ss_prev_comp)
        .bind(form.pf_prev_comp)
        .bind(&form.created_by)
        .bind(form.created_datetime)
        .bind(&form.updated_by)
        .bind(form.updated_datetime)
        .execute(&self.pool)
        .await
        .map_err(map_storage_error)?;
        Ok(())
    }

    async fn apply_update(&self, form: &TaxFormRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tax_forms SET
                employee_name = ?, company = ?, department = ?, date = ?,
                status = ?, status_desc = ?,
                child_allowance = ?, amt_child_allowance = ?,
                child_in_after_2018 = ?, amt_child_in_after_2018 = ?,
                parental_care_taxpayer_father = ?, amt_parental_care_taxpayer_father = ?,
                parental_care_taxpayer_mother = ?, amt_parental_care_taxpayer_mother = ?,
                parental_care_spouse_father = ?, amt_parental_care_spouse_father = ?,
                parental_care_spouse_mother = ?, amt_parental_care_spouse_mother = ?,
                disabled_person_support = ?, amt_disabled_person_support = ?,
                health_insurance_taxpayer_father = ?, health_insurance_taxpayer_mother = ?,
                health_insurance_taxpayer_spouse_father = ?, health_insurance_taxpayer_spouse_mother = ?,
                life_insurance_paid = ?, pension_insurance_paid = ?, rmf = ?, ssf = ?,
                interest_pd_on_loan_purchase = ?, donation_supporting_educ_sports = ?,
                other_donation = ?, health_insurance_taxpayer = ?,
                taxable_income_earned_prev_comp = ?, withholding_tax_prev_comp = ?,
                ss_prev_comp = ?, pf_prev_comp = ?,
                updated_by = ?, updated_datetime = ?
            WHERE employee_id = ? AND calendar_year = ?
            "#,
        )
        .bind(&form.employee_name)
        .bind(&form.company)
        .bind(&form.department)
        .bind(&form.date)
        .bind(form.status)
        .bind(&form.status_desc)
        .bind(form.child_allowance)
        .bind(form.amt_child_allowance)
        .bind(form.child_in_after_2018)
        .bind(form.amt_child_in_after_2018)
        .bind(form.parental_care_taxpayer_father)
        .bind(form.amt_parental_care_taxpayer_father)
        .bind(form.parental_care_taxpayer_mother)
        .bind(form.amt_parental_care_taxpayer_mother)
        .bind(form.parental_care_spouse_father)
        .bind(form.amt_parental_care_spouse_father)
        .bind(form.parental_care_spouse_mother)
        .bind(form.amt_parental_care_spouse_mother)
        .bind(form.disabled_person_support)
        .bind(form.amt_disabled_person_support)
        .bind(form.health_insurance_taxpayer_father)
        .bind(form.health_insurance_taxpayer_mother)
        .bind(form.health_insurance_taxpayer_spouse_father)
        .bind(form.health_insurance_taxpayer_spouse_mother)
        .bind(form.life_insurance_paid)
        .bind(form.pension_insurance_paid)
        .bind(form.rmf)
        .bind(form.ssf)
        .bind(form.interest_pd_on_loan_purchase)
        .bind(form.donation_supporting_educ_sports)
        .bind(form.other_donation)
        .bind(form.health_insurance_taxpayer)
        .bind(form.taxable_income_earned_prev_comp)
        .bind(form.withholding_tax_prev_comp)
        .bind(form.ss_prev_comp)
        .bind(form.pf_prev_comp)
        .bind(&form.updated_by)
        .bind(form.updated_datetime)
        .bind(form.employee_id)
        .bind(form.calendar_year)
        .execute(&self.pool)
        .await
        .map_err(map_storage_error)?;

        if result.rows_affected() == 0 {
            return Err(Error::Model(vec![format!(
                "No tax form exists for employee {} in {}",
                form.employee_id, form.calendar_year
            )]));
        }
        Ok(())
    }

    /// One transaction-log row per successful create/update
    async fn log_transaction(
        &self,
        action: &str,
        subject: &str,
        logged_at: chrono::DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("INSERT INTO transaction_log (action, subject, logged_at) VALUES (?, ?, ?)")
            .bind(action)
            .bind(subject)
            .bind(logged_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// One error-log row per caught write failure. Best-effort: a failure
    /// writing the log row must not mask the original error.
    async fn log_write_failure(&self, error: &Error, subject: &str) {
        let result = sqlx::query("INSERT INTO error_log (message, subject, logged_at) VALUES (?, ?, ?)")
            .bind(error.to_string())
            .bind(subject)
            .bind(Utc::now())
            .execute(&self.pool)
            .await;
        if let Err(e) = result {
            warn!("Failed to write error log entry: {}", e);
        }
    }
}

/// Classify a storage failure: a typed database error (constraint violation
/// and friends) carries its code and message to the client, anything else
/// stays internal.
fn map_storage_error(e: sqlx::Error) -> Error {
    match &e {
        sqlx::Error::Database(db) => Error::StorageConstraint {
            code: db.code().map(|c| c.to_string()).unwrap_or_default(),
            message: db.message().to_string(),
        },
        _ => Error::Database(e),
    }
}
