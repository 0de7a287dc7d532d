//! Database access layer
//!
//! Owns pool creation and schema initialization. The uniqueness invariant on
//! `(employee_id, calendar_year)` is enforced here as a UNIQUE constraint;
//! the service-level duplicate check is only a fast path that produces a
//! friendlier message before the constraint would fire.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;

mod models;
pub use models::{ErrorLogEntry, TaxFormRecord, TransactionLogEntry};

/// Connect to the database file, creating it if missing
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    // mode=rwc: create the database file on first startup
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = SqlitePool::connect(&db_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Connect to a fresh in-memory database (tests).
///
/// Capped at one connection: every pooled connection would otherwise open
/// its own private `:memory:` database.
pub async fn connect_memory() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")?;
    Ok(pool)
}

/// Create tables if they do not exist yet.
///
/// Idempotent; run at every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tax_forms (
            employee_id                             INTEGER NOT NULL,
            calendar_year                           INTEGER NOT NULL,
            employee_name                           TEXT NOT NULL,
            company                                 TEXT NOT NULL,
            department                              TEXT NOT NULL,
            date                                    TEXT NOT NULL,
            status                                  INTEGER NOT NULL,
            status_desc                             TEXT,
            child_allowance                         INTEGER,
            amt_child_allowance                     REAL,
            child_in_after_2018                     INTEGER,
            amt_child_in_after_2018                 REAL,
            parental_care_taxpayer_father           INTEGER,
            amt_parental_care_taxpayer_father       REAL,
            parental_care_taxpayer_mother           INTEGER,
            amt_parental_care_taxpayer_mother       REAL,
            parental_care_spouse_father             INTEGER,
            amt_parental_care_spouse_father         REAL,
            parental_care_spouse_mother             INTEGER,
            amt_parental_care_spouse_mother         REAL,
            disabled_person_support                 INTEGER,
            amt_disabled_person_support             REAL,
            health_insurance_taxpayer_father        REAL,
            health_insurance_taxpayer_mother        REAL,
            health_insurance_taxpayer_spouse_father REAL,
            health_insurance_taxpayer_spouse_mother REAL,
            life_insurance_paid                     REAL,
            pension_insurance_paid                  REAL,
            rmf                                     REAL,
            ssf                                     REAL,
            interest_pd_on_loan_purchase            REAL,
            donation_supporting_educ_sports         REAL,
            other_donation                          REAL,
            health_insurance_taxpayer               REAL,
            taxable_income_earned_prev_comp         REAL,
            withholding_tax_prev_comp               REAL,
            ss_prev_comp                            REAL,
            pf_prev_comp                            REAL,
            created_by                              TEXT,
            created_datetime                        TEXT,
            updated_by                              TEXT,
            updated_datetime                        TEXT,
            UNIQUE (employee_id, calendar_year)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create tax_forms table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transaction_log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            action    TEXT NOT NULL,
            subject   TEXT NOT NULL,
            logged_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create transaction_log table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS error_log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            message   TEXT NOT NULL,
            subject   TEXT NOT NULL,
            logged_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create error_log table")?;

    Ok(())
}
