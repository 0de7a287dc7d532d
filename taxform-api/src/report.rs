//! Report bundling
//!
//! Decides between a standalone PDF and a ZIP archive of PDFs based on the
//! query result: exactly one matching record for an explicitly requested
//! employee ships as a single document, anything else (zero, many, or no
//! specific employee) ships as an archive with one entry per record. An
//! empty result set produces a valid empty archive, not an error.

use std::io::{Cursor, Write};

use taxform_common::db::TaxFormRecord;
use taxform_common::{Error, Result};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::render::render_pdf;

/// Fixed filename of the multi-record archive
pub const ARCHIVE_FILENAME: &str = "TaxFormFormReport.zip";

/// Deflate level for archive entries; mid-level, deterministic output
const COMPRESSION_LEVEL: i64 = 6;

/// A packaged report ready to be served
#[derive(Debug)]
pub struct ReportOutput {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Entry name for one employee's document
pub fn document_name(employee_id: i64) -> String {
    format!("TaxForm_{}.pdf", employee_id)
}

/// Package a result set as a single PDF or a ZIP of PDFs.
///
/// Documents are rendered one at a time into the archive writer, which is
/// owned by this call for the duration of one report request. The whole
/// output is buffered in memory before returning.
pub fn bundle(records: &[TaxFormRecord], requested_employee_id: Option<i64>) -> Result<ReportOutput> {
    if requested_employee_id.is_some() && records.len() == 1 {
        let record = &records[0];
        return Ok(ReportOutput {
            bytes: render_pdf(record)?,
            content_type: "application/pdf",
            filename: document_name(record.employee_id),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut archive = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(COMPRESSION_LEVEL));

        for record in records {
            let pdf = render_pdf(record)?;
            archive
                .start_file(document_name(record.employee_id), options)
                .map_err(|e| Error::Internal(format!("Failed to add archive entry: {}", e)))?;
            archive.write_all(&pdf)?;
        }

        archive
            .finish()
            .map_err(|e| Error::Internal(format!("Failed to finalize archive: {}", e)))?;
    }

    Ok(ReportOutput {
        bytes: buffer.into_inner(),
        content_type: "application/zip",
        filename: ARCHIVE_FILENAME.to_string(),
    })
}
