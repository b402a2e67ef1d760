//! CSV export of task records.

use thiserror::Error;

use super::TaskRecord;

pub const CSV_FILENAME: &str = "tasks_export.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const CSV_HEADER: [&str; 5] = ["description", "category", "priority", "developer", "timestamp"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV flush failed: {0}")]
    Flush(String),
}

/// Downloadable CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl CsvExport {
    /// Header row followed by one row per record, in the given order.
    pub fn from_records(records: &[TaskRecord]) -> Result<Self, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(CSV_HEADER)?;
        for record in records {
            let timestamp = record.timestamp_display();
            writer.write_record([
                record.description.as_str(),
                record.category.as_str(),
                record.priority.as_str(),
                record.developer.as_str(),
                timestamp.as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Flush(e.to_string()))?;

        Ok(Self {
            filename: CSV_FILENAME,
            content_type: CSV_CONTENT_TYPE,
            bytes,
        })
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}
