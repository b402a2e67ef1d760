use super::{CsvExport, ExportError, TaskRecord};

/// Append-only list of task records for one session.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    records: Vec<TaskRecord>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: TaskRecord) {
        self.records.push(record);
    }

    /// All records, oldest first.
    pub fn all(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize every record as CSV.
    pub fn export_csv(&self) -> Result<CsvExport, ExportError> {
        CsvExport::from_records(&self.records)
    }
}
