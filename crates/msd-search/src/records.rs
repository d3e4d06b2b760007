use std::io::Write;

use indexmap::IndexMap;
use msd_core::errors::{DesignError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::sampler::SampleMode;

/// Leading CSV columns shared by every record.
pub const RECORD_COLUMNS: [&str; 5] = [
    "mode",
    "score",
    "num_mutations",
    "construction_time",
    "sample_time",
];

/// One measurement point of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    /// Run index.
    pub run: usize,
    /// Configured mutation mode.
    pub mode: SampleMode,
    /// Score at this checkpoint.
    pub score: f64,
    /// Cumulative candidate mutations evaluated in this run.
    pub mutations: u64,
    /// Graph construction time in seconds, identical for every record.
    pub construction_time: f64,
    /// Seconds spent optimizing since the run started.
    pub sample_time: f64,
    /// Sequence held by the design.
    pub sequence: String,
    /// Design columns, aligned with the design part of the CSV header.
    pub design_columns: Vec<String>,
    /// Human readable design line.
    pub design_line: String,
    /// Graph properties, in column order.
    pub properties: IndexMap<String, String>,
}

impl CheckpointRecord {
    /// Values of one CSV row.
    pub fn csv_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.mode.to_string(),
            self.score.to_string(),
            self.mutations.to_string(),
            self.construction_time.to_string(),
            self.sample_time.to_string(),
        ];
        fields.extend(self.design_columns.iter().cloned());
        fields.extend(self.properties.values().cloned());
        fields
    }
}

/// Consumer of checkpoint records.
pub trait RecordSink {
    /// Receives the full column list once, before the first record.
    fn header(&mut self, _columns: &[String]) -> Result<(), DesignError> {
        Ok(())
    }

    /// Receives one checkpoint record.
    fn record(&mut self, record: &CheckpointRecord) -> Result<(), DesignError>;
}

/// Keeps every record in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    /// Column list, once announced.
    pub columns: Vec<String>,
    /// Records in emission order.
    pub records: Vec<CheckpointRecord>,
}

impl RecordSink for CollectingSink {
    fn header(&mut self, columns: &[String]) -> Result<(), DesignError> {
        self.columns = columns.to_vec();
        Ok(())
    }

    fn record(&mut self, record: &CheckpointRecord) -> Result<(), DesignError> {
        self.records.push(record.clone());
        Ok(())
    }
}

fn write_error(err: impl ToString) -> DesignError {
    DesignError::Serde(ErrorInfo::new("record-write", err.to_string()))
}

/// Writes records as semicolon separated rows with a header row.
pub struct CsvRecordWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvRecordWriter<W> {
    /// Wraps an output stream.
    pub fn new(output: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .from_writer(output);
        Self { writer }
    }

    /// Flushes and returns the underlying stream.
    pub fn into_inner(self) -> Result<W, DesignError> {
        self.writer.into_inner().map_err(write_error)
    }
}

impl<W: Write> RecordSink for CsvRecordWriter<W> {
    fn header(&mut self, columns: &[String]) -> Result<(), DesignError> {
        self.writer.write_record(columns).map_err(write_error)?;
        self.writer.flush().map_err(write_error)
    }

    fn record(&mut self, record: &CheckpointRecord) -> Result<(), DesignError> {
        self.writer
            .write_record(record.csv_fields())
            .map_err(write_error)?;
        self.writer.flush().map_err(write_error)
    }
}

/// Writes one design line per record.
pub struct HumanRecordWriter<W: Write> {
    output: W,
}

impl<W: Write> HumanRecordWriter<W> {
    /// Wraps an output stream.
    pub fn new(output: W) -> Self {
        Self { output }
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> RecordSink for HumanRecordWriter<W> {
    fn record(&mut self, record: &CheckpointRecord) -> Result<(), DesignError> {
        writeln!(self.output, "{}", record.design_line).map_err(write_error)
    }
}
