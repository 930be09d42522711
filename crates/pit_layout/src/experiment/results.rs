//! Result rows and the results CSV format.
//!
//! A results file has the header `desiredholes,actualholes,successrate`, with `artefacts` and
//! `holessucceeded` appended for point-cloud runs. The first data row is all zeros so curves
//! start at the origin; each further row describes one distinct layout.
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::warn;

use crate::error::{Error, Result};
use crate::experiment::events::{EventSink, ExperimentEvent, ExperimentEventKind};

const DESIRED: &str = "desiredholes";
const ACTUAL: &str = "actualholes";
const SUCCESS: &str = "successrate";
const ARTEFACTS: &str = "artefacts";
const HOLES_SUCCEEDED: &str = "holessucceeded";

/// Success rate measured for one layout.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultRow {
    pub desired_holes: usize,
    pub actual_holes: usize,
    /// Percentage of trials that found the treasure.
    pub success_rate: f64,
    /// Mean artefacts found per trial (point clouds only).
    pub artefacts: Option<f64>,
    /// Mean holes that found artefacts per trial (point clouds only).
    pub holes_succeeded: Option<f64>,
}

impl ResultRow {
    pub fn new(desired_holes: usize, actual_holes: usize, success_rate: f64) -> Self {
        Self {
            desired_holes,
            actual_holes,
            success_rate,
            artefacts: None,
            holes_succeeded: None,
        }
    }

    pub fn with_artefacts(mut self, artefacts: f64, holes_succeeded: f64) -> Self {
        self.artefacts = Some(artefacts);
        self.holes_succeeded = Some(holes_succeeded);
        self
    }
}

/// Writes emitted rows as a results CSV, flushing after every row.
///
/// Write failures are logged and kept; [`CsvResultsSink::finish`] returns the first one.
pub struct CsvResultsSink<W: Write> {
    writer: csv::Writer<W>,
    point_cloud: bool,
    error: Option<Error>,
}

impl CsvResultsSink<BufWriter<File>> {
    /// Creates (or truncates) the results file at `path`.
    pub fn create(path: impl AsRef<Path>, point_cloud: bool) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Self::new(BufWriter::new(file), point_cloud)
    }
}

impl<W: Write> CsvResultsSink<W> {
    /// Writes the header and the zero row to `out`.
    pub fn new(out: W, point_cloud: bool) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(out);
        if point_cloud {
            writer.write_record([DESIRED, ACTUAL, SUCCESS, ARTEFACTS, HOLES_SUCCEEDED])?;
            writer.write_record(["0", "0", "0", "0", "0"])?;
        } else {
            writer.write_record([DESIRED, ACTUAL, SUCCESS])?;
            writer.write_record(["0", "0", "0"])?;
        }
        writer.flush()?;
        Ok(Self {
            writer,
            point_cloud,
            error: None,
        })
    }

    fn write_row(&mut self, row: &ResultRow) -> Result<()> {
        let mut record = vec![
            row.desired_holes.to_string(),
            row.actual_holes.to_string(),
            format!("{:?}", row.success_rate),
        ];
        if self.point_cloud {
            record.push(format!("{:?}", row.artefacts.unwrap_or_default()));
            record.push(format!("{:?}", row.holes_succeeded.unwrap_or_default()));
        }
        self.writer.write_record(&record)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the writer, or the first write error.
    pub fn finish(mut self) -> Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

impl<W: Write> EventSink for CsvResultsSink<W> {
    fn send(&mut self, event: ExperimentEvent) {
        let ExperimentEvent::RowEmitted { row } = event else {
            return;
        };
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_row(&row) {
            warn!("failed to write result row: {e}");
            self.error = Some(e);
        }
    }

    fn wants(&self, kind: ExperimentEventKind) -> bool {
        kind == ExperimentEventKind::RowEmitted
    }
}

/// Reads rows from results CSV data. Rows with an empty success rate are skipped.
pub fn read_results<R: Read>(reader: R) -> Result<Vec<ResultRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &str| {
        column(name).ok_or_else(|| Error::Dataset(format!("missing '{name}' column")))
    };
    let desired = required(DESIRED)?;
    let actual = required(ACTUAL)?;
    let success = required(SUCCESS)?;
    let artefacts = column(ARTEFACTS);
    let holes_succeeded = column(HOLES_SUCCEEDED);

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default();
        if field(success).is_empty() {
            continue;
        }
        let bad = |name: &str, raw: &str| {
            Error::Dataset(format!("row {}: invalid {name} value '{raw}'", line + 2))
        };
        let int = |idx: usize, name: &str| -> Result<usize> {
            let raw = field(idx);
            raw.parse().map_err(|_| bad(name, raw))
        };
        let float = |idx: usize, name: &str| -> Result<f64> {
            let raw = field(idx);
            raw.parse().map_err(|_| bad(name, raw))
        };

        let mut row = ResultRow::new(
            int(desired, DESIRED)?,
            int(actual, ACTUAL)?,
            float(success, SUCCESS)?,
        );
        if let (Some(a), Some(h)) = (artefacts, holes_succeeded) {
            row = row.with_artefacts(float(a, ARTEFACTS)?, float(h, HOLES_SUCCEEDED)?);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Reads rows from a results CSV file.
pub fn read_results_path(path: impl AsRef<Path>) -> Result<Vec<ResultRow>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::Dataset(format!("cannot open results '{}': {e}", path.display()))
    })?;
    read_results(std::io::BufReader::new(file))
}
