use std::io::Read;
use std::path::PathBuf;
use async_trait::async_trait;
use wd_core::{Condition, MeasurementAxis, SelectableRecord, TableSource};

use crate::schema::{morphometrics as col, number_cell, text_cell, ColumnIndex, MORPHOMETRICS_TABLE};
use crate::DataError;

/// One wing disc with its fitted gradient parameters
#[derive(Debug, Clone, PartialEq)]
pub struct DiscRecord {
    pub disc: String,
    /// Log-transformed upstream
    pub area: f64,
    pub shape_a: f64,
    pub shape_b: f64,
    pub shape_c: f64,
    /// Decay length, column `D`
    pub lambda: f64,
    pub condition: Condition,
    /// Label as written in the table
    pub condition_label: String,
}

impl SelectableRecord for DiscRecord {
    fn record_id(&self) -> &str {
        &self.disc
    }

    fn condition(&self) -> Condition {
        self.condition
    }

    fn measurement(&self, axis: MeasurementAxis) -> Option<f64> {
        match axis {
            MeasurementAxis::Area => Some(self.area),
            MeasurementAxis::ShapeA => Some(self.shape_a),
            MeasurementAxis::ShapeB => Some(self.shape_b),
            MeasurementAxis::ShapeC => Some(self.shape_c),
            MeasurementAxis::Lambda => Some(self.lambda),
            MeasurementAxis::CentroidSize | MeasurementAxis::LogCentroidSize => None,
        }
    }
}

/// Parse the morphometrics table.
///
/// Rows whose area or lambda is not a finite number cannot be placed on the
/// scatter plot and are dropped.
pub fn read_morphometrics<R: Read>(reader: R) -> Result<Vec<DiscRecord>, DataError> {
    let mut csv_reader = super::csv_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(MORPHOMETRICS_TABLE, &headers);

    let disc_idx = columns.require(col::DISC)?;
    let area_idx = columns.require(col::AREA)?;
    let lambda_idx = columns.require(col::LAMBDA)?;
    let condition_idx = columns.require(col::CONDITION)?;
    let a_idx = columns.optional(col::SHAPE_A);
    let b_idx = columns.optional(col::SHAPE_B);
    let c_idx = columns.optional(col::SHAPE_C);

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for result in csv_reader.records() {
        let row = result?;
        let area = number_cell(&row, Some(area_idx));
        let lambda = number_cell(&row, Some(lambda_idx));

        if !area.is_finite() || !lambda.is_finite() {
            dropped += 1;
            continue;
        }

        let condition_label = text_cell(&row, condition_idx).to_string();
        records.push(DiscRecord {
            disc: text_cell(&row, disc_idx).to_string(),
            area,
            shape_a: number_cell(&row, a_idx),
            shape_b: number_cell(&row, b_idx),
            shape_c: number_cell(&row, c_idx),
            lambda,
            condition: Condition::from_label(&condition_label),
            condition_label,
        });
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} morphometrics rows without finite area/lambda", dropped);
    }

    Ok(records)
}

/// Morphometrics table on disk
pub struct MorphometricsSource {
    path: PathBuf,
}

impl MorphometricsSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the whole table on the blocking pool
    pub async fn read(&self) -> Result<Vec<DiscRecord>, DataError> {
        super::parse_file(&self.path, read_morphometrics).await
    }
}

#[async_trait]
impl TableSource for MorphometricsSource {
    type Output = Vec<DiscRecord>;

    async fn load(&self) -> anyhow::Result<Vec<DiscRecord>> {
        Ok(self.read().await?)
    }

    fn source_name(&self) -> &str {
        super::file_name(&self.path)
    }

    fn row_count(output: &Vec<DiscRecord>) -> usize {
        output.len()
    }
}
