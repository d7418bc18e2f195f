use std::io::Read;
use std::path::PathBuf;
use async_trait::async_trait;
use wd_core::{Condition, MeasurementAxis, SelectableRecord, TableSource};

use crate::schema::{landmarks as col, number_cell, text_cell, ColumnIndex, LANDMARKS_TABLE};
use crate::DataError;

/// Anatomical connections between landmarks, 1-based
pub const WING_CONNECTIONS: [(u8, u8); 20] = [
    (1, 7), (2, 6), (2, 7), (3, 5), (3, 9),
    (4, 5), (4, 15), (5, 11), (6, 12), (7, 12),
    (8, 6), (8, 9), (8, 13), (9, 10), (10, 11),
    (10, 14), (11, 15), (12, 13), (13, 14), (14, 15),
];

/// One landmark of one specimen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    /// 1-based landmark number
    pub index: u8,
    /// `A` for landmark 1, `B` for landmark 2, ...
    pub letter: char,
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(index: u8, x: f64, y: f64) -> Self {
        Self {
            index,
            letter: landmark_letter(index),
            x,
            y,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Letter label of a 1-based landmark number
pub fn landmark_letter(index: u8) -> char {
    char::from(b'A' + index.saturating_sub(1))
}

/// One adult wing with its landmark coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSpecimen {
    pub id: String,
    pub condition: Condition,
    pub condition_label: String,
    pub sex: String,
    pub centroid_size: f64,
    pub log_centroid_size: f64,
    /// Always `LANDMARK_COUNT` entries, in landmark order
    pub landmarks: Vec<Landmark>,
}

impl LandmarkSpecimen {
    /// Landmark by 1-based number
    pub fn landmark(&self, index: u8) -> Option<&Landmark> {
        self.landmarks.get(usize::from(index).checked_sub(1)?)
    }

    /// Segments of the connectivity overlay; connections touching a
    /// landmark without coordinates are skipped
    pub fn connection_segments(&self) -> Vec<([f64; 2], [f64; 2])> {
        WING_CONNECTIONS
            .iter()
            .filter_map(|&(from, to)| {
                let a = self.landmark(from).filter(|l| l.is_finite())?;
                let b = self.landmark(to).filter(|l| l.is_finite())?;
                Some(([a.x, a.y], [b.x, b.y]))
            })
            .collect()
    }
}

impl SelectableRecord for LandmarkSpecimen {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn condition(&self) -> Condition {
        self.condition
    }

    fn measurement(&self, axis: MeasurementAxis) -> Option<f64> {
        match axis {
            MeasurementAxis::CentroidSize => Some(self.centroid_size),
            MeasurementAxis::LogCentroidSize => Some(self.log_centroid_size),
            _ => None,
        }
    }
}

/// Parse the wing landmark table, one specimen per row
pub fn read_landmarks<R: Read>(reader: R) -> Result<Vec<LandmarkSpecimen>, DataError> {
    let mut csv_reader = super::csv_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(LANDMARKS_TABLE, &headers);

    let id_idx = columns.require(col::ID)?;
    let condition_idx = columns.require(col::CONDITION)?;
    let sex_idx = columns.optional(col::SEX);
    let centroid_idx = columns.optional(col::CENTROID_SIZE);
    let log_centroid_idx = columns.optional(col::LOG_CENTROID_SIZE);

    let mut coordinate_idx = Vec::with_capacity(usize::from(col::LANDMARK_COUNT));
    for index in 1..=col::LANDMARK_COUNT {
        let (x_col, y_col) = col::coordinate_columns(index);
        coordinate_idx.push((index, columns.require(&x_col)?, columns.require(&y_col)?));
    }

    let mut specimens = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        let condition_label = text_cell(&row, condition_idx).to_string();

        let landmarks = coordinate_idx
            .iter()
            .map(|&(index, x, y)| Landmark::new(index, number_cell(&row, Some(x)), number_cell(&row, Some(y))))
            .collect();

        specimens.push(LandmarkSpecimen {
            id: text_cell(&row, id_idx).to_string(),
            condition: Condition::from_label(&condition_label),
            condition_label,
            sex: sex_idx.map(|i| text_cell(&row, i).to_string()).unwrap_or_default(),
            centroid_size: number_cell(&row, centroid_idx),
            log_centroid_size: number_cell(&row, log_centroid_idx),
            landmarks,
        });
    }

    Ok(specimens)
}

/// Wing landmark table on disk
pub struct LandmarkSource {
    path: PathBuf,
}

impl LandmarkSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub async fn read(&self) -> Result<Vec<LandmarkSpecimen>, DataError> {
        super::parse_file(&self.path, read_landmarks).await
    }
}

#[async_trait]
impl TableSource for LandmarkSource {
    type Output = Vec<LandmarkSpecimen>;

    async fn load(&self) -> anyhow::Result<Vec<LandmarkSpecimen>> {
        Ok(self.read().await?)
    }

    fn source_name(&self) -> &str {
        super::file_name(&self.path)
    }

    /// Counts landmark points, not specimens
    fn row_count(output: &Vec<LandmarkSpecimen>) -> usize {
        output.iter().map(|s| s.landmarks.len()).sum()
    }
}
