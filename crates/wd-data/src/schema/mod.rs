//! Column contracts with the data-preparation pipeline

use ahash::AHashMap;
use csv::StringRecord;

use crate::DataError;

/// Table names used in errors and logs
pub const MORPHOMETRICS_TABLE: &str = "morphometrics";
pub const PROFILES_TABLE: &str = "gradient profiles";
pub const LANDMARKS_TABLE: &str = "wing landmarks";

/// Per-disc scalar measurements (`mergedNormalizedGrad.csv`)
pub mod morphometrics {
    pub const DISC: &str = "disc";
    pub const AREA: &str = "area";
    pub const SHAPE_A: &str = "A";
    pub const SHAPE_B: &str = "B";
    pub const SHAPE_C: &str = "C";
    pub const LAMBDA: &str = "D";
    pub const CONDITION: &str = "condition";
}

/// Long-form gradient samples (`mergedRawGrad.csv`)
pub mod profiles {
    pub const DISC: &str = "disc";
    pub const DISTANCE: &str = "distance";
    pub const VALUE: &str = "value";
    pub const CONDITION: &str = "condition";
    /// Optional; repeated on every row of a disc
    pub const AREA: &str = "area";
}

/// Adult wing landmarks (`mergedWingCoords.csv`)
pub mod landmarks {
    pub const ID: &str = "Id";
    pub const CONDITION: &str = "Condition";
    pub const SEX: &str = "Sex";
    pub const CENTROID_SIZE: &str = "Centroid Size";
    pub const LOG_CENTROID_SIZE: &str = "Log Centroid Size";

    /// Number of landmarks per specimen
    pub const LANDMARK_COUNT: u8 = 15;

    /// Column names of landmark `index` (1-based)
    pub fn coordinate_columns(index: u8) -> (String, String) {
        (format!("X{}", index), format!("Y{}", index))
    }
}

/// Header lookup for one table
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    table: &'static str,
    positions: AHashMap<String, usize>,
}

impl ColumnIndex {
    /// Index the header row; names are trimmed, the first duplicate wins
    pub fn from_headers(table: &'static str, headers: &StringRecord) -> Self {
        let mut positions = AHashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            positions.entry(name.trim().to_string()).or_insert(idx);
        }
        Self { table, positions }
    }

    /// Position of a required column
    pub fn require(&self, column: &str) -> Result<usize, DataError> {
        self.positions
            .get(column)
            .copied()
            .ok_or_else(|| DataError::MissingColumn {
                table: self.table,
                column: column.to_string(),
            })
    }

    /// Position of a column that may be absent
    pub fn optional(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }
}

/// Read a text cell, empty when the row is short
pub fn text_cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or("")
}

/// Read a numeric cell; empty, missing or unparsable cells are NaN
pub fn number_cell(record: &StringRecord, idx: Option<usize>) -> f64 {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        let headers = StringRecord::from(vec!["disc", " area ", "D"]);
        let index = ColumnIndex::from_headers(MORPHOMETRICS_TABLE, &headers);
        assert_eq!(index.require("area").unwrap(), 1);
        assert_eq!(index.optional("A"), None);

        let err = index.require("condition").unwrap_err();
        assert_eq!(err.to_string(), "Missing column 'condition' in morphometrics");
    }

    #[test]
    fn test_number_cell() {
        let record = StringRecord::from(vec!["1.5", "", "abc", " -2 "]);
        assert_eq!(number_cell(&record, Some(0)), 1.5);
        assert!(number_cell(&record, Some(1)).is_nan());
        assert!(number_cell(&record, Some(2)).is_nan());
        assert_eq!(number_cell(&record, Some(3)), -2.0);
        assert!(number_cell(&record, Some(9)).is_nan());
        assert!(number_cell(&record, None).is_nan());
    }

    #[test]
    fn test_coordinate_columns() {
        assert_eq!(landmarks::coordinate_columns(15), ("X15".to_string(), "Y15".to_string()));
    }
}
