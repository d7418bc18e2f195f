use std::io::Read;
use std::path::PathBuf;
use ahash::AHashMap;
use async_trait::async_trait;
use wd_core::{Condition, MeasurementAxis, SelectableRecord, TableSource};

use crate::schema::{number_cell, profiles as col, text_cell, ColumnIndex, PROFILES_TABLE};
use crate::DataError;

/// One raw gradient sample along the proximal-distal axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileSample {
    pub distance: f64,
    pub value: f64,
}

/// One point of a normalized curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub distance: f64,
    /// Raw value divided by the maximum of the disc
    pub intensity: f64,
}

/// Normalized gradient profile of one disc, sorted by distance
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub disc: String,
    pub condition: Condition,
    /// Disc area as repeated in the profile table, NaN when absent
    pub area: f64,
    pub points: Vec<CurvePoint>,
}

impl SelectableRecord for Curve {
    fn record_id(&self) -> &str {
        &self.disc
    }

    fn condition(&self) -> Condition {
        self.condition
    }

    fn measurement(&self, axis: MeasurementAxis) -> Option<f64> {
        match axis {
            MeasurementAxis::Area => Some(self.area),
            _ => None,
        }
    }
}

/// Divide every value by the maximum.
///
/// Unparsable values count as zero when looking for the maximum. Returns
/// `None` when the maximum is zero or not finite, since such a profile has
/// no meaningful normalization.
pub fn normalize_intensities(raw: &[f64]) -> Option<Vec<f64>> {
    let max = raw
        .iter()
        .map(|&v| if v.is_nan() { 0.0 } else { v })
        .fold(f64::NEG_INFINITY, f64::max);

    if max == 0.0 || !max.is_finite() {
        return None;
    }

    Some(raw.iter().map(|v| v / max).collect())
}

/// The long-form profile table, grouped by disc
#[derive(Debug, Clone, Default)]
pub struct ProfileTable {
    /// Normalized curves in order of first appearance
    pub curves: Vec<Curve>,
    raw: AHashMap<String, Vec<ProfileSample>>,
    sample_count: usize,
}

impl ProfileTable {
    /// Raw samples of one disc sorted by distance, empty for unknown discs
    pub fn raw_profile(&self, disc: &str) -> &[ProfileSample] {
        self.raw.get(disc).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of rows read from the table
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Distance range covered by all curves
    pub fn distance_extent(&self) -> Option<(f64, f64)> {
        self.curves
            .iter()
            .flat_map(|c| c.points.iter().map(|p| p.distance))
            .fold(None, |acc, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
    }
}

struct DiscRows {
    disc: String,
    condition_label: String,
    area: f64,
    rows: Vec<ProfileSample>,
}

/// Parse the long-form table and build one curve per disc.
///
/// A disc yields a curve when its maximum value is usable and more than one
/// sample survives dropping NaN distances and values.
pub fn read_profiles<R: Read>(reader: R) -> Result<ProfileTable, DataError> {
    let mut csv_reader = super::csv_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(PROFILES_TABLE, &headers);

    let disc_idx = columns.require(col::DISC)?;
    let distance_idx = columns.require(col::DISTANCE)?;
    let value_idx = columns.require(col::VALUE)?;
    let condition_idx = columns.require(col::CONDITION)?;
    let area_idx = columns.optional(col::AREA);

    let mut groups: Vec<DiscRows> = Vec::new();
    let mut group_of: AHashMap<String, usize> = AHashMap::new();
    let mut sample_count = 0usize;

    for result in csv_reader.records() {
        let row = result?;
        sample_count += 1;

        let disc = text_cell(&row, disc_idx);
        let group = match group_of.get(disc) {
            Some(&idx) => idx,
            None => {
                groups.push(DiscRows {
                    disc: disc.to_string(),
                    condition_label: text_cell(&row, condition_idx).to_string(),
                    area: number_cell(&row, area_idx),
                    rows: Vec::new(),
                });
                group_of.insert(disc.to_string(), groups.len() - 1);
                groups.len() - 1
            }
        };

        groups[group].rows.push(ProfileSample {
            distance: number_cell(&row, Some(distance_idx)),
            value: number_cell(&row, Some(value_idx)),
        });
    }

    let mut curves = Vec::with_capacity(groups.len());
    let mut raw = AHashMap::with_capacity(groups.len());

    for group in groups {
        let mut samples: Vec<ProfileSample> = group
            .rows
            .iter()
            .copied()
            .filter(|s| !s.distance.is_nan() && !s.value.is_nan())
            .collect();
        samples.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        let values: Vec<f64> = group.rows.iter().map(|s| s.value).collect();
        if let Some(normalized) = normalize_intensities(&values) {
            let mut points: Vec<CurvePoint> = group
                .rows
                .iter()
                .zip(normalized)
                .map(|(s, intensity)| CurvePoint { distance: s.distance, intensity })
                .filter(|p| !p.distance.is_nan() && !p.intensity.is_nan())
                .collect();
            points.sort_by(|a, b| a.distance.total_cmp(&b.distance));

            if points.len() > 1 {
                curves.push(Curve {
                    disc: group.disc.clone(),
                    condition: Condition::from_label(&group.condition_label),
                    area: group.area,
                    points,
                });
            }
        }

        raw.insert(group.disc, samples);
    }

    Ok(ProfileTable { curves, raw, sample_count })
}

/// Profile table on disk
pub struct ProfileSource {
    path: PathBuf,
}

impl ProfileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub async fn read(&self) -> Result<ProfileTable, DataError> {
        super::parse_file(&self.path, read_profiles).await
    }
}

#[async_trait]
impl TableSource for ProfileSource {
    type Output = ProfileTable;

    async fn load(&self) -> anyhow::Result<ProfileTable> {
        Ok(self.read().await?)
    }

    fn source_name(&self) -> &str {
        super::file_name(&self.path)
    }

    fn row_count(output: &ProfileTable) -> usize {
        output.curves.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
disc,distance,value,condition,area
d1,0.5,4,standard,4.5
d1,0.0,2,standard,4.5
d1,1.0,8,standard,4.5
d1,1.5,4,standard,4.5
d2,0.0,0,hypoxia,4.9
d2,1.0,0,hypoxia,4.9
d3,0.0,3,cold,5.1
d3,,6,cold,5.1
d4,0.0,5,17C,5.3
d4,1.0,x,17C,5.3
d4,2.0,10,17C,5.3
";

    #[test]
    fn test_normalize_example() {
        let normalized = normalize_intensities(&[2.0, 4.0, 8.0, 4.0]).unwrap();
        assert_eq!(normalized, vec![0.25, 0.5, 1.0, 0.5]);
    }

    #[test]
    fn test_normalize_rejects_zero_max() {
        assert!(normalize_intensities(&[0.0, 0.0]).is_none());
        assert!(normalize_intensities(&[]).is_none());
        assert!(normalize_intensities(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_curves_are_sorted_and_normalized() {
        let table = read_profiles(TABLE.as_bytes()).unwrap();
        let d1 = &table.curves[0];
        assert_eq!(d1.disc, "d1");
        assert_eq!(d1.area, 4.5);

        let distances: Vec<f64> = d1.points.iter().map(|p| p.distance).collect();
        let intensities: Vec<f64> = d1.points.iter().map(|p| p.intensity).collect();
        assert_eq!(distances, vec![0.0, 0.5, 1.0, 1.5]);
        assert_eq!(intensities, vec![0.25, 0.5, 1.0, 0.5]);
        assert!(d1.points.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_degenerate_discs_are_dropped() {
        let table = read_profiles(TABLE.as_bytes()).unwrap();
        let ids: Vec<&str> = table.curves.iter().map(|c| c.disc.as_str()).collect();
        // d2 has a zero maximum, d3 keeps a single valid point
        assert_eq!(ids, vec!["d1", "d4"]);
        assert_eq!(table.sample_count(), 11);

        let d4 = &table.curves[1];
        assert_eq!(d4.condition, Condition::Cold);
        assert_eq!(d4.points.len(), 2);
        assert_eq!(d4.points[1].intensity, 1.0);
    }

    #[test]
    fn test_raw_profile_lookup() {
        let table = read_profiles(TABLE.as_bytes()).unwrap();
        let raw = table.raw_profile("d1");
        assert_eq!(raw.len(), 4);
        assert_eq!(raw[0], ProfileSample { distance: 0.0, value: 2.0 });
        assert!(table.raw_profile("unknown").is_empty());
        assert_eq!(table.distance_extent(), Some((0.0, 2.0)));
    }

    #[test]
    fn test_area_column_is_optional() {
        let table = read_profiles("disc,distance,value,condition\nd1,0,1,cold\nd1,1,2,cold\n".as_bytes()).unwrap();
        assert_eq!(table.curves.len(), 1);
        assert!(table.curves[0].area.is_nan());
        assert_eq!(table.curves[0].measurement(MeasurementAxis::Area).map(f64::is_nan), Some(true));
    }
}
