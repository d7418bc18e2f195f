pub mod landmarks;
pub mod morphometrics;
pub mod profiles;

pub use landmarks::{Landmark, LandmarkSource, LandmarkSpecimen, WING_CONNECTIONS};
pub use morphometrics::{DiscRecord, MorphometricsSource};
pub use profiles::{Curve, CurvePoint, ProfileSample, ProfileSource, ProfileTable};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use csv::ReaderBuilder;

use crate::DataError;

/// Open `path` and parse it on the blocking pool
pub(crate) async fn parse_file<T, F>(path: &Path, parse: F) -> Result<T, DataError>
where
    T: Send + 'static,
    F: FnOnce(BufReader<File>) -> Result<T, DataError> + Send + 'static,
{
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let file = File::open(&path)?;
        parse(BufReader::new(file))
    })
    .await?
}

/// CSV reader shared by all tables: header row, ragged rows tolerated
pub(crate) fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

/// File name of a source path for logs and events
pub(crate) fn file_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown.csv")
}
