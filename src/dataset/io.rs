//! CSV persistence for the intermediate tables.

use crate::dataset::error::DatasetError;
use log::info;
use polars::prelude::*;
use std::fs;
use std::path::Path;

/// Reads a CSV file with a header row, inferring column types from the whole file.
pub fn read_csv(path: &Path) -> Result<DataFrame, DatasetError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| DatasetError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .finish()
        .map_err(|e| DatasetError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    info!("Read {} rows from {}", df.height(), path.display());
    Ok(df)
}

/// Writes `df` to `path` with a header row, replacing any existing file.
///
/// The parent directory is created if it does not exist.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| DatasetError::DirCreation(parent.to_path_buf(), e))?;
    }
    let file =
        fs::File::create(path).map_err(|e| DatasetError::FileCreate(path.to_path_buf(), e))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .map_err(|e| DatasetError::CsvWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read_keeps_nulls() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("seasonal_air.csv");
        let mut df = df!(
            "iso_a3" => ["USA", "FRA"],
            "year" => [2000i64, 2000],
            "season" => ["DJF", "JJA"],
            "air_C" => [Some(-1.5), None],
        )?;

        write_csv(&mut df, &path)?;
        let read = read_csv(&path)?;

        assert_eq!(read.height(), 2);
        assert_eq!(read.column("year")?.dtype(), &DataType::Int64);
        assert_eq!(read.column("air_C")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = read_csv(Path::new("does/not/exist.csv"));
        assert!(matches!(result, Err(DatasetError::CsvRead { .. })));
    }
}
