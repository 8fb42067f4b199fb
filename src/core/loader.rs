//! CSV ingestion for test-point datasets.
//!
//! A flight-data CSV holds one header row naming the recorded channels and
//! one row per sample. Every field must parse as a number; channel lookup
//! downstream is strictly by column name, so no schema normalization is
//! attempted here.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use log::debug;
use thiserror::Error;

use super::dataset::ChannelTable;

/// Errors that can occur during dataset loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Empty dataset file: {0}")]
    EmptyFile(PathBuf),

    #[error("Non-numeric value '{value}' in column '{column}' of {path}")]
    NonNumeric {
        value: String,
        column: String,
        path: PathBuf,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Load a channel CSV file into a [`ChannelTable`].
///
/// The header row supplies the column names in file order. Rows must all
/// have the header's width and every field must parse as `f64`; leading and
/// trailing whitespace is ignored. When two columns share a name the
/// rightmost one wins.
///
/// # Arguments
///
/// * `path` - Path to the channel CSV file
///
/// # Returns
///
/// A `ChannelTable` with one column per header entry.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a row is ragged, a field is
/// not numeric, or the file holds no samples.
pub fn load_channel_csv<P: AsRef<Path>>(path: P) -> Result<ChannelTable> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    let mut num_samples = 0usize;
    for result in reader.records() {
        let record = result?;
        for (idx, field) in record.iter().enumerate() {
            let value: f64 = field.parse().map_err(|_| LoaderError::NonNumeric {
                value: field.to_string(),
                column: headers.get(idx).cloned().unwrap_or_default(),
                path: path.to_path_buf(),
            })?;
            columns[idx].push(value);
        }
        num_samples += 1;
    }

    if headers.is_empty() || num_samples == 0 {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    debug!(
        "loaded {} channels x {} samples from {}",
        headers.len(),
        num_samples,
        path.display()
    );

    let mut table = ChannelTable::new();
    for (name, samples) in headers.into_iter().zip(columns) {
        table.insert(name, samples);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_channel_csv() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ADC_QCIC,ADC_PSIC,EGI_PHI").unwrap();
        writeln!(file, "2116.8,2116.8,0.0").unwrap();
        writeln!(file, "2120.0,2116.8,1.5e-2").unwrap();
        file.flush().unwrap();

        let table = load_channel_csv(file.path())?;

        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.column("ADC_QCIC"), Some(&[2116.8, 2120.0][..]));
        assert_eq!(table.column("EGI_PHI"), Some(&[0.0, 0.015][..]));

        let order: Vec<&str> = table.column_names().collect();
        assert_eq!(order, vec!["ADC_QCIC", "ADC_PSIC", "EGI_PHI"]);
        Ok(())
    }

    #[test]
    fn test_load_trims_whitespace() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, " qc , ps ").unwrap();
        writeln!(file, " 1.0 , 2.0 ").unwrap();
        file.flush().unwrap();

        let table = load_channel_csv(file.path())?;
        assert_eq!(table.column("qc"), Some(&[1.0][..]));
        assert_eq!(table.column("ps"), Some(&[2.0][..]));
        Ok(())
    }

    #[test]
    fn test_load_header_only_file_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "qc,ps").unwrap();
        file.flush().unwrap();

        let result = load_channel_csv(file.path());
        assert!(matches!(result, Err(LoaderError::EmptyFile(_))));
    }

    #[test]
    fn test_load_rejects_non_numeric_field() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "qc,ps").unwrap();
        writeln!(file, "1.0,n/a").unwrap();
        file.flush().unwrap();

        let err = load_channel_csv(file.path()).unwrap_err();
        match err {
            LoaderError::NonNumeric { value, column, .. } => {
                assert_eq!(value, "n/a");
                assert_eq!(column, "ps");
            }
            other => panic!("expected NonNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_ragged_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "qc,ps").unwrap();
        writeln!(file, "1.0,2.0").unwrap();
        writeln!(file, "3.0").unwrap();
        file.flush().unwrap();

        let result = load_channel_csv(file.path());
        assert!(matches!(result, Err(LoaderError::Csv(_))));
    }
}
