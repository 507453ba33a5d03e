//! Load the local registry files from disk.

use camino::{Utf8Path, Utf8PathBuf};
use frontier_core::{LocalCatalogue, PeopleGroupRecord};
use log::{info, warn};
use thiserror::Error;

use crate::normalize::{ParseError, SourceKind, parse};

/// Errors raised while loading a local dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file was structurally unreadable.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: ParseError,
    },
}

/// Read and normalise one delimited dataset.
///
/// Skipped rows are logged and left out of the result.
pub fn load_dataset(
    path: &Utf8Path,
    kind: SourceKind,
) -> Result<Vec<PeopleGroupRecord>, LoadError> {
    let text = frontier_fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let report = parse(&text, kind).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    for row in &report.skipped {
        warn!("{path}:{}: skipped row ({})", row.line, row.reason);
    }
    info!(
        "loaded {} records from {kind} {path} ({} skipped)",
        report.records.len(),
        report.skipped.len()
    );
    Ok(report.records)
}

/// Load both local datasets into a catalogue.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use frontier_data::load_catalogue;
///
/// let catalogue = load_catalogue(
///     Utf8Path::new("data/existing_upgs_updated.csv"),
///     Utf8Path::new("data/updated_uupg.csv"),
/// )?;
/// println!("{} countries", catalogue.countries().len());
/// # Ok::<(), frontier_data::LoadError>(())
/// ```
pub fn load_catalogue(
    existing_upgs: &Utf8Path,
    uupg_data: &Utf8Path,
) -> Result<LocalCatalogue, LoadError> {
    let reference = load_dataset(existing_upgs, SourceKind::ExistingUpgs)?;
    let uupgs = load_dataset(uupg_data, SourceKind::UupgDataset)?;
    Ok(LocalCatalogue::new(reference, uupgs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("UTF-8 temp path");
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    #[rstest]
    fn loads_both_datasets(temp_dir: TempDir) {
        let existing = write(
            &temp_dir,
            "existing.csv",
            "PeopNameInCountry,Country,Latitude,Longitude\nKanembu,Chad,13.5,14.7\nTubu,Niger,17.5,11.0\n",
        );
        let uupgs = write(
            &temp_dir,
            "uupg.csv",
            "name,country,latitude,longitude,evangelical\nBeria,Chad,14.9,22.1,0.01\n",
        );

        let catalogue = load_catalogue(&existing, &uupgs).expect("datasets load");

        assert_eq!(catalogue.countries(), vec!["Chad", "Niger"]);
        assert_eq!(catalogue.uupgs().len(), 1);
    }

    #[rstest]
    fn missing_file_reports_path(temp_dir: TempDir) {
        let missing = Utf8PathBuf::from_path_buf(temp_dir.path().join("absent.csv"))
            .expect("UTF-8 temp path");
        let err = load_dataset(&missing, SourceKind::UupgDataset).expect_err("file is missing");
        match err {
            LoadError::Read { path, .. } => assert_eq!(path, missing),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[rstest]
    fn empty_file_is_a_parse_error(temp_dir: TempDir) {
        let empty = write(&temp_dir, "empty.csv", "");
        let err = load_dataset(&empty, SourceKind::ExistingUpgs).expect_err("file is empty");
        assert!(matches!(err, LoadError::Parse { source: ParseError::Empty, .. }));
    }
}
