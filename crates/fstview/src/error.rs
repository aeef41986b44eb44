use std::path::PathBuf;

use thiserror::Error;

/// Conditions that abort a run. Everything else is logged and absorbed by the
/// stage that hit it.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Cannot read {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {}", path.display())]
    MissingInput { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Read a whole input file. Invalid UTF-8 is replaced rather than rejected,
/// since only unreadable files are fatal.
pub fn read_input(path: &std::path::Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| ReportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
