use crate::core::models::result::RunResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogRecordError {
    #[error("File I/O error for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error for '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Writes `result` as a two-space indented JSON object with the keys `retcode`,
/// `stdout` and `stderr`, in that order.
pub fn write_log(path: &Path, result: &RunResult) -> Result<(), LogRecordError> {
    let io_err = |e| LogRecordError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, result).map_err(|e| LogRecordError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(io_err)
}

#[cfg(test)]
pub(crate) fn read_log(path: &Path) -> Result<RunResult, LogRecordError> {
    let file = File::open(path).map_err(|e| LogRecordError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| LogRecordError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}
