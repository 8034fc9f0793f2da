use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Wrong filetype: {0}. Input should be a \".top\" file")]
    WrongFiletype(String),

    #[error("EC number not found in enzyme database: {0}")]
    UnknownECNumber(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Unrecognized filename pattern for {mode} mode: {filename}")]
    UnrecognizedFilenamePattern { filename: String, mode: &'static str },

    #[error("No enzyme clusters found")]
    NoClusters,

    #[error("Unexpected '# end gene' at line {0} without a preceding '# start gene'")]
    UnexpectedEndGene(usize),

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid enzyme database: {0}")]
    EnzymeDatabase(String),
}

impl Error {
    pub fn write_failure(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::WriteFailure { path, source }
    }

    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}
