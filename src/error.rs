use thiserror::Error;

/// Input errors that abort a run before any block is allocated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Block count must be at least 1 (got {0})")]
    InvalidBlockCount(u32),

    #[error("Station capacity must be at least 1 (got {0})")]
    InvalidCapacity(usize),

    #[error("Number of stations must be at least 1 (got {0})")]
    InvalidStationCount(usize),

    #[error("No participants found")]
    NoParticipants,

    #[error("No station names found in the preferences")]
    NoStations,
}

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
