//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, treasure placement preconditions, internal consistency violations
//! detected by the experiment driver, dataset loading, IO, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "treasure of extent {treasure_width}x{treasure_height} does not fit a {field_width}x{field_height} field"
    )]
    TreasureTooLarge {
        treasure_width: f64,
        treasure_height: f64,
        field_width: f64,
        field_height: f64,
    },

    #[error("define treasure before digging holes")]
    TreasureNotPlaced,

    #[error("treasure already placed on this field")]
    TreasureAlreadyPlaced,

    #[error("{treasure} treasure cannot be placed on a {field} field")]
    IncompatibleTreasure {
        treasure: &'static str,
        field: &'static str,
    },

    #[error(
        "layout returned inconsistent number of holes dug for {desired} desired holes: {expected} then {actual} (repeat {repeat})"
    )]
    InconsistentHoleCount {
        desired: usize,
        expected: usize,
        actual: usize,
        repeat: usize,
    },

    #[error("parcel ({x}, {y}) outside the {columns}x{rows} artefact index for hole at ({hole_x}, {hole_y})")]
    ParcelOutOfRange {
        x: i64,
        y: i64,
        columns: usize,
        rows: usize,
        hole_x: f64,
        hole_y: f64,
    },

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
