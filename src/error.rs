//! Error types for parameter and cell identifier parsing

use thiserror::Error;

/// A game parameter that could not be read as a number
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Parameter absent or empty
    #[error("parameter `{0}` is missing")]
    Missing(&'static str),

    /// Parameter present but not numeric
    #[error("parameter `{key}` is not a number: {raw:?}")]
    NotANumber { key: &'static str, raw: String },
}

/// A renderer-supplied block name that does not map onto the grid
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CellIdError {
    /// Name lacks the `object_` prefix or has the wrong number of parts
    #[error("malformed cell id: {0:?}")]
    Malformed(String),

    /// A component is not an integer
    #[error("invalid coordinate {part:?} in cell id {id:?}")]
    InvalidCoordinate { id: String, part: String },

    /// Well-formed but not on a block of this grid
    #[error("cell id {id:?} is outside a grid of size {size}")]
    OutOfGrid { id: String, size: u32 },
}
