//! Error types for the analyzer.
//!
//! Every failure is fatal for an analysis run: errors propagate to the caller
//! and no partially built tree is returned. Bag exhaustion and reaching the
//! round horizon are *not* errors; they are ordinary terminal nodes.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("factorial is undefined for negative input {n}")]
    NegativeFactorial { n: i64 },

    #[error("arithmetic overflow while computing {context}")]
    ArithmeticOverflow { context: String },

    #[error("cannot draw {requested} tiles from a bag holding {available}")]
    InsufficientTiles { requested: u32, available: u32 },

    #[error("combination size ({combination}) must match number of locations ({locations})")]
    ArrangementSizeMismatch { combination: u32, locations: u32 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid tile key '{key}' (expected five '-'-separated counts)")]
    InvalidTileKey { key: String },

    #[error("unknown tile symbol '{symbol}'")]
    UnknownTileSymbol { symbol: char },

    #[error("unknown unit type id {id}")]
    UnknownUnitType { id: u8 },

    #[error("invalid unit encoding '{encoding}' (expected 'type::location')")]
    InvalidUnitEncoding { encoding: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for an [`Error::InvalidConfiguration`].
    pub fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Shorthand for an [`Error::ArithmeticOverflow`].
    pub fn overflow(context: impl Into<String>) -> Self {
        Error::ArithmeticOverflow {
            context: context.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InsufficientTiles {
            requested: 4,
            available: 3,
        };
        assert_eq!(err.to_string(), "cannot draw 4 tiles from a bag holding 3");

        let err = Error::config("move_cost must be positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration: move_cost must be positive"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let parse = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
