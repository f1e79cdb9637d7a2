//! Error types for the sigscout offset-recovery pipeline.
//!
//! This module provides structured error handling using thiserror. Every
//! pipeline failure is caught at the discovery-task level, reported as a
//! labeled diagnostic, and never aborts the surrounding run.

use thiserror::Error;

use crate::core::Va;

/// Main error type for sigscout operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Neither the symbol table nor the byte signature located the target.
    #[error("{what} not found by symbol or signature")]
    NotFound { what: String },

    /// Address is not inside any known function.
    #[error("address {0:#x} is not inside any known function")]
    InvalidAddress(Va),

    /// The owning function's address ranges could not be produced.
    #[error("could not resolve function ranges for {0:#x}")]
    RangeResolution(Va),

    /// Undecodable bytes, or a decoder that reported a non-positive length.
    #[error("undecodable bytes at {va:#x} (reported length {len})")]
    Decode { va: Va, len: i64 },

    /// A pattern matched zero or multiple times where exactly one is required.
    #[error("{what}: expected exactly one match, found {found}")]
    AmbiguousMatch { what: &'static str, found: usize },

    /// An extraction site found an operand of the wrong variant.
    #[error("operand {index} at {va:#x} is not {expected}")]
    OperandShape {
        va: Va,
        index: usize,
        expected: &'static str,
    },

    /// A signature text token is not a hex byte or wildcard.
    #[error("malformed signature token `{0}`")]
    SignatureParse(String),

    /// Wraps a failure from a later pipeline stage of a chained extraction.
    #[error("{stage} stage failed: {source}")]
    ChainedStage {
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Tag `source` with the chained-extraction stage it came from.
    pub fn chained(stage: &'static str, source: Error) -> Self {
        Error::ChainedStage {
            stage,
            source: Box::new(source),
        }
    }
}

/// Result type alias for sigscout operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound {
            what: "AgentTryon_ReceiveEvent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "AgentTryon_ReceiveEvent not found by symbol or signature"
        );

        let err = Error::Decode {
            va: 0x1234,
            len: 0,
        };
        assert_eq!(err.to_string(), "undecodable bytes at 0x1234 (reported length 0)");

        let err = Error::AmbiguousMatch {
            what: "field-guard sequence",
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "field-guard sequence: expected exactly one match, found 2"
        );
    }

    #[test]
    fn test_chained_display_names_stage_and_cause() {
        let err = Error::chained("callee", Error::InvalidAddress(0x4000));
        let display = err.to_string();
        assert!(display.starts_with("callee stage failed"));

        let Error::ChainedStage { stage, source } = err else {
            panic!("expected ChainedStage");
        };
        assert_eq!(stage, "callee");
        assert!(matches!(*source, Error::InvalidAddress(0x4000)));
    }
}
