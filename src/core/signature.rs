//! Function signatures: a preferred symbol name plus a wildcard-tolerant
//! byte pattern that survives binary rebuilds.
//!
//! Signatures are authored in the conventional hex-with-`??` notation,
//! e.g. `"48 89 5C 24 ?? 56 57"`. Each carries an informal tag of the
//! binary build it was last verified against; when that build changes
//! shape, the signature must be regenerated, not retried.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// One token of a byte pattern: a literal byte or a wildcard that matches
/// any byte value at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigByte {
    Byte(u8),
    Wildcard,
}

impl SigByte {
    /// Whether this token matches the given image byte.
    pub fn matches(&self, byte: u8) -> bool {
        match self {
            SigByte::Byte(b) => *b == byte,
            SigByte::Wildcard => true,
        }
    }
}

/// Identifies one function across binary revisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Preferred symbol name; trusted over the byte pattern when it resolves.
    pub name: Option<String>,
    /// Wildcard-tolerant byte pattern, scanned from the image base.
    pub pattern: Vec<SigByte>,
    /// Binary build this signature was last verified against.
    pub verified: String,
}

impl Signature {
    /// Parse a signature from hex-with-`??` notation.
    ///
    /// Tokens are whitespace-separated; `??` (or `?`) is a wildcard, any
    /// other token must be exactly two hex digits.
    pub fn parse(name: Option<&str>, pattern: &str, verified: &str) -> Result<Self> {
        let mut tokens = Vec::new();
        for token in pattern.split_whitespace() {
            if token == "??" || token == "?" {
                tokens.push(SigByte::Wildcard);
            } else if token.len() == 2 {
                let byte = u8::from_str_radix(token, 16)
                    .map_err(|_| Error::SignatureParse(token.to_string()))?;
                tokens.push(SigByte::Byte(byte));
            } else {
                return Err(Error::SignatureParse(token.to_string()));
            }
        }
        if tokens.is_empty() {
            return Err(Error::SignatureParse(pattern.to_string()));
        }
        Ok(Self {
            name: name.map(str::to_string),
            pattern: tokens,
            verified: verified.to_string(),
        })
    }

    /// Pattern length in bytes.
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    /// Whether the pattern is empty (never true for a parsed signature).
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.pattern.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match token {
                SigByte::Byte(b) => write!(f, "{:02X}", b)?,
                SigByte::Wildcard => f.write_str("??")?,
            }
        }
        Ok(())
    }
}

/// Whether `window` matches `pattern` byte-for-byte except at wildcard
/// positions. The window must be at least as long as the pattern.
pub fn window_matches(pattern: &[SigByte], window: &[u8]) -> bool {
    pattern.len() <= window.len()
        && pattern
            .iter()
            .zip(window)
            .all(|(token, byte)| token.matches(*byte))
}
