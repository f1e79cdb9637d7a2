//! Offset descriptors: the recovered facts this pipeline exists to produce.
//!
//! Each descriptor carries the label of the discovery task that produced it
//! and the informal build tag of the signature it was derived from. Display
//! renders the one-line diagnostic consumed by callers: hex for addresses
//! and offsets, decimal for sizes and lengths.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Final output of one discovery task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetDescriptor {
    /// A single guarded field offset.
    FieldOffset {
        label: String,
        offset: u64,
        verified: String,
    },
    /// An array's base offset, element size, and length.
    ArrayLayout {
        label: String,
        offset: u64,
        element_size: u64,
        length: u64,
        verified: String,
    },
}

impl OffsetDescriptor {
    /// Label of the discovery task that produced this descriptor.
    pub fn label(&self) -> &str {
        match self {
            OffsetDescriptor::FieldOffset { label, .. } => label,
            OffsetDescriptor::ArrayLayout { label, .. } => label,
        }
    }

    /// Build tag of the signature this descriptor was derived from.
    pub fn verified(&self) -> &str {
        match self {
            OffsetDescriptor::FieldOffset { verified, .. } => verified,
            OffsetDescriptor::ArrayLayout { verified, .. } => verified,
        }
    }

    /// Serialize for downstream consumers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for OffsetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffsetDescriptor::FieldOffset { label, offset, .. } => {
                write!(f, "[{}] field offset: {:#x}", label, offset)
            }
            OffsetDescriptor::ArrayLayout {
                label,
                offset,
                element_size,
                length,
                ..
            } => {
                write!(
                    f,
                    "[{}] array offset: {:#x}, element size: {}, length: {}",
                    label, offset, element_size, length
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_offset_display() {
        let desc = OffsetDescriptor::FieldOffset {
            label: "TryOn Toggle".to_string(),
            offset: 0x330,
            verified: "7.3.1".to_string(),
        };
        assert_eq!(desc.to_string(), "[TryOn Toggle] field offset: 0x330");
        assert_eq!(desc.label(), "TryOn Toggle");
        assert_eq!(desc.verified(), "7.3.1");
    }

    #[test]
    fn test_array_layout_display_uses_decimal_sizes() {
        let desc = OffsetDescriptor::ArrayLayout {
            label: "TryOn Items".to_string(),
            offset: 0x2a8,
            element_size: 12,
            length: 40,
            verified: "7.3.1".to_string(),
        };
        assert_eq!(
            desc.to_string(),
            "[TryOn Items] array offset: 0x2a8, element size: 12, length: 40"
        );
    }

    #[test]
    fn test_json_export() {
        let desc = OffsetDescriptor::FieldOffset {
            label: "t".to_string(),
            offset: 8,
            verified: "v".to_string(),
        };
        let json = desc.to_json().unwrap();
        assert!(json.contains("\"FieldOffset\""));
        assert!(json.contains("\"offset\":8"));
    }
}
