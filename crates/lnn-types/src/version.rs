//! Negotiated soft-bus protocol versions.

use serde::{Deserialize, Serialize};

/// Protocol version agreed with a peer during authentication.
///
/// Ordering follows the numeric value, so tier checks are plain comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SoftBusVersion {
    /// First legacy tier.
    OldV1 = 1,
    /// Second legacy tier.
    OldV2 = 2,
    /// First tier carrying software version and master-election fields.
    NewV1 = 100,
}

impl SoftBusVersion {
    /// Whether this version carries the version-gated descriptor fields.
    #[must_use]
    pub fn is_new_tier(self) -> bool {
        self >= Self::NewV1
    }

    /// Numeric wire value.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Parse a numeric wire value.
    #[must_use]
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::OldV1),
            2 => Some(Self::OldV2),
            100 => Some(Self::NewV1),
            _ => None,
        }
    }
}
