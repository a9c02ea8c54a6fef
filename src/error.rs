//! Error types
//!
//! Everything that can fail in the core returns `Result<T, GameError>`.
//! None of these are retryable: the frame loop logs the error and exits.

use std::fmt;

/// Unified error type for the platformer core.
#[derive(Clone, Debug, PartialEq)]
pub enum GameError {
    /// Bad configuration or a programming error in a lookup (unknown parallax
    /// layer, unsupported sprite sheet dimensions, invalid settings).
    Configuration {
        /// Description of what is wrong
        reason: String,
    },
    /// A structural precondition of a data structure was violated.
    InvariantViolation {
        /// Which invariant was broken
        invariant: &'static str,
        /// Position in the input where it was detected
        index: usize,
    },
    /// An argument outside its valid domain (e.g. a non-positive mass).
    InvalidArgument {
        /// Argument name
        name: &'static str,
        /// Offending value
        value: f32,
    },
    /// A fixed-capacity pool ran out of slots.
    CapacityExceeded {
        /// What resource was exhausted
        resource: &'static str,
        /// The limit that was exceeded
        limit: usize,
    },
    /// An asset file could not be read or does not follow its format.
    Asset {
        /// Path or name of the asset
        asset: String,
        /// Description of the problem
        reason: String,
    },
}

impl GameError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub fn asset(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Asset {
            asset: asset.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => write!(f, "configuration error: {reason}"),
            Self::InvariantViolation { invariant, index } => {
                write!(f, "invariant violated at index {index}: {invariant}")
            }
            Self::InvalidArgument { name, value } => {
                write!(f, "invalid argument {name} = {value}")
            }
            Self::CapacityExceeded { resource, limit } => {
                write!(f, "{resource} capacity exceeded (limit={limit})")
            }
            Self::Asset { asset, reason } => write!(f, "asset {asset}: {reason}"),
        }
    }
}

impl std::error::Error for GameError {}
