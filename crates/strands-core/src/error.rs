//! Error types for Strands Core

use thiserror::Error;

use crate::ids::EdgeId;

/// Result type alias using Strands' Error
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A label, edge id or couple is absent
    NotFound,
    /// Both endpoints exist but no directed path joins them
    NoPath,
    /// Explicit node creation hit an existing label
    DuplicateNode,
    /// An attribute cannot serve as a path weight
    UnsupportedWeight,
    /// Input rejected before any mutation
    MalformedInput,
    /// Configuration could not be parsed
    Config,
}

/// Strands error types
///
/// Labels are carried in their `Debug` rendering so the enum stays
/// independent of the label type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("Couple not found: {from} -> {to}")]
    CoupleNotFound { from: String, to: String },

    #[error("No path from {from} to {to}")]
    NoPath { from: String, to: String },

    #[error("Node already exists: {0}")]
    DuplicateNode(String),

    #[error("Unsupported weight for attribute '{attribute}': {reason}")]
    UnsupportedWeight { attribute: String, reason: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::NodeNotFound`] from a label
    pub fn node_not_found(label: &impl std::fmt::Debug) -> Self {
        Self::NodeNotFound(format!("{:?}", label))
    }

    /// Build a [`Error::CoupleNotFound`] from two labels
    pub fn couple_not_found(
        source: &impl std::fmt::Debug,
        destination: &impl std::fmt::Debug,
    ) -> Self {
        Self::CoupleNotFound {
            from: format!("{:?}", source),
            to: format!("{:?}", destination),
        }
    }

    /// Build a [`Error::NoPath`] from two labels
    pub fn no_path(from: &impl std::fmt::Debug, to: &impl std::fmt::Debug) -> Self {
        Self::NoPath {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }

    /// Build a [`Error::UnsupportedWeight`]
    pub fn unsupported_weight(attribute: &str, reason: impl Into<String>) -> Self {
        Self::UnsupportedWeight {
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NodeNotFound(_) | Self::EdgeNotFound(_) | Self::CoupleNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::NoPath { .. } => ErrorKind::NoPath,
            Self::DuplicateNode(_) => ErrorKind::DuplicateNode,
            Self::UnsupportedWeight { .. } => ErrorKind::UnsupportedWeight,
            Self::MalformedInput(_) | Self::Serialization(_) => ErrorKind::MalformedInput,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// True when a label, edge id or couple was absent
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct_from_no_path() {
        let missing = Error::node_not_found(&"Alex");
        let unreachable = Error::no_path(&"Alex", &"Robert");

        assert!(missing.is_not_found());
        assert!(!unreachable.is_not_found());
        assert_eq!(unreachable.kind(), ErrorKind::NoPath);
    }

    #[test]
    fn test_messages_carry_labels() {
        let err = Error::couple_not_found(&"Robert", &"Victoria");
        assert_eq!(
            err.to_string(),
            "Couple not found: \"Robert\" -> \"Victoria\""
        );
        assert_eq!(Error::EdgeNotFound(EdgeId::from_raw(7)).to_string(), "Edge not found: e7");
    }
}
