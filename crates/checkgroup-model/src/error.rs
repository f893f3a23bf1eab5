use checkgroup_types::CheckDisplayGroupType;
use thiserror::Error;

/// Errors from building a grouped tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupingError {
    /// A rule type with no node representation reached the node factory.
    /// Settings validation rejects these, so this is a caller contract
    /// violation.
    #[error("Unknown group type '{0}'")]
    UnknownGroupType(CheckDisplayGroupType),
}
