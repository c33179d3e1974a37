//! Error types for navigation and tree definitions.
//!
//! `NavError` covers runtime navigation failures and tree-building
//! misuse. `DefinitionError` covers loading a space from YAML.

use crate::tree::NodeId;
use thiserror::Error;

/// Navigation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// No node on the active chain declares the transition.
    #[error("Failed to find transition: {name} [{from}]")]
    TransitionNotFound { name: String, from: String },

    /// A composite reached while drilling down has no default child.
    #[error("Failed to navigate to next state. {path} is missing the default state")]
    MissingDefaultChild { path: String },

    /// A navigation was requested before the previous one finished.
    #[error("Navigation was requested before navigation finished")]
    NavigationInFlight,

    /// The handle does not belong to this tree.
    #[error("Node {0} not found")]
    UnknownNode(NodeId),

    /// Children and defaults can only be declared on composites.
    #[error("{path} is a leaf and cannot have children")]
    NotComposite { path: String },

    /// A default child must be one of the composite's children.
    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: String, child: String },

    /// Sibling names must be unique so paths are unique.
    #[error("{parent} already has a child named {name}")]
    DuplicateChild { parent: String, name: String },

    /// The navigator was driven before `initialize`.
    #[error("Navigator has not been initialized")]
    NotInitialized,

    /// The navigator already entered its root.
    #[error("Navigator is already initialized")]
    AlreadyInitialized,

    /// Node handles are 32-bit.
    #[error("Tree is full: node index {max_index} is the last one")]
    TreeFull { max_index: usize },

    /// Space names are unique within a registry.
    #[error("A navigation space named {0} is already registered")]
    DuplicateSpace(String),

    #[error("Didn't find navigation space {0}")]
    UnknownSpace(String),
}

impl NavError {
    /// Check if this error comes from how the tree was put together.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NavError::MissingDefaultChild { .. }
                | NavError::NotComposite { .. }
                | NavError::NotAChild { .. }
                | NavError::DuplicateChild { .. }
                | NavError::TreeFull { .. }
        )
    }

    /// Check if this error means the caller broke the API contract.
    pub fn is_caller_bug(&self) -> bool {
        matches!(
            self,
            NavError::NavigationInFlight
                | NavError::UnknownNode(_)
                | NavError::NotInitialized
                | NavError::AlreadyInitialized
                | NavError::DuplicateSpace(_)
                | NavError::UnknownSpace(_)
        )
    }
}

/// Error loading a navigation space definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Invalid space YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{path}: default child {default} is not declared")]
    UnknownDefault { path: String, default: String },

    #[error("{path}: transition {name} targets unknown node {target}")]
    UnknownTarget {
        path: String,
        name: String,
        target: String,
    },

    #[error("{path}: unknown hook kind {kind}")]
    UnknownHookKind { path: String, kind: String },

    #[error("Invalid parameters for hook {kind}: {message}")]
    InvalidHookParams { kind: String, message: String },

    #[error(transparent)]
    Tree(#[from] NavError),
}
