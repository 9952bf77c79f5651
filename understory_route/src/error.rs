// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types shared by the iterator, the factory chain and the router.
//!
//! "Not found" is not an error: searches report it as `Ok(None)`.

use alloc::format;
use alloc::string::String;

/// Result alias used throughout the crate.
pub type RoutingResult<T = ()> = Result<T, RoutingError>;

/// Failure reported by a [`Factory`](crate::factory::Factory),
/// [`ContainerFactory`](crate::factory::ContainerFactory) or
/// [`ContextTask`](crate::factory::ContextTask).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FactoryError {
    message: String,
}

impl FactoryError {
    /// Creates an error carrying a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by a routing operation.
///
/// The first failure in any phase aborts the remainder of the operation.
/// Nodes that were already built are left to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    /// No window, root or custom starting node could be resolved.
    #[error("no starting point for the search could be resolved")]
    StartingPointUnavailable,

    /// A factory or one of its context tasks failed.
    #[error("link {index} ({factory}) failed to build: {cause}")]
    BuildFailed {
        /// Position of the failing link, root first.
        index: usize,
        /// Type name of the failing factory or task.
        factory: &'static str,
        /// The reported cause.
        #[source]
        cause: FactoryError,
    },

    /// An adapter or action could not attach or select a child.
    #[error("composition failed: {0}")]
    CompositionFailed(String),

    /// A node passed the search predicate but could not be downcast.
    #[error("matched node is not a `{expected}`")]
    TypeMismatch {
        /// Type name the node was expected to have.
        expected: &'static str,
    },
}

impl RoutingError {
    /// Creates a [`CompositionFailed`](Self::CompositionFailed) error.
    pub fn composition(reason: impl Into<String>) -> Self {
        Self::CompositionFailed(reason.into())
    }

    /// Composition failure for a container handle that no longer resolves.
    #[must_use]
    pub fn deallocated(container: &str) -> Self {
        Self::CompositionFailed(format!("{container} has been deallocated"))
    }

    /// Returns `true` for [`CompositionFailed`](Self::CompositionFailed).
    #[must_use]
    pub fn is_composition_failure(&self) -> bool {
        matches!(self, Self::CompositionFailed(_))
    }
}
