// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The live view hierarchy as seen by the routing engine.
//!
//! The engine never owns views. It holds [`ViewHierarchy::Node`] handles and
//! resolves them through the host on every access; a handle that no longer
//! resolves is reported as a failure at the point of use.

use alloc::boxed::Box;
use core::any::Any;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;

use crate::error::{RoutingError, RoutingResult};

/// Host-provided access to the live tree of views.
///
/// Containment is not modelled here: children are reached through
/// [`ContainerAdapter`](crate::adapters::ContainerAdapter)s located for each
/// node. The hierarchy only knows which views exist, where the root is, and
/// which views are overlaid on top of others.
pub trait ViewHierarchy {
    /// Non-owning handle to a view.
    type Node: Copy + Eq + Hash + Debug + 'static;

    /// Root of the current window, if any.
    fn root(&self) -> Option<Self::Node>;

    /// Front-most node of the current window.
    ///
    /// The default follows the [`presented`](Self::presented) chain from the
    /// root to its end.
    fn topmost(&self) -> Option<Self::Node> {
        let mut node = self.root()?;
        let mut seen = HashSet::new();
        seen.insert(node);
        while let Some(next) = self.presented(node) {
            if !seen.insert(next) {
                break;
            }
            node = next;
        }
        Some(node)
    }

    /// Resolves a handle to its view, or `None` if it was destroyed.
    fn view(&self, node: Self::Node) -> Option<&dyn Any>;

    /// Resolves a handle to its view for mutation.
    fn view_mut(&mut self, node: Self::Node) -> Option<&mut dyn Any>;

    /// Returns `true` if the handle still resolves.
    fn is_alive(&self, node: Self::Node) -> bool {
        self.view(node).is_some()
    }

    /// Adopts a freshly built view and returns its handle.
    ///
    /// The new view is detached: it becomes part of the visible hierarchy only
    /// once a container or the presentation layer takes it.
    fn insert_view(&mut self, view: Box<dyn Any>) -> Self::Node;

    /// Node overlaid on top of `node`, if any.
    fn presented(&self, node: Self::Node) -> Option<Self::Node> {
        let _ = node;
        None
    }

    /// Node that `node` is overlaid on, if any.
    fn presenting(&self, node: Self::Node) -> Option<Self::Node> {
        let _ = node;
        None
    }

    /// Overlays `node` on top of `over`.
    fn present(&mut self, over: Self::Node, node: Self::Node, animated: bool) -> RoutingResult {
        let _ = (over, node, animated);
        Err(RoutingError::composition("presentation is not supported"))
    }
}

/// Views that can tell whether they already show a given context.
///
/// Used by [`ClassWithContextFinder`](crate::finder::ClassWithContextFinder).
pub trait ContextChecking<C> {
    /// Returns `true` if this view is the destination for `context`.
    fn is_target(&self, context: &C) -> bool;
}
