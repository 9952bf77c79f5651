// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform access to the children of one container.
//!
//! A [`ContainerAdapter`] is a view over exactly one container handle. It
//! normalizes "children", "visible children", "make a child visible" and
//! "replace children" across container kinds, so the iterator and the
//! attach actions never depend on a concrete container type.
//!
//! - [`stack`]: adapter for [`StackContainer`](crate::container::StackContainer) views.
//! - [`tabs`]: adapter for [`TabContainer`](crate::container::TabContainer) views.
//!
//! Every implementation keeps `visible_children ⊆ contained_children`.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::error::RoutingResult;
use crate::hierarchy::ViewHierarchy;

pub mod stack;
pub mod tabs;

pub use stack::StackAdapter;
pub use tabs::TabAdapter;

/// Children returned by an adapter, in presentation order.
pub type Children<N> = SmallVec<[N; 4]>;

/// Read/write contract over one container's children.
///
/// Adapters hold only the container handle and resolve it through the host
/// on every call. When the handle no longer resolves, reads return no
/// children and writes fail with
/// [`RoutingError::deallocated`](crate::error::RoutingError::deallocated).
pub trait ContainerAdapter<H: ViewHierarchy> {
    /// The container this adapter is bound to.
    fn container(&self) -> H::Node;

    /// All children, in presentation order.
    fn contained_children(&self, host: &H) -> Children<H::Node>;

    /// Children currently on screen.
    fn visible_children(&self, host: &H) -> Children<H::Node>;

    /// Brings a contained child on screen.
    ///
    /// Succeeds without changes if `child` is already visible. Fails with a
    /// composition error, leaving the container untouched, if `child` is not
    /// contained.
    fn make_visible(&self, host: &mut H, child: H::Node, animated: bool) -> RoutingResult;

    /// Replaces all children unconditionally. An empty list is valid.
    fn set_contained_children(
        &self,
        host: &mut H,
        children: Vec<H::Node>,
        animated: bool,
    ) -> RoutingResult;

    /// Returns `true` if `child` is one of the contained children.
    fn contains(&self, host: &H, child: H::Node) -> bool {
        self.contained_children(host).contains(&child)
    }
}
