// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first search over the live hierarchy.
//!
//! A [`StackIterator`] resolves a [`StartingPoint`], then walks depth-first,
//! descending into containers through the adapters found by a
//! [`ContainerAdapterLocator`] and across overlay links, as selected by
//! [`SearchOptions`]. The first node satisfying the predicate wins.
//!
//! ## Order
//!
//! At each node: the node itself, then its children in adapter order, then the
//! node presented over it, then the node it is presented over. The walk uses
//! an explicit stack and a visited set, so every reachable node is tested at
//! most once even when adapters alias children or overlay links form a cycle.
//! Stale handles are skipped.
//!
//! ## Example
//!
//! ```
//! use understory_route::container::Stack;
//! use understory_route::iterator::{SearchOptions, StackIterator, StartingPoint};
//! use understory_route::locator::ContainerAdapterLocator;
//! use understory_route::tree::ViewTree;
//!
//! let mut tree = ViewTree::new();
//! let list = tree.insert("list");
//! let detail = tree.insert("detail");
//! let stack = tree.insert(Stack::with_children([list, detail]));
//! tree.set_root(stack);
//!
//! let adapters = ContainerAdapterLocator::default();
//! let iterator = StackIterator::new(SearchOptions::FULL_STACK, StartingPoint::Root);
//! let found = iterator
//!     .first_node(&tree, &adapters, |tree, node| tree.get::<&str>(node) == Some(&"list"))
//!     .unwrap();
//! assert_eq!(found, Some(list));
//!
//! // Only the top of the stack is visible.
//! let visible_only = StackIterator::new(SearchOptions::ALL_VISIBLE, StartingPoint::Root);
//! let found = visible_only
//!     .first_node(&tree, &adapters, |tree, node| tree.get::<&str>(node) == Some(&"list"))
//!     .unwrap();
//! assert_eq!(found, None);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;

use crate::error::{RoutingError, RoutingResult};
use crate::hierarchy::ViewHierarchy;
use crate::locator::ContainerAdapterLocator;

bitflags::bitflags! {
    /// Which surfaces of the hierarchy a search examines.
    ///
    /// Without a descent flag the search never leaves the starting node.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SearchOptions: u8 {
        /// Test the starting node itself.
        const CURRENT    = 0b0000_0001;
        /// Descend into the visible children of containers.
        const VISIBLE    = 0b0000_0010;
        /// Descend into all contained children of containers. Wins over `VISIBLE`.
        const CONTAINED  = 0b0000_0100;
        /// Follow overlays presented on top of a node.
        const PRESENTED  = 0b0000_1000;
        /// Follow the node a node is presented over.
        const PRESENTING = 0b0001_0000;

        /// The starting node and everything it contains.
        const CURRENT_ALL_STACK = Self::CURRENT.bits() | Self::CONTAINED.bits();
        /// The starting node and its visible descendants.
        const CURRENT_VISIBLE_ONLY = Self::CURRENT.bits() | Self::VISIBLE.bits();
        /// Everything on screen, across overlays.
        const ALL_VISIBLE = Self::CURRENT_VISIBLE_ONLY.bits()
            | Self::PRESENTED.bits()
            | Self::PRESENTING.bits();
        /// Everything reachable, visible or not.
        const FULL_STACK = Self::CURRENT_ALL_STACK.bits()
            | Self::PRESENTED.bits()
            | Self::PRESENTING.bits();
        /// The starting node and the nodes it is presented over.
        const CURRENT_AND_UP = Self::CURRENT.bits() | Self::PRESENTING.bits();
        /// The starting node and the overlays above it.
        const CURRENT_AND_DOWN = Self::CURRENT.bits() | Self::PRESENTED.bits();
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::FULL_STACK
    }
}

impl SearchOptions {
    fn descends_into_children(self) -> bool {
        self.intersects(Self::VISIBLE | Self::CONTAINED)
    }
}

/// Where a search starts.
pub enum StartingPoint<H: ViewHierarchy> {
    /// The front-most node of the window.
    Topmost,
    /// The window root.
    Root,
    /// A node computed when the search runs.
    Custom(Box<dyn Fn(&H) -> RoutingResult<Option<H::Node>>>),
}

impl<H: ViewHierarchy> Default for StartingPoint<H> {
    fn default() -> Self {
        Self::Topmost
    }
}

impl<H: ViewHierarchy> fmt::Debug for StartingPoint<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topmost => f.write_str("Topmost"),
            Self::Root => f.write_str("Root"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl<H: ViewHierarchy + 'static> StartingPoint<H> {
    /// Starts from the node returned by `resolve`.
    pub fn custom(resolve: impl Fn(&H) -> RoutingResult<Option<H::Node>> + 'static) -> Self {
        Self::Custom(Box::new(resolve))
    }

    /// Starts from a fixed node.
    pub fn node(node: H::Node) -> Self {
        Self::custom(move |_| Ok(Some(node)))
    }
}

/// How a node on a [`StackPath`] was reached.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    /// The starting node.
    Start,
    /// A child of the previous node's container adapter.
    Contained,
    /// Presented over the previous node.
    Presented,
    /// The previous node is presented over this one.
    Presenting,
}

/// One step of a [`StackPath`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathStep<N> {
    /// The node.
    pub node: N,
    /// How it was reached from the previous step.
    pub edge: Edge,
}

/// Start→match route through the hierarchy, as walked by the search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackPath<N> {
    steps: Vec<PathStep<N>>,
}

impl<N: Copy> StackPath<N> {
    /// A path of just `node`, for finders that do not walk the hierarchy.
    pub fn single(node: N) -> Self {
        Self {
            steps: alloc::vec![PathStep {
                node,
                edge: Edge::Start,
            }],
        }
    }

    /// The matched node.
    #[must_use]
    pub fn target(&self) -> N {
        self.steps[self.steps.len() - 1].node
    }

    /// All steps, starting node first.
    #[must_use]
    pub fn steps(&self) -> &[PathStep<N>] {
        &self.steps
    }

    /// Consecutive `(container, child)` pairs joined by a [`Edge::Contained`] edge.
    pub fn containment(&self) -> impl Iterator<Item = (N, N)> + '_ {
        self.steps
            .windows(2)
            .filter(|w| w[1].edge == Edge::Contained)
            .map(|w| (w[0].node, w[1].node))
    }
}

/// Configurable depth-first search over a [`ViewHierarchy`].
pub struct StackIterator<H: ViewHierarchy> {
    options: SearchOptions,
    starting_point: StartingPoint<H>,
}

impl<H: ViewHierarchy> Default for StackIterator<H> {
    fn default() -> Self {
        Self {
            options: SearchOptions::default(),
            starting_point: StartingPoint::default(),
        }
    }
}

impl<H: ViewHierarchy> fmt::Debug for StackIterator<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackIterator")
            .field("options", &self.options)
            .field("starting_point", &self.starting_point)
            .finish()
    }
}

struct Pending<N> {
    node: N,
    edge: Edge,
    parent: Option<usize>,
    options: SearchOptions,
    test: bool,
}

impl<H: ViewHierarchy + 'static> StackIterator<H> {
    /// Creates an iterator.
    pub fn new(options: SearchOptions, starting_point: StartingPoint<H>) -> Self {
        Self {
            options,
            starting_point,
        }
    }

    /// The search options.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// The starting point.
    pub fn starting_point(&self) -> &StartingPoint<H> {
        &self.starting_point
    }

    /// Resolves the starting point to a live node.
    pub fn starting_node(&self, host: &H) -> RoutingResult<H::Node> {
        let node = match &self.starting_point {
            StartingPoint::Topmost => host.topmost(),
            StartingPoint::Root => host.root(),
            StartingPoint::Custom(resolve) => resolve(host).unwrap_or_else(|err| {
                tracing::debug!(%err, "custom starting point failed");
                None
            }),
        };
        node.filter(|&n| host.is_alive(n))
            .ok_or(RoutingError::StartingPointUnavailable)
    }

    /// Returns the first node satisfying `predicate`, or `Ok(None)`.
    pub fn first_node(
        &self,
        host: &H,
        adapters: &ContainerAdapterLocator<H>,
        predicate: impl FnMut(&H, H::Node) -> bool,
    ) -> RoutingResult<Option<H::Node>> {
        Ok(self
            .first_path(host, adapters, predicate)?
            .map(|path| path.target()))
    }

    /// Returns the path to the first node satisfying `predicate`, or `Ok(None)`.
    pub fn first_path(
        &self,
        host: &H,
        adapters: &ContainerAdapterLocator<H>,
        mut predicate: impl FnMut(&H, H::Node) -> bool,
    ) -> RoutingResult<Option<StackPath<H::Node>>> {
        let start = self.starting_node(host)?;

        let mut visited: HashSet<H::Node> = HashSet::new();
        // Every visited node with the index of the node it was reached from.
        let mut trail: Vec<PathStep<H::Node>> = Vec::new();
        let mut parents: Vec<Option<usize>> = Vec::new();
        let mut stack = alloc::vec![Pending {
            node: start,
            edge: Edge::Start,
            parent: None,
            options: self.options,
            test: self.options.contains(SearchOptions::CURRENT),
        }];

        while let Some(Pending {
            node,
            edge,
            parent,
            options,
            test,
        }) = stack.pop()
        {
            if !host.is_alive(node) || !visited.insert(node) {
                continue;
            }
            trail.push(PathStep { node, edge });
            parents.push(parent);
            let here = trail.len() - 1;
            tracing::trace!(?node, ?edge, "visiting");

            if test && predicate(host, node) {
                return Ok(Some(Self::path_to(&trail, &parents, here)));
            }

            // Pushed in reverse: children are explored first, then overlays.
            if options.contains(SearchOptions::PRESENTING)
                && let Some(presenting) = host.presenting(node)
            {
                stack.push(Pending {
                    node: presenting,
                    edge: Edge::Presenting,
                    parent: Some(here),
                    options: options - SearchOptions::PRESENTED,
                    test: true,
                });
            }
            if options.contains(SearchOptions::PRESENTED)
                && let Some(presented) = host.presented(node)
            {
                stack.push(Pending {
                    node: presented,
                    edge: Edge::Presented,
                    parent: Some(here),
                    options: options - SearchOptions::PRESENTING,
                    test: true,
                });
            }
            if options.descends_into_children()
                && let Some(adapter) = adapters.locate(host, node)
            {
                let children = if options.contains(SearchOptions::CONTAINED) {
                    adapter.contained_children(host)
                } else {
                    adapter.visible_children(host)
                };
                for &child in children.iter().rev() {
                    stack.push(Pending {
                        node: child,
                        edge: Edge::Contained,
                        parent: Some(here),
                        options: options - SearchOptions::PRESENTING,
                        test: true,
                    });
                }
            }
        }

        Ok(None)
    }

    fn path_to(
        trail: &[PathStep<H::Node>],
        parents: &[Option<usize>],
        mut at: usize,
    ) -> StackPath<H::Node> {
        let mut steps = alloc::vec![trail[at]];
        while let Some(parent) = parents[at] {
            steps.push(trail[parent]);
            at = parent;
        }
        steps.reverse();
        StackPath { steps }
    }
}
