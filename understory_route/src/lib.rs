// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_route --heading-base-level=0

//! Understory Route: declarative find-or-build navigation over view hierarchies.
//!
//! A destination is described as a chain of factories, root container first
//! and leaf last, each paired with the action that attaches its node to the
//! previous one. Routing to a destination looks for the deepest part of the
//! chain that already exists in the live hierarchy, builds only what is
//! missing, and attaches the new nodes so the leaf ends up on screen.
//!
//! The crate never owns views. It works on opaque [`ViewHierarchy::Node`]
//! handles, resolves them through the host on every access, and reaches the
//! children of any container through a [`ContainerAdapter`] located at runtime.
//!
//! ## Pieces
//!
//! - [`ViewHierarchy`]: the host's live tree, with overlay links.
//!   [`ViewTree`] is an arena-backed implementation for headless use and tests.
//! - [`ContainerAdapter`] and [`ContainerAdapterLocator`]: uniform access to
//!   container children. [`Stack`] and [`Tabs`] are recognized by default;
//!   custom kinds are added by registering a rule.
//! - [`StackIterator`]: depth-first search scoped by [`SearchOptions`].
//! - [`Finder`]: locates a typed node for a context.
//! - [`Factory`], [`ContainerFactory`], [`ContextTask`], [`ContainerAction`]:
//!   the extension points a destination is made of.
//! - [`CompleteFactoryAssembly`] and [`CompleteFactory`]: the typed builder and
//!   the type-erased chain it produces.
//! - [`Router`]: runs one routing operation.
//!
//! ## Example
//!
//! ```rust
//! use understory_route::{
//!     Append, ClassFinder, ClassWithContextFinder, CompleteFactoryAssembly, ContextChecking,
//!     Router, Select, Stack, StackFactory, Tabs, TabsFactory, ViewFactory, ViewId, ViewTree,
//! };
//!
//! struct Conversation {
//!     peer: u32,
//! }
//!
//! impl ContextChecking<u32> for Conversation {
//!     fn is_target(&self, peer: &u32) -> bool {
//!         self.peer == *peer
//!     }
//! }
//!
//! let destination = CompleteFactoryAssembly::<ViewTree, u32, _>::from_root(TabsFactory::new())
//!     .found_by(ClassFinder::<ViewTree, Tabs<ViewId>, u32>::default())
//!     .with_container(StackFactory::new(), Select)
//!     .found_by(ClassFinder::<ViewTree, Stack<ViewId>, u32>::default())
//!     .with(ViewFactory::new(|peer: &u32| Ok(Conversation { peer: *peer })), Append)
//!     .found_by(ClassWithContextFinder::<ViewTree, Conversation, u32>::default())
//!     .assemble();
//!
//! // The window already shows tabs with an empty stack.
//! let mut tree = ViewTree::new();
//! let stack = tree.insert(Stack::<ViewId>::new());
//! let tabs = tree.insert(Tabs::with_children([stack]));
//! tree.set_root(tabs);
//!
//! let router = Router::default();
//! let first = router.route(&mut tree, &destination, &7).unwrap().unwrap();
//! assert_eq!(first.reused, Some(stack));
//! assert_eq!(first.built.len(), 1);
//!
//! // Routing again finds the conversation instead of building a new one.
//! let second = router.route(&mut tree, &destination, &7).unwrap().unwrap();
//! assert_eq!(second.destination, first.destination);
//! assert!(second.built.is_empty());
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support in dependencies. The crate itself
//!   is `no_std` and uses `alloc`.
//!
//! Routing decisions are reported through `tracing`; this crate installs no
//! subscriber.

#![no_std]

extern crate alloc;

pub mod action;
pub mod adapters;
pub mod assembly;
pub mod container;
pub mod error;
pub mod factory;
pub mod finder;
pub mod hierarchy;
pub mod iterator;
pub mod locator;
pub mod router;
pub mod tree;

pub use action::{Append, ContainerAction, PendingChildren, Present, ReplaceAll, Select};
pub use adapters::{Children, ContainerAdapter, StackAdapter, TabAdapter};
pub use assembly::{Built, CompleteFactory, CompleteFactoryAssembly, PostponedIntegrationFactory};
pub use container::{Stack, StackContainer, TabContainer, Tabs};
pub use error::{FactoryError, RoutingError, RoutingResult};
pub use factory::{
    ContainerFactory, ContextTask, Factory, StackFactory, TabsFactory, TaskFn, ViewFactory,
};
pub use finder::{ClassFinder, ClassWithContextFinder, Finder, StackIteratingFinder};
pub use hierarchy::{ContextChecking, ViewHierarchy};
pub use iterator::{Edge, PathStep, SearchOptions, StackIterator, StackPath, StartingPoint};
pub use locator::{AdapterRule, ContainerAdapterLocator};
pub use router::{Routed, Router};
pub use tree::{ViewId, ViewTree};
