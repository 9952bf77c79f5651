// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One find-or-build routing operation.
//!
//! [`Router::route`] takes an assembled destination and:
//!
//! 1. asks each link's finder, leaf first, for an existing node; the deepest
//!    hit is the anchor,
//! 2. builds the links below the anchor, detached from the live tree,
//! 3. makes the anchor visible inside every container on the way to it and
//!    attaches the first new node to the anchor with its link's action.
//!
//! Without an anchor the whole chain is built and returned detached, for the
//! presentation layer to show.

use alloc::vec::Vec;

use crate::assembly::CompleteFactory;
use crate::error::{RoutingError, RoutingResult};
use crate::hierarchy::ViewHierarchy;
use crate::iterator::StackPath;
use crate::locator::ContainerAdapterLocator;

/// Outcome of a successful routing operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Routed<N> {
    /// The destination's leaf node, now in place.
    pub destination: N,
    /// Existing node the new nodes were attached to, if one was found.
    pub reused: Option<N>,
    /// Newly built nodes, root first.
    pub built: Vec<N>,
}

impl<N: Copy> Routed<N> {
    /// Root of a newly built chain that no container holds yet.
    pub fn detached_root(&self) -> Option<N> {
        match self.reused {
            Some(_) => None,
            None => self.built.first().copied(),
        }
    }
}

/// Resolves destinations against a live hierarchy.
#[derive(Debug)]
pub struct Router<H: ViewHierarchy> {
    adapters: ContainerAdapterLocator<H>,
    animated: bool,
}

impl<H: ViewHierarchy + 'static> Default for Router<H> {
    fn default() -> Self {
        Self::new(ContainerAdapterLocator::default())
    }
}

impl<H: ViewHierarchy + 'static> Router<H> {
    /// Creates a router using `adapters` to reach container children.
    pub fn new(adapters: ContainerAdapterLocator<H>) -> Self {
        Self {
            adapters,
            animated: false,
        }
    }

    /// Sets whether visible changes are animated.
    #[must_use]
    pub fn with_animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    /// Returns `true` if visible changes are animated.
    pub fn animated(&self) -> bool {
        self.animated
    }

    /// The adapter locator.
    pub fn adapters(&self) -> &ContainerAdapterLocator<H> {
        &self.adapters
    }

    /// The adapter locator, for registering custom containers.
    pub fn adapters_mut(&mut self) -> &mut ContainerAdapterLocator<H> {
        &mut self.adapters
    }

    /// Routes to `destination` for `context`. An empty destination routes
    /// nowhere and returns `Ok(None)`.
    pub fn route<C>(
        &self,
        host: &mut H,
        destination: &CompleteFactory<H, C>,
        context: &C,
    ) -> RoutingResult<Option<Routed<H::Node>>> {
        if destination.is_empty() {
            tracing::debug!("empty destination");
            return Ok(None);
        }

        let Some((index, path)) = self.find_anchor(host, destination, context)? else {
            let built = destination.build_from(0, host, &self.adapters, context)?;
            let destination = built[built.len() - 1];
            tracing::debug!(?destination, nodes = built.len(), "built detached chain");
            return Ok(Some(Routed {
                destination,
                reused: None,
                built,
            }));
        };

        let anchor = path.target();
        let links = destination.links();
        if index + 1 == links.len() {
            self.reveal(host, &path)?;
            tracing::debug!(?anchor, "destination already exists");
            return Ok(Some(Routed {
                destination: anchor,
                reused: Some(anchor),
                built: Vec::new(),
            }));
        }

        let action = links[index + 1].action().ok_or_else(|| {
            RoutingError::composition("the link below a found node has no integration action")
        })?;
        // New nodes are detached until attached below, so a failed build leaves
        // the live tree as it was.
        let built = destination.build_from(index + 1, host, &self.adapters, context)?;
        self.reveal(host, &path)?;
        action.perform(host, &self.adapters, built[0], anchor, self.animated)?;
        let leaf = built[built.len() - 1];
        tracing::debug!(
            ?anchor,
            destination = ?leaf,
            nodes = built.len(),
            "attached to found node"
        );
        Ok(Some(Routed {
            destination: leaf,
            reused: Some(anchor),
            built,
        }))
    }

    fn find_anchor<C>(
        &self,
        host: &H,
        destination: &CompleteFactory<H, C>,
        context: &C,
    ) -> RoutingResult<Option<(usize, StackPath<H::Node>)>> {
        for (index, link) in destination.links().iter().enumerate().rev() {
            if let Some(path) = link.find(host, &self.adapters, context)? {
                tracing::debug!(index, node = ?path.target(), "found existing node");
                return Ok(Some((index, path)));
            }
        }
        Ok(None)
    }

    fn reveal(&self, host: &mut H, path: &StackPath<H::Node>) -> RoutingResult {
        for (container, child) in path.containment() {
            let Some(adapter) = self.adapters.locate(host, container) else {
                return Err(RoutingError::deallocated(&alloc::format!("{container:?}")));
            };
            if !adapter.visible_children(host).contains(&child) {
                adapter.make_visible(host, child, self.animated)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Append, Select};
    use crate::adapters::ContainerAdapter;
    use crate::assembly::CompleteFactoryAssembly;
    use crate::container::{Stack, StackContainer, TabContainer, Tabs};
    use crate::error::FactoryError;
    use crate::factory::{Factory, StackFactory, TabsFactory, ViewFactory};
    use crate::finder::{ClassFinder, ClassWithContextFinder};
    use crate::hierarchy::ContextChecking;
    use crate::iterator::{SearchOptions, StartingPoint};
    use crate::tree::{ViewId, ViewTree};
    use alloc::boxed::Box;

    #[derive(Debug)]
    struct Chat {
        peer: u32,
    }

    impl ContextChecking<u32> for Chat {
        fn is_target(&self, peer: &u32) -> bool {
            self.peer == *peer
        }
    }

    fn chat_destination() -> CompleteFactory<ViewTree, u32> {
        CompleteFactoryAssembly::<ViewTree, u32, _>::from_root(TabsFactory::new())
            .found_by(ClassFinder::<ViewTree, Tabs<ViewId>, u32>::default())
            .with_container(StackFactory::new(), Select)
            .found_by(ClassFinder::<ViewTree, Stack<ViewId>, u32>::default())
            .with(ViewFactory::new(|peer: &u32| Ok(Chat { peer: *peer })), Append)
            .found_by(ClassWithContextFinder::<ViewTree, Chat, u32>::default())
            .assemble()
    }

    #[test]
    fn builds_everything_when_nothing_exists() {
        let mut tree = ViewTree::new();
        let router = Router::default();
        let err = router
            .route(&mut tree, &chat_destination(), &7)
            .unwrap_err();
        // No window yet: finders cannot start.
        assert_eq!(err, RoutingError::StartingPointUnavailable);

        let placeholder = tree.insert(());
        tree.set_root(placeholder);
        let routed = router
            .route(&mut tree, &chat_destination(), &7)
            .unwrap()
            .unwrap();
        assert_eq!(routed.reused, None);
        assert_eq!(routed.built.len(), 3);
        assert_eq!(routed.detached_root(), Some(routed.built[0]));
        assert_eq!(tree.get::<Chat>(routed.destination).unwrap().peer, 7);
    }

    #[test]
    fn reuses_the_existing_destination() {
        let mut tree = ViewTree::new();
        let chat = tree.insert(Chat { peer: 7 });
        let other = tree.insert(Chat { peer: 8 });
        let stack = tree.insert(Stack::with_children([chat, other]));
        let tabs = tree.insert(Tabs::with_children([stack]));
        tree.set_root(tabs);

        let routed = Router::default()
            .route(&mut tree, &chat_destination(), &7)
            .unwrap()
            .unwrap();
        assert_eq!(routed.destination, chat);
        assert!(routed.built.is_empty());
        assert_eq!(routed.detached_root(), None);
        // The covering chat was popped.
        assert_eq!(tree.get::<Stack<ViewId>>(stack).unwrap().children(), &[chat]);
    }

    #[test]
    fn attaches_below_the_deepest_found_node() {
        let mut tree = ViewTree::new();
        let other = tree.insert(Chat { peer: 8 });
        let stack = tree.insert(Stack::with_children([other]));
        let settings = tree.insert(());
        let tabs = tree.insert(Tabs::with_children([settings, stack]));
        tree.set_root(tabs);

        let routed = Router::default()
            .with_animated(true)
            .route(&mut tree, &chat_destination(), &7)
            .unwrap()
            .unwrap();
        assert_eq!(routed.reused, Some(stack));
        assert_eq!(routed.built.len(), 1);
        assert_eq!(
            tree.get::<Stack<ViewId>>(stack).unwrap().children(),
            &[other, routed.destination]
        );
        // The stack's tab was brought forward.
        assert_eq!(tree.get::<Tabs<ViewId>>(tabs).unwrap().selected(), Some(stack));
    }

    #[test]
    fn build_failures_leave_the_anchor_untouched() {
        let mut tree = ViewTree::new();
        let stack = tree.insert(Stack::<ViewId>::new());
        tree.set_root(stack);

        let destination = CompleteFactoryAssembly::<ViewTree, (), _>::from_root(StackFactory::new())
            .found_by(ClassFinder::<ViewTree, Stack<ViewId>, ()>::default())
            .with(
                ViewFactory::new(|_: &()| Err::<Chat, _>(FactoryError::new("gone"))),
                Append,
            )
            .assemble();
        let err = Router::default()
            .route(&mut tree, &destination, &())
            .unwrap_err();
        assert!(matches!(err, RoutingError::BuildFailed { index: 1, .. }));
        assert!(tree.get::<Stack<ViewId>>(stack).unwrap().children().is_empty());
    }

    /// Live tree `outer: Stack[inner: Stack, cover]`, with a destination that
    /// finds `inner` and builds a leaf below it.
    fn covered_stack(
        leaf: impl Factory<ViewTree, View = Chat, Context = ()> + 'static,
    ) -> (ViewTree, [ViewId; 3], CompleteFactory<ViewTree, ()>) {
        let mut tree = ViewTree::new();
        let inner = tree.insert(Stack::<ViewId>::new());
        let cover = tree.insert(());
        let outer = tree.insert(Stack::with_children([inner, cover]));
        tree.set_root(outer);

        let destination = CompleteFactoryAssembly::<ViewTree, (), _>::from_root(StackFactory::new())
            .with_container(StackFactory::new(), Append)
            .found_by(ClassFinder::<ViewTree, Stack<ViewId>, ()>::new(
                SearchOptions::CONTAINED,
                StartingPoint::Root,
            ))
            .with(leaf, Append)
            .assemble();
        (tree, [outer, inner, cover], destination)
    }

    #[test]
    fn failed_builds_do_not_reveal_the_anchor() {
        let (mut tree, [outer, inner, cover], destination) =
            covered_stack(ViewFactory::new(|_: &()| {
                Err::<Chat, _>(FactoryError::new("offline"))
            }));
        let err = Router::default()
            .route(&mut tree, &destination, &())
            .unwrap_err();
        assert!(matches!(err, RoutingError::BuildFailed { index: 2, .. }));
        assert_eq!(
            tree.get::<Stack<ViewId>>(outer).unwrap().children(),
            &[inner, cover]
        );
        assert!(tree.get::<Stack<ViewId>>(inner).unwrap().children().is_empty());
    }

    #[test]
    fn successful_builds_reveal_then_attach() {
        let (mut tree, [outer, inner, _], destination) =
            covered_stack(ViewFactory::new(|_: &()| Ok(Chat { peer: 1 })));
        let routed = Router::default()
            .route(&mut tree, &destination, &())
            .unwrap()
            .unwrap();
        assert_eq!(routed.reused, Some(inner));
        assert_eq!(tree.get::<Stack<ViewId>>(outer).unwrap().children(), &[inner]);
        assert_eq!(
            tree.get::<Stack<ViewId>>(inner).unwrap().children(),
            &[routed.destination]
        );
    }

    #[test]
    fn empty_destination_routes_nowhere() {
        let mut tree = ViewTree::new();
        let destination = CompleteFactoryAssembly::<ViewTree, (), ()>::empty().assemble();
        assert_eq!(Router::default().route(&mut tree, &destination, &()), Ok(None));
    }

    #[test]
    fn configuration_is_plain_values() {
        let router = Router::<ViewTree>::default();
        assert!(!router.animated());
        assert_eq!(router.adapters().len(), 2);
        let mut router = router.with_animated(true);
        router.adapters_mut().register(
            |_: &ViewTree, _: ViewId| -> Option<Box<dyn ContainerAdapter<ViewTree>>> { None },
        );
        assert!(router.animated());
        assert_eq!(router.adapters().len(), 3);
    }
}
