// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locating the [`ContainerAdapter`] for an arbitrary node.
//!
//! A [`ContainerAdapterLocator`] holds an ordered list of [`AdapterRule`]s and
//! returns the adapter produced by the first rule that recognizes a node.
//! Nodes no rule recognizes are leaves. Custom container kinds are supported
//! by registering another rule; the locator itself never changes.
//!
//! ```
//! use understory_route::container::{Stack, Tabs};
//! use understory_route::locator::ContainerAdapterLocator;
//! use understory_route::tree::ViewTree;
//!
//! let mut tree = ViewTree::new();
//! let leaf = tree.insert("profile");
//! let stack = tree.insert(Stack::with_children([leaf]));
//!
//! let locator = ContainerAdapterLocator::<ViewTree>::default();
//! let adapter = locator.locate(&tree, stack).unwrap();
//! assert_eq!(adapter.visible_children(&tree).as_slice(), &[leaf]);
//! assert!(locator.locate(&tree, leaf).is_none());
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::adapters::{ContainerAdapter, StackAdapter, TabAdapter};
use crate::container::{Stack, StackContainer, TabContainer, Tabs};
use crate::hierarchy::ViewHierarchy;

/// One way of recognizing a container kind.
///
/// Implemented for closures `Fn(&H, H::Node) -> Option<Box<dyn ContainerAdapter<H>>>`.
pub trait AdapterRule<H: ViewHierarchy> {
    /// Returns an adapter if `node` is a container of the kind this rule knows.
    fn adapter(&self, host: &H, node: H::Node) -> Option<Box<dyn ContainerAdapter<H>>>;
}

impl<H, F> AdapterRule<H> for F
where
    H: ViewHierarchy,
    F: Fn(&H, H::Node) -> Option<Box<dyn ContainerAdapter<H>>>,
{
    fn adapter(&self, host: &H, node: H::Node) -> Option<Box<dyn ContainerAdapter<H>>> {
        self(host, node)
    }
}

/// Ordered set of [`AdapterRule`]s, most specific first.
///
/// [`Default`] recognizes the built-in [`Tabs`] and [`Stack`] views.
pub struct ContainerAdapterLocator<H: ViewHierarchy> {
    rules: Vec<Box<dyn AdapterRule<H>>>,
}

impl<H: ViewHierarchy> fmt::Debug for ContainerAdapterLocator<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerAdapterLocator")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl<H: ViewHierarchy + 'static> Default for ContainerAdapterLocator<H> {
    fn default() -> Self {
        let mut locator = Self::empty();
        locator.register_stack::<Stack<H::Node>>();
        locator.register_tabs::<Tabs<H::Node>>();
        locator
    }
}

impl<H: ViewHierarchy + 'static> ContainerAdapterLocator<H> {
    /// A locator that recognizes nothing; every node is a leaf.
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registers a rule ahead of all existing ones.
    pub fn register(&mut self, rule: impl AdapterRule<H> + 'static) -> &mut Self {
        self.rules.insert(0, Box::new(rule));
        self
    }

    /// Registers [`StackAdapter`] for views of type `V`.
    pub fn register_stack<V: StackContainer<H::Node>>(&mut self) -> &mut Self {
        self.register(|host: &H, node: H::Node| {
            if host.view(node)?.is::<V>() {
                Some(Box::new(StackAdapter::<H, V>::new(node)) as Box<dyn ContainerAdapter<H>>)
            } else {
                None
            }
        })
    }

    /// Registers [`TabAdapter`] for views of type `V`.
    pub fn register_tabs<V: TabContainer<H::Node>>(&mut self) -> &mut Self {
        self.register(|host: &H, node: H::Node| {
            if host.view(node)?.is::<V>() {
                Some(Box::new(TabAdapter::<H, V>::new(node)) as Box<dyn ContainerAdapter<H>>)
            } else {
                None
            }
        })
    }

    /// Returns the adapter for `node`, or `None` for leaves and stale handles.
    pub fn locate(&self, host: &H, node: H::Node) -> Option<Box<dyn ContainerAdapter<H>>> {
        if !host.is_alive(node) {
            return None;
        }
        let adapter = self.rules.iter().find_map(|rule| rule.adapter(host, node));
        tracing::trace!(?node, container = adapter.is_some(), "located adapter");
        adapter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Children;
    use crate::error::{RoutingError, RoutingResult};
    use crate::tree::{ViewId, ViewTree};

    /// Two panes side by side; both are always visible.
    struct Split {
        primary: ViewId,
        secondary: ViewId,
    }

    struct SplitAdapter(ViewId);

    impl ContainerAdapter<ViewTree> for SplitAdapter {
        fn container(&self) -> ViewId {
            self.0
        }

        fn contained_children(&self, host: &ViewTree) -> Children<ViewId> {
            host.get::<Split>(self.0)
                .map(|s| [s.primary, s.secondary].into_iter().collect())
                .unwrap_or_default()
        }

        fn visible_children(&self, host: &ViewTree) -> Children<ViewId> {
            self.contained_children(host)
        }

        fn make_visible(&self, host: &mut ViewTree, child: ViewId, _: bool) -> RoutingResult {
            if self.contains(host, child) {
                Ok(())
            } else {
                Err(RoutingError::composition("not a pane"))
            }
        }

        fn set_contained_children(
            &self,
            _: &mut ViewTree,
            _: Vec<ViewId>,
            _: bool,
        ) -> RoutingResult {
            Err(RoutingError::composition("split panes are fixed"))
        }
    }

    #[test]
    fn defaults_recognize_builtin_containers_only() {
        let mut tree = ViewTree::new();
        let leaf = tree.insert(());
        let stack = tree.insert(Stack::with_children([leaf]));
        let tabs = tree.insert(Tabs::with_children([leaf]));
        let locator = ContainerAdapterLocator::<ViewTree>::default();

        assert_eq!(locator.len(), 2);
        assert_eq!(locator.locate(&tree, stack).map(|a| a.container()), Some(stack));
        assert_eq!(locator.locate(&tree, tabs).map(|a| a.container()), Some(tabs));
        assert!(locator.locate(&tree, leaf).is_none());
    }

    #[test]
    fn stale_nodes_have_no_adapter() {
        let mut tree = ViewTree::new();
        let stack = tree.insert(Stack::<ViewId>::new());
        let locator = ContainerAdapterLocator::<ViewTree>::default();
        tree.remove(stack);
        assert!(locator.locate(&tree, stack).is_none());
    }

    #[test]
    fn custom_rules_extend_the_locator() {
        let mut tree = ViewTree::new();
        let primary = tree.insert(());
        let secondary = tree.insert(());
        let split = tree.insert(Split { primary, secondary });

        let mut locator = ContainerAdapterLocator::<ViewTree>::default();
        assert!(locator.locate(&tree, split).is_none());

        locator.register(|host: &ViewTree, node: ViewId| {
            host.get::<Split>(node)
                .map(|_| Box::new(SplitAdapter(node)) as Box<dyn ContainerAdapter<ViewTree>>)
        });
        let adapter = locator.locate(&tree, split).unwrap();
        assert_eq!(
            adapter.visible_children(&tree).as_slice(),
            &[primary, secondary]
        );
    }

    #[test]
    fn later_rules_take_precedence() {
        let mut tree = ViewTree::new();
        let leaf = tree.insert(());
        let stack = tree.insert(Stack::with_children([leaf]));

        let mut locator = ContainerAdapterLocator::<ViewTree>::default();
        // Treat stacks as opaque leaves.
        locator.register(|host: &ViewTree, node: ViewId| {
            host.get::<Stack<ViewId>>(node)?;
            Some(Box::new(SplitAdapter(node)) as Box<dyn ContainerAdapter<ViewTree>>)
        });
        let adapter = locator.locate(&tree, stack).unwrap();
        assert!(adapter.contained_children(&tree).is_empty());
    }

    #[test]
    fn empty_locator_sees_only_leaves() {
        let mut tree = ViewTree::new();
        let stack = tree.insert(Stack::<ViewId>::new());
        let locator = ContainerAdapterLocator::<ViewTree>::empty();
        assert!(locator.is_empty());
        assert!(locator.locate(&tree, stack).is_none());
    }
}
