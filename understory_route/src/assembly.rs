// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Assembling a chain of differently typed factories into one build.
//!
//! A destination is described root first:
//!
//! ```
//! use understory_route::action::{Append, Select};
//! use understory_route::assembly::CompleteFactoryAssembly;
//! use understory_route::factory::{StackFactory, TabsFactory, TaskFn, ViewFactory};
//! use understory_route::locator::ContainerAdapterLocator;
//! use understory_route::tree::ViewTree;
//!
//! struct Profile { user: u32, title: &'static str }
//!
//! let destination = CompleteFactoryAssembly::<ViewTree, u32, _>::from_root(TabsFactory::new())
//!     .with_container(StackFactory::new(), Select)
//!     .with(ViewFactory::new(|user: &u32| Ok(Profile { user: *user, title: "" })), Append)
//!     .adding(TaskFn::new(|profile: &mut Profile, _: &u32| {
//!         profile.title = "Profile";
//!         Ok(())
//!     }))
//!     .assemble();
//! assert_eq!(destination.len(), 3);
//!
//! let mut tree = ViewTree::new();
//! let built = destination
//!     .build(&mut tree, &ContainerAdapterLocator::default(), &42)
//!     .unwrap()
//!     .unwrap();
//! let profile = tree.get::<Profile>(built.leaf()).unwrap();
//! assert_eq!((profile.user, profile.title), (42, "Profile"));
//! ```
//!
//! Each link is held by a [`PostponedIntegrationFactory`] until the whole
//! chain is known. [`CompleteFactory::build`] then builds every node root to
//! leaf, running each link's context tasks right after its node is built, and
//! finally integrates every child into its parent, also root to leaf.
//!
//! A link may also carry preset children, added with
//! [`CompleteFactoryAssembly::with_preset`]: siblings of the next link that
//! are built alongside their parent but never searched for. A parent receives
//! all of its children in one [`ContainerFactory::integrate`] call, presets in
//! the order they were added and the next link last.
//!
//! ```
//! use understory_route::action::{Append, Select};
//! use understory_route::assembly::CompleteFactoryAssembly;
//! use understory_route::container::{TabContainer, Tabs};
//! use understory_route::factory::{StackFactory, TabsFactory, ViewFactory};
//! use understory_route::locator::ContainerAdapterLocator;
//! use understory_route::tree::{ViewId, ViewTree};
//!
//! let destination = CompleteFactoryAssembly::<ViewTree, (), _>::from_root(TabsFactory::new())
//!     .with_preset(ViewFactory::new(|_: &()| Ok("home")), Append)
//!     .with_preset(ViewFactory::new(|_: &()| Ok("search")), Append)
//!     .with_container(StackFactory::new(), Select)
//!     .assemble();
//!
//! let mut tree = ViewTree::new();
//! let built = destination
//!     .build(&mut tree, &ContainerAdapterLocator::default(), &())
//!     .unwrap()
//!     .unwrap();
//! let tabs = tree.get::<Tabs<ViewId>>(built.root()).unwrap();
//! assert_eq!(tabs.children().len(), 3);
//! assert_eq!(tabs.selected(), Some(built.leaf()));
//! ```

use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use core::any::{Any, type_name};
use core::fmt;
use core::marker::PhantomData;

use crate::action::{Append, ContainerAction};
use crate::error::{FactoryError, RoutingError, RoutingResult};
use crate::factory::{ContainerFactory, ContextTask, Factory};
use crate::finder::Finder;
use crate::hierarchy::ViewHierarchy;
use crate::iterator::StackPath;
use crate::locator::ContainerAdapterLocator;

/// A factory with its view type erased.
pub trait AnyFactory<H: ViewHierarchy, C> {
    /// Type name of the underlying factory.
    fn name(&self) -> &'static str;

    /// Returns `true` for container factories.
    fn is_container(&self) -> bool;

    /// Builds one node.
    fn build(&self, host: &mut H, context: &C) -> Result<H::Node, FactoryError>;

    /// Attaches `children` to `node`, which this factory built.
    fn integrate(
        &self,
        host: &mut H,
        adapters: &ContainerAdapterLocator<H>,
        node: H::Node,
        children: &[(H::Node, &dyn ContainerAction<H>)],
    ) -> RoutingResult<H::Node>;
}

/// Erases a plain [`Factory`].
///
/// When a plain factory sits in a parent position, children are attached by
/// performing their actions directly; this only succeeds for actions that do
/// not need a container adapter, or for views some adapter rule recognizes.
pub struct FactoryBox<F>(F);

impl<F> FactoryBox<F> {
    /// Boxes `factory`.
    pub fn new(factory: F) -> Self {
        Self(factory)
    }
}

impl<F> fmt::Debug for FactoryBox<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FactoryBox").field(&type_name::<F>()).finish()
    }
}

impl<H, C, F> AnyFactory<H, C> for FactoryBox<F>
where
    H: ViewHierarchy,
    F: Factory<H, Context = C>,
{
    fn name(&self) -> &'static str {
        type_name::<F>()
    }

    fn is_container(&self) -> bool {
        false
    }

    fn build(&self, host: &mut H, context: &C) -> Result<H::Node, FactoryError> {
        self.0.build(host, context)
    }

    fn integrate(
        &self,
        host: &mut H,
        adapters: &ContainerAdapterLocator<H>,
        node: H::Node,
        children: &[(H::Node, &dyn ContainerAction<H>)],
    ) -> RoutingResult<H::Node> {
        for &(child, action) in children {
            action.perform(host, adapters, child, node, false)?;
        }
        Ok(node)
    }
}

/// Erases a [`ContainerFactory`]; integration goes through
/// [`ContainerFactory::integrate`].
pub struct ContainerFactoryBox<F>(F);

impl<F> ContainerFactoryBox<F> {
    /// Boxes `factory`.
    pub fn new(factory: F) -> Self {
        Self(factory)
    }
}

impl<F> fmt::Debug for ContainerFactoryBox<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContainerFactoryBox")
            .field(&type_name::<F>())
            .finish()
    }
}

impl<H, C, F> AnyFactory<H, C> for ContainerFactoryBox<F>
where
    H: ViewHierarchy,
    F: ContainerFactory<H, Context = C>,
{
    fn name(&self) -> &'static str {
        type_name::<F>()
    }

    fn is_container(&self) -> bool {
        true
    }

    fn build(&self, host: &mut H, context: &C) -> Result<H::Node, FactoryError> {
        self.0.build(host, context)
    }

    fn integrate(
        &self,
        host: &mut H,
        adapters: &ContainerAdapterLocator<H>,
        node: H::Node,
        children: &[(H::Node, &dyn ContainerAction<H>)],
    ) -> RoutingResult<H::Node> {
        self.0.integrate(host, adapters, node, children)
    }
}

/// A context task with its view type erased.
pub trait AnyContextTask<H: ViewHierarchy, C> {
    /// Type name of the underlying task.
    fn name(&self) -> &'static str;

    /// Runs the task against the view of `node`, built by link `index`.
    fn run(&self, host: &mut H, node: H::Node, context: &C, index: usize) -> RoutingResult;
}

/// Erases a [`ContextTask`]; the node's view is downcast when the task runs.
pub struct ContextTaskBox<T>(T);

impl<T> ContextTaskBox<T> {
    /// Boxes `task`.
    pub fn new(task: T) -> Self {
        Self(task)
    }
}

impl<T> fmt::Debug for ContextTaskBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextTaskBox")
            .field(&type_name::<T>())
            .finish()
    }
}

impl<H, C, T> AnyContextTask<H, C> for ContextTaskBox<T>
where
    H: ViewHierarchy,
    T: ContextTask<Context = C>,
{
    fn name(&self) -> &'static str {
        type_name::<T>()
    }

    fn run(&self, host: &mut H, node: H::Node, context: &C, index: usize) -> RoutingResult {
        if !host.is_alive(node) {
            return Err(RoutingError::deallocated(&format!("{node:?}")));
        }
        let view = host
            .view_mut(node)
            .and_then(|v| v.downcast_mut::<T::View>())
            .ok_or(RoutingError::TypeMismatch {
                expected: type_name::<T::View>(),
            })?;
        self.0
            .perform(view, context)
            .map_err(|cause| RoutingError::BuildFailed {
                index,
                factory: type_name::<T>(),
                cause,
            })
    }
}

trait AnyFinder<H: ViewHierarchy, C> {
    fn find_path(
        &self,
        host: &H,
        adapters: &ContainerAdapterLocator<H>,
        context: &C,
    ) -> RoutingResult<Option<StackPath<H::Node>>>;
}

impl<H, C, F> AnyFinder<H, C> for F
where
    H: ViewHierarchy,
    F: Finder<H, Context = C>,
{
    fn find_path(
        &self,
        host: &H,
        adapters: &ContainerAdapterLocator<H>,
        context: &C,
    ) -> RoutingResult<Option<StackPath<H::Node>>> {
        Finder::find_path(self, host, adapters, context)
    }
}

/// One link of a chain: a factory, how its node attaches to the previous
/// link's node, the tasks run against its node, and an optional finder for
/// reusing an existing node.
///
/// Preset children are built right after the link's node and integrated into
/// it ahead of the next link.
pub struct PostponedIntegrationFactory<H: ViewHierarchy, C> {
    factory: Box<dyn AnyFactory<H, C>>,
    action: Option<Box<dyn ContainerAction<H>>>,
    tasks: Vec<Box<dyn AnyContextTask<H, C>>>,
    finder: Option<Box<dyn AnyFinder<H, C>>>,
    presets: Vec<Self>,
}

impl<H: ViewHierarchy, C> fmt::Debug for PostponedIntegrationFactory<H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostponedIntegrationFactory")
            .field("factory", &self.factory.name())
            .field("action", &self.action.is_some())
            .field(
                "tasks",
                &self.tasks.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field("finder", &self.finder.is_some())
            .field("presets", &self.presets)
            .finish()
    }
}

impl<H: ViewHierarchy, C> PostponedIntegrationFactory<H, C> {
    /// Creates a link with no tasks and no finder.
    pub fn new(
        factory: Box<dyn AnyFactory<H, C>>,
        action: Option<Box<dyn ContainerAction<H>>>,
    ) -> Self {
        Self {
            factory,
            action,
            tasks: Vec::new(),
            finder: None,
            presets: Vec::new(),
        }
    }

    /// The boxed factory.
    pub fn factory(&self) -> &dyn AnyFactory<H, C> {
        &*self.factory
    }

    /// How this link's node attaches to the previous one, if it is not the root.
    pub fn action(&self) -> Option<&dyn ContainerAction<H>> {
        self.action.as_deref()
    }

    /// Number of context tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Appends a context task.
    pub fn add_task(&mut self, task: Box<dyn AnyContextTask<H, C>>) {
        self.tasks.push(task);
    }

    /// Returns `true` if a finder is attached.
    pub fn has_finder(&self) -> bool {
        self.finder.is_some()
    }

    /// Preset children, in the order they are integrated.
    pub fn presets(&self) -> &[Self] {
        &self.presets
    }

    /// Appends a preset child. It must carry an action.
    pub fn add_preset(&mut self, preset: Self) {
        self.presets.push(preset);
    }

    fn integration_action(&self, index: usize) -> RoutingResult<&dyn ContainerAction<H>> {
        self.action().ok_or_else(|| {
            RoutingError::composition(format!(
                "{} below link {index} has no integration action",
                self.factory.name()
            ))
        })
    }

    pub(crate) fn find(
        &self,
        host: &H,
        adapters: &ContainerAdapterLocator<H>,
        context: &C,
    ) -> RoutingResult<Option<StackPath<H::Node>>> {
        match &self.finder {
            Some(finder) => finder.find_path(host, adapters, context),
            None => Ok(None),
        }
    }

    fn build(&self, host: &mut H, context: &C, index: usize) -> RoutingResult<H::Node> {
        let node = self
            .factory
            .build(host, context)
            .map_err(|cause| RoutingError::BuildFailed {
                index,
                factory: self.factory.name(),
                cause,
            })?;
        tracing::debug!(index, factory = self.factory.name(), ?node, "built");
        for task in &self.tasks {
            task.run(host, node, context, index)?;
        }
        Ok(node)
    }
}

/// Builder for a [`CompleteFactory`], typed by the view of its pending link.
///
/// Links are added root first. The pending link is the one most recently
/// added; [`adding`](Self::adding) and [`found_by`](Self::found_by) apply to
/// it.
pub struct CompleteFactoryAssembly<H: ViewHierarchy, C, V> {
    links: Vec<PostponedIntegrationFactory<H, C>>,
    pending: Option<PostponedIntegrationFactory<H, C>>,
    _view: PhantomData<fn() -> V>,
}

impl<H: ViewHierarchy, C, V> fmt::Debug for CompleteFactoryAssembly<H, C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompleteFactoryAssembly")
            .field("links", &self.links)
            .field("pending", &self.pending)
            .finish()
    }
}

impl<H: ViewHierarchy + 'static, C: 'static> CompleteFactoryAssembly<H, C, ()> {
    /// An assembly with no links.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            links: Vec::new(),
            pending: None,
            _view: PhantomData,
        }
    }

    /// An assembly whose root is built by `root`.
    pub fn from_root<F>(root: F) -> CompleteFactoryAssembly<H, C, F::View>
    where
        F: ContainerFactory<H, Context = C> + 'static,
    {
        Self::empty().link(PostponedIntegrationFactory::new(
            Box::new(ContainerFactoryBox::new(root)),
            None,
        ))
    }
}

impl<H, C, V> CompleteFactoryAssembly<H, C, V>
where
    H: ViewHierarchy + 'static,
    C: 'static,
    V: Any,
{
    /// Number of links, pending one included.
    pub fn len(&self) -> usize {
        self.links.len() + usize::from(self.pending.is_some())
    }

    /// Returns `true` if no link was added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds a leaf or plain link attached to the previous link with `action`.
    pub fn with<F>(
        self,
        factory: F,
        action: impl ContainerAction<H> + 'static,
    ) -> CompleteFactoryAssembly<H, C, F::View>
    where
        F: Factory<H, Context = C> + 'static,
    {
        self.link(PostponedIntegrationFactory::new(
            Box::new(FactoryBox::new(factory)),
            Some(Box::new(action)),
        ))
    }

    /// Adds a leaf or plain link attached to the previous link with [`Append`].
    pub fn with_default<F>(self, factory: F) -> CompleteFactoryAssembly<H, C, F::View>
    where
        F: Factory<H, Context = C> + 'static,
    {
        self.with(factory, Append)
    }

    /// Adds a container link attached to the previous link with [`Append`].
    pub fn with_container_default<F>(self, factory: F) -> CompleteFactoryAssembly<H, C, F::View>
    where
        F: ContainerFactory<H, Context = C> + 'static,
    {
        self.with_container(factory, Append)
    }

    /// Adds a preset child to the pending link, attached with `action`.
    ///
    /// The preset is built whenever the pending link is, and integrated into
    /// it before any later link. It has no finder and no tasks. Without a
    /// pending link the preset is dropped.
    #[must_use]
    pub fn with_preset<F>(mut self, factory: F, action: impl ContainerAction<H> + 'static) -> Self
    where
        F: Factory<H, Context = C> + 'static,
    {
        match &mut self.pending {
            Some(link) => link.add_preset(PostponedIntegrationFactory::new(
                Box::new(FactoryBox::new(factory)),
                Some(Box::new(action)),
            )),
            None => tracing::warn!(
                preset = type_name::<F>(),
                "preset added before any factory; ignored"
            ),
        }
        self
    }

    /// Adds a container link attached to the previous link with `action`.
    pub fn with_container<F>(
        self,
        factory: F,
        action: impl ContainerAction<H> + 'static,
    ) -> CompleteFactoryAssembly<H, C, F::View>
    where
        F: ContainerFactory<H, Context = C> + 'static,
    {
        self.link(PostponedIntegrationFactory::new(
            Box::new(ContainerFactoryBox::new(factory)),
            Some(Box::new(action)),
        ))
    }

    /// Adds a context task to the pending link.
    ///
    /// Without a pending link the task is dropped.
    #[must_use]
    pub fn adding<T>(mut self, task: T) -> Self
    where
        T: ContextTask<View = V, Context = C> + 'static,
    {
        match &mut self.pending {
            Some(link) => link.add_task(Box::new(ContextTaskBox::new(task))),
            None => tracing::warn!(
                task = type_name::<T>(),
                "context task added before any factory; ignored"
            ),
        }
        self
    }

    /// Lets the router reuse an existing node for the pending link.
    ///
    /// Without a pending link the finder is dropped.
    #[must_use]
    pub fn found_by<F>(mut self, finder: F) -> Self
    where
        F: Finder<H, View = V, Context = C> + 'static,
    {
        match &mut self.pending {
            Some(link) => link.finder = Some(Box::new(finder)),
            None => tracing::warn!(
                finder = type_name::<F>(),
                "finder added before any factory; ignored"
            ),
        }
        self
    }

    /// Finishes the chain.
    pub fn assemble(mut self) -> CompleteFactory<H, C> {
        self.links.extend(self.pending.take());
        CompleteFactory { links: self.links }
    }

    fn link<W>(
        mut self,
        mut next: PostponedIntegrationFactory<H, C>,
    ) -> CompleteFactoryAssembly<H, C, W> {
        if let Some(previous) = self.pending.take() {
            self.links.push(previous);
        } else if self.links.is_empty() && next.action.take().is_some() {
            tracing::warn!(
                factory = next.factory.name(),
                "root link has no parent; its action is ignored"
            );
        }
        CompleteFactoryAssembly {
            links: self.links,
            pending: Some(next),
            _view: PhantomData,
        }
    }
}

/// Nodes built by a [`CompleteFactory`], root first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Built<N> {
    nodes: Vec<N>,
}

impl<N: Copy> Built<N> {
    /// The chain's root node.
    pub fn root(&self) -> N {
        self.nodes[0]
    }

    /// The chain's leaf node.
    pub fn leaf(&self) -> N {
        self.nodes[self.nodes.len() - 1]
    }

    /// All nodes, root first.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }
}

/// An assembled destination: an ordered chain of links.
pub struct CompleteFactory<H: ViewHierarchy, C> {
    links: Vec<PostponedIntegrationFactory<H, C>>,
}

impl<H: ViewHierarchy, C> fmt::Debug for CompleteFactory<H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompleteFactory")
            .field("links", &self.links)
            .finish()
    }
}

impl<H: ViewHierarchy + 'static, C> CompleteFactory<H, C> {
    /// Number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the chain has no links.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The links, root first.
    pub fn links(&self) -> &[PostponedIntegrationFactory<H, C>] {
        &self.links
    }

    /// Builds and integrates the whole chain. An empty chain builds nothing.
    ///
    /// The result is detached: its root belongs to no container yet.
    pub fn build(
        &self,
        host: &mut H,
        adapters: &ContainerAdapterLocator<H>,
        context: &C,
    ) -> RoutingResult<Option<Built<H::Node>>> {
        if self.links.is_empty() {
            return Ok(None);
        }
        let nodes = self.build_from(0, host, adapters, context)?;
        Ok(Some(Built { nodes }))
    }

    /// Builds and integrates `links[from..]`, returning the link nodes root
    /// first. Preset children are built and integrated but not returned.
    pub(crate) fn build_from(
        &self,
        from: usize,
        host: &mut H,
        adapters: &ContainerAdapterLocator<H>,
        context: &C,
    ) -> RoutingResult<Vec<H::Node>> {
        let links = &self.links[from..];
        let mut nodes = Vec::with_capacity(links.len());
        let mut presets = Vec::with_capacity(links.len());
        for (offset, link) in links.iter().enumerate() {
            let index = from + offset;
            nodes.push(link.build(host, context, index)?);
            let mut built = Vec::with_capacity(link.presets.len());
            for preset in &link.presets {
                built.push(preset.build(host, context, index)?);
            }
            presets.push(built);
        }

        for (offset, link) in links.iter().enumerate() {
            let index = from + offset;
            let mut children: Vec<(H::Node, &dyn ContainerAction<H>)> =
                Vec::with_capacity(link.presets.len() + 1);
            for (preset, &node) in link.presets.iter().zip(&presets[offset]) {
                children.push((node, preset.integration_action(index)?));
            }
            if let Some(next) = links.get(offset + 1) {
                children.push((nodes[offset + 1], next.integration_action(index)?));
            }
            if children.is_empty() {
                continue;
            }
            let container = nodes[offset];
            link.factory.integrate(host, adapters, container, &children)?;
            tracing::debug!(
                index,
                ?container,
                children = children.len(),
                into = link.factory.name(),
                "integrated"
            );
        }
        Ok(nodes)
    }
}
