// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Producing new views, and configuring them once produced.
//!
//! - [`Factory`] builds a detached node from a context.
//! - [`ContainerFactory`] builds a container and wires children into it.
//! - [`ContextTask`] adjusts a freshly built view for the context.
//!
//! [`ViewFactory`], [`StackFactory`] and [`TabsFactory`] cover the common
//! cases; [`TaskFn`] turns a closure into a task.

use alloc::boxed::Box;
use alloc::format;
use core::any::{Any, type_name};
use core::fmt;
use core::marker::PhantomData;

use crate::action::{ContainerAction, PendingChildren};
use crate::container::{Stack, Tabs};
use crate::error::{FactoryError, RoutingError, RoutingResult};
use crate::hierarchy::ViewHierarchy;
use crate::locator::ContainerAdapterLocator;

/// Builds one new node for a context.
///
/// The node is detached when returned; attaching it is the job of a
/// [`ContainerAction`] or the presentation layer.
pub trait Factory<H: ViewHierarchy> {
    /// Type of the built view.
    type View: Any;
    /// Context the view is built for.
    type Context;

    /// Builds the node.
    fn build(&self, host: &mut H, context: &Self::Context) -> Result<H::Node, FactoryError>;
}

/// A [`Factory`] whose node hosts the nodes built after it.
pub trait ContainerFactory<H: ViewHierarchy>: Factory<H> {
    /// Attaches built `children` to `container`, each with its action.
    ///
    /// `children` holds the link's preset children in the order they were
    /// added, followed by the next link's node when there is one.
    ///
    /// The default performs each action against the live container, in
    /// order. Containers that must receive their whole child list at once
    /// override this and use [`ContainerAction::embed`].
    fn integrate(
        &self,
        host: &mut H,
        adapters: &ContainerAdapterLocator<H>,
        container: H::Node,
        children: &[(H::Node, &dyn ContainerAction<H>)],
    ) -> RoutingResult<H::Node> {
        for &(child, action) in children {
            action.perform(host, adapters, child, container, false)?;
        }
        Ok(container)
    }
}

/// Post-construction configuration of a built view.
///
/// Runs once, right after the view is built and before it is attached.
pub trait ContextTask {
    /// Type of view the task configures.
    type View: Any;
    /// Context the task reads.
    type Context;

    /// Configures `view` for `context`.
    fn perform(&self, view: &mut Self::View, context: &Self::Context) -> Result<(), FactoryError>;
}

/// Leaf factory from a closure producing a view value.
pub struct ViewFactory<V, C, F> {
    make: F,
    _marker: PhantomData<fn(&C) -> V>,
}

impl<V, C, F> fmt::Debug for ViewFactory<V, C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewFactory")
            .field("view", &type_name::<V>())
            .finish_non_exhaustive()
    }
}

impl<V, C, F> ViewFactory<V, C, F>
where
    V: Any,
    F: Fn(&C) -> Result<V, FactoryError>,
{
    /// Wraps `make`.
    pub fn new(make: F) -> Self {
        Self {
            make,
            _marker: PhantomData,
        }
    }
}

impl<H, V, C, F> Factory<H> for ViewFactory<V, C, F>
where
    H: ViewHierarchy,
    V: Any,
    F: Fn(&C) -> Result<V, FactoryError>,
{
    type View = V;
    type Context = C;

    fn build(&self, host: &mut H, context: &C) -> Result<H::Node, FactoryError> {
        let view = (self.make)(context)?;
        Ok(host.insert_view(Box::new(view)))
    }
}

/// Builds an empty [`Stack`]; children attach one by one.
pub struct StackFactory<C = ()> {
    _marker: PhantomData<fn(&C)>,
}

impl<C> fmt::Debug for StackFactory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StackFactory")
    }
}

impl<C> Default for StackFactory<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> StackFactory<C> {
    /// Creates the factory.
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<H: ViewHierarchy, C> Factory<H> for StackFactory<C> {
    type View = Stack<H::Node>;
    type Context = C;

    fn build(&self, host: &mut H, _: &C) -> Result<H::Node, FactoryError> {
        Ok(host.insert_view(Box::new(Stack::<H::Node>::new())))
    }
}

impl<H: ViewHierarchy, C> ContainerFactory<H> for StackFactory<C> {}

/// Builds an empty [`Tabs`] and installs all of its children at once.
pub struct TabsFactory<C = ()> {
    _marker: PhantomData<fn(&C)>,
}

impl<C> fmt::Debug for TabsFactory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TabsFactory")
    }
}

impl<C> Default for TabsFactory<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TabsFactory<C> {
    /// Creates the factory.
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<H: ViewHierarchy, C> Factory<H> for TabsFactory<C> {
    type View = Tabs<H::Node>;
    type Context = C;

    fn build(&self, host: &mut H, _: &C) -> Result<H::Node, FactoryError> {
        Ok(host.insert_view(Box::new(Tabs::<H::Node>::new())))
    }
}

impl<H: ViewHierarchy + 'static, C> ContainerFactory<H> for TabsFactory<C> {
    fn integrate(
        &self,
        host: &mut H,
        adapters: &ContainerAdapterLocator<H>,
        container: H::Node,
        children: &[(H::Node, &dyn ContainerAction<H>)],
    ) -> RoutingResult<H::Node> {
        let mut pending = PendingChildren::default();
        for &(child, action) in children {
            action.embed(child, &mut pending)?;
        }
        if !host.is_alive(container) {
            return Err(RoutingError::deallocated(type_name::<Tabs<H::Node>>()));
        }
        let adapter = adapters.locate(host, container).ok_or_else(|| {
            RoutingError::composition(format!("{container:?} is not a container"))
        })?;
        adapter.set_contained_children(host, pending.children, false)?;
        if let Some(visible) = pending.visible {
            adapter.make_visible(host, visible, false)?;
        }
        Ok(container)
    }
}

/// [`ContextTask`] from a closure.
pub struct TaskFn<V, C, F> {
    task: F,
    _marker: PhantomData<fn(&mut V, &C)>,
}

impl<V, C, F> fmt::Debug for TaskFn<V, C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFn")
            .field("view", &type_name::<V>())
            .finish_non_exhaustive()
    }
}

impl<V, C, F> TaskFn<V, C, F>
where
    V: Any,
    F: Fn(&mut V, &C) -> Result<(), FactoryError>,
{
    /// Wraps `task`.
    pub fn new(task: F) -> Self {
        Self {
            task,
            _marker: PhantomData,
        }
    }
}

impl<V, C, F> ContextTask for TaskFn<V, C, F>
where
    V: Any,
    F: Fn(&mut V, &C) -> Result<(), FactoryError>,
{
    type View = V;
    type Context = C;

    fn perform(&self, view: &mut V, context: &C) -> Result<(), FactoryError> {
        (self.task)(view, context)
    }
}
