// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locating an existing, typed node that satisfies a context.
//!
//! [`Finder`] is the contract the router uses to decide whether part of a
//! destination already exists. Most finders are [`StackIteratingFinder`]s: a
//! [`StackIterator`] plus a typed test, which get [`Finder`] for free.

use core::any::{Any, type_name};
use core::fmt;
use core::marker::PhantomData;

use crate::error::{RoutingError, RoutingResult};
use crate::hierarchy::{ContextChecking, ViewHierarchy};
use crate::iterator::{SearchOptions, StackIterator, StackPath, StartingPoint};
use crate::locator::ContainerAdapterLocator;

/// Finds a live node of type [`View`](Finder::View) for a context.
pub trait Finder<H: ViewHierarchy> {
    /// The view type of matching nodes.
    type View: Any;
    /// The context matches are tested against.
    type Context;

    /// Returns the path to the first match, or `Ok(None)`.
    fn find_path(
        &self,
        host: &H,
        adapters: &ContainerAdapterLocator<H>,
        context: &Self::Context,
    ) -> RoutingResult<Option<StackPath<H::Node>>>;

    /// Returns the first matching node, or `Ok(None)`.
    fn find(
        &self,
        host: &H,
        adapters: &ContainerAdapterLocator<H>,
        context: &Self::Context,
    ) -> RoutingResult<Option<H::Node>> {
        Ok(self
            .find_path(host, adapters, context)?
            .map(|path| path.target()))
    }

    /// Returns the first matching node together with its view.
    fn find_view<'a>(
        &self,
        host: &'a H,
        adapters: &ContainerAdapterLocator<H>,
        context: &Self::Context,
    ) -> RoutingResult<Option<(H::Node, &'a Self::View)>> {
        let Some(node) = self.find(host, adapters, context)? else {
            return Ok(None);
        };
        let view = host
            .view(node)
            .and_then(|v| v.downcast_ref::<Self::View>())
            .ok_or(RoutingError::TypeMismatch {
                expected: type_name::<Self::View>(),
            })?;
        Ok(Some((node, view)))
    }
}

/// A finder built from a [`StackIterator`] and a typed test.
///
/// Nodes whose view is not a [`View`](StackIteratingFinder::View) never match.
pub trait StackIteratingFinder<H: ViewHierarchy> {
    /// The view type of matching nodes.
    type View: Any;
    /// The context matches are tested against.
    type Context;

    /// The search to run.
    fn iterator(&self) -> &StackIterator<H>;

    /// Returns `true` if `view` is the one wanted for `context`.
    fn is_target(&self, view: &Self::View, context: &Self::Context) -> bool;
}

impl<H, F> Finder<H> for F
where
    H: ViewHierarchy + 'static,
    F: StackIteratingFinder<H>,
{
    type View = F::View;
    type Context = F::Context;

    fn find_path(
        &self,
        host: &H,
        adapters: &ContainerAdapterLocator<H>,
        context: &Self::Context,
    ) -> RoutingResult<Option<StackPath<H::Node>>> {
        let path = self.iterator().first_path(host, adapters, |host, node| {
            host.view(node)
                .and_then(|v| v.downcast_ref::<F::View>())
                .is_some_and(|view| self.is_target(view, context))
        })?;
        let Some(path) = path else {
            return Ok(None);
        };
        // `view` is host code; the match is checked again before it is handed out.
        let typed = host
            .view(path.target())
            .is_some_and(|v| v.is::<F::View>());
        if !typed {
            return Err(RoutingError::TypeMismatch {
                expected: type_name::<F::View>(),
            });
        }
        tracing::debug!(node = ?path.target(), view = type_name::<F::View>(), "found");
        Ok(Some(path))
    }
}

/// Matches any live node whose view is a `V`.
pub struct ClassFinder<H: ViewHierarchy, V, C = ()> {
    iterator: StackIterator<H>,
    _marker: PhantomData<fn(&C) -> V>,
}

impl<H: ViewHierarchy, V, C> fmt::Debug for ClassFinder<H, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassFinder")
            .field("view", &type_name::<V>())
            .field("iterator", &self.iterator)
            .finish()
    }
}

impl<H: ViewHierarchy, V, C> Default for ClassFinder<H, V, C> {
    fn default() -> Self {
        Self {
            iterator: StackIterator::default(),
            _marker: PhantomData,
        }
    }
}

impl<H: ViewHierarchy + 'static, V, C> ClassFinder<H, V, C> {
    /// Creates a finder searching with `options` from `starting_point`.
    pub fn new(options: SearchOptions, starting_point: StartingPoint<H>) -> Self {
        Self {
            iterator: StackIterator::new(options, starting_point),
            _marker: PhantomData,
        }
    }
}

impl<H: ViewHierarchy + 'static, V: Any, C> StackIteratingFinder<H> for ClassFinder<H, V, C> {
    type View = V;
    type Context = C;

    fn iterator(&self) -> &StackIterator<H> {
        &self.iterator
    }

    fn is_target(&self, _: &V, _: &C) -> bool {
        true
    }
}

/// Matches live `V` views that accept the context through [`ContextChecking`].
pub struct ClassWithContextFinder<H: ViewHierarchy, V, C> {
    iterator: StackIterator<H>,
    _marker: PhantomData<fn(&C) -> V>,
}

impl<H: ViewHierarchy, V, C> fmt::Debug for ClassWithContextFinder<H, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassWithContextFinder")
            .field("view", &type_name::<V>())
            .field("context", &type_name::<C>())
            .field("iterator", &self.iterator)
            .finish()
    }
}

impl<H: ViewHierarchy, V, C> Default for ClassWithContextFinder<H, V, C> {
    fn default() -> Self {
        Self {
            iterator: StackIterator::default(),
            _marker: PhantomData,
        }
    }
}

impl<H: ViewHierarchy + 'static, V, C> ClassWithContextFinder<H, V, C> {
    /// Creates a finder searching with `options` from `starting_point`.
    pub fn new(options: SearchOptions, starting_point: StartingPoint<H>) -> Self {
        Self {
            iterator: StackIterator::new(options, starting_point),
            _marker: PhantomData,
        }
    }
}

impl<H, V, C> StackIteratingFinder<H> for ClassWithContextFinder<H, V, C>
where
    H: ViewHierarchy + 'static,
    V: ContextChecking<C> + Any,
{
    type View = V;
    type Context = C;

    fn iterator(&self) -> &StackIterator<H> {
        &self.iterator
    }

    fn is_target(&self, view: &V, context: &C) -> bool {
        ContextChecking::is_target(view, context)
    }
}
