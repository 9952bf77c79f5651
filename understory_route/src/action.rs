// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strategies for attaching a child to a container.
//!
//! A [`ContainerAction`] knows how to attach, not what it attaches to: the
//! container is reached through whatever adapter the locator finds for it.
//! Actions attach either into a live container ([`perform`]) or into a child
//! list that is installed later in one step ([`embed`]).
//!
//! [`perform`]: ContainerAction::perform
//! [`embed`]: ContainerAction::embed

use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;

use crate::adapters::ContainerAdapter;
use crate::error::{RoutingError, RoutingResult};
use crate::hierarchy::ViewHierarchy;
use crate::locator::ContainerAdapterLocator;

/// Children collected for a container before it is populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingChildren<N> {
    /// The child list, in presentation order.
    pub children: Vec<N>,
    /// Child to make visible once the list is installed.
    pub visible: Option<N>,
}

impl<N> Default for PendingChildren<N> {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            visible: None,
        }
    }
}

/// How a child is attached to a container.
pub trait ContainerAction<H: ViewHierarchy> {
    /// Attaches `child` to the live `container`.
    fn perform(
        &self,
        host: &mut H,
        adapters: &ContainerAdapterLocator<H>,
        child: H::Node,
        container: H::Node,
        animated: bool,
    ) -> RoutingResult;

    /// Attaches `child` to a list that is installed later.
    ///
    /// The default appends.
    fn embed(&self, child: H::Node, pending: &mut PendingChildren<H::Node>) -> RoutingResult {
        pending.children.push(child);
        Ok(())
    }
}

fn adapter_for<H: ViewHierarchy + 'static>(
    host: &H,
    adapters: &ContainerAdapterLocator<H>,
    container: H::Node,
) -> RoutingResult<Box<dyn ContainerAdapter<H>>> {
    if !host.is_alive(container) {
        return Err(RoutingError::deallocated(&format!("{container:?}")));
    }
    adapters
        .locate(host, container)
        .ok_or_else(|| RoutingError::composition(format!("{container:?} is not a container")))
}

fn appended<N: PartialEq>(mut children: Vec<N>, child: N) -> Vec<N> {
    if !children.contains(&child) {
        children.push(child);
    }
    children
}

/// Adds the child after the existing ones. Pushes onto stacks, adds a tab.
#[derive(Copy, Clone, Debug, Default)]
pub struct Append;

impl<H: ViewHierarchy + 'static> ContainerAction<H> for Append {
    fn perform(
        &self,
        host: &mut H,
        adapters: &ContainerAdapterLocator<H>,
        child: H::Node,
        container: H::Node,
        animated: bool,
    ) -> RoutingResult {
        let adapter = adapter_for(host, adapters, container)?;
        let children = adapter.contained_children(host).into_vec();
        adapter.set_contained_children(host, appended(children, child), animated)
    }
}

/// Makes the child the only one.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReplaceAll;

impl<H: ViewHierarchy + 'static> ContainerAction<H> for ReplaceAll {
    fn perform(
        &self,
        host: &mut H,
        adapters: &ContainerAdapterLocator<H>,
        child: H::Node,
        container: H::Node,
        animated: bool,
    ) -> RoutingResult {
        let adapter = adapter_for(host, adapters, container)?;
        adapter.set_contained_children(host, alloc::vec![child], animated)
    }

    fn embed(&self, child: H::Node, pending: &mut PendingChildren<H::Node>) -> RoutingResult {
        pending.children.clear();
        pending.children.push(child);
        pending.visible = None;
        Ok(())
    }
}

/// Adds the child if absent, then makes it visible. Selects a tab.
#[derive(Copy, Clone, Debug, Default)]
pub struct Select;

impl<H: ViewHierarchy + 'static> ContainerAction<H> for Select {
    fn perform(
        &self,
        host: &mut H,
        adapters: &ContainerAdapterLocator<H>,
        child: H::Node,
        container: H::Node,
        animated: bool,
    ) -> RoutingResult {
        let adapter = adapter_for(host, adapters, container)?;
        if !adapter.contains(host, child) {
            let children = adapter.contained_children(host).into_vec();
            adapter.set_contained_children(host, appended(children, child), animated)?;
        }
        adapter.make_visible(host, child, animated)
    }

    fn embed(&self, child: H::Node, pending: &mut PendingChildren<H::Node>) -> RoutingResult {
        if !pending.children.contains(&child) {
            pending.children.push(child);
        }
        pending.visible = Some(child);
        Ok(())
    }
}

/// Overlays the child on top of the container through the host.
///
/// The "container" may be any node, leaf or not.
#[derive(Copy, Clone, Debug, Default)]
pub struct Present;

impl<H: ViewHierarchy> ContainerAction<H> for Present {
    fn perform(
        &self,
        host: &mut H,
        _: &ContainerAdapterLocator<H>,
        child: H::Node,
        container: H::Node,
        animated: bool,
    ) -> RoutingResult {
        host.present(container, child, animated)
    }

    fn embed(&self, child: H::Node, _: &mut PendingChildren<H::Node>) -> RoutingResult {
        Err(RoutingError::composition(format!(
            "{child:?} must be presented, not embedded"
        )))
    }
}
