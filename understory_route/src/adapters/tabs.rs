// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for tab-like containers: only the selected child is visible.

use alloc::format;
use alloc::vec::Vec;
use core::any::type_name;
use core::fmt;
use core::marker::PhantomData;

use crate::adapters::{Children, ContainerAdapter};
use crate::container::TabContainer;
use crate::error::{RoutingError, RoutingResult};
use crate::hierarchy::ViewHierarchy;

/// [`ContainerAdapter`] for a view of type `V` implementing [`TabContainer`].
pub struct TabAdapter<H: ViewHierarchy, V> {
    container: H::Node,
    _view: PhantomData<fn(&H) -> V>,
}

impl<H: ViewHierarchy, V> fmt::Debug for TabAdapter<H, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabAdapter")
            .field("container", &self.container)
            .field("view", &type_name::<V>())
            .finish()
    }
}

impl<H, V> TabAdapter<H, V>
where
    H: ViewHierarchy,
    V: TabContainer<H::Node>,
{
    /// Binds an adapter to `container`.
    pub fn new(container: H::Node) -> Self {
        Self {
            container,
            _view: PhantomData,
        }
    }

    fn tabs<'a>(&self, host: &'a H) -> Option<&'a V> {
        host.view(self.container)?.downcast_ref()
    }

    fn tabs_mut<'a>(&self, host: &'a mut H) -> RoutingResult<&'a mut V> {
        host.view_mut(self.container)
            .and_then(|v| v.downcast_mut())
            .ok_or_else(|| RoutingError::deallocated(type_name::<V>()))
    }
}

impl<H, V> ContainerAdapter<H> for TabAdapter<H, V>
where
    H: ViewHierarchy,
    V: TabContainer<H::Node>,
{
    fn container(&self) -> H::Node {
        self.container
    }

    fn contained_children(&self, host: &H) -> Children<H::Node> {
        self.tabs(host)
            .map(|t| t.children().iter().copied().collect())
            .unwrap_or_default()
    }

    fn visible_children(&self, host: &H) -> Children<H::Node> {
        self.tabs(host)
            .and_then(|t| t.selected())
            .into_iter()
            .collect()
    }

    fn make_visible(&self, host: &mut H, child: H::Node, _animated: bool) -> RoutingResult {
        let tabs = self.tabs_mut(host)?;
        if tabs.selected() == Some(child) {
            return Ok(());
        }
        if !tabs.select(child) {
            return Err(RoutingError::composition(format!(
                "{} does not contain {child:?}",
                type_name::<V>()
            )));
        }
        Ok(())
    }

    fn set_contained_children(
        &self,
        host: &mut H,
        children: Vec<H::Node>,
        animated: bool,
    ) -> RoutingResult {
        self.tabs_mut(host)?.set_children(children, animated);
        Ok(())
    }
}
