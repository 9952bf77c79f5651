// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for stack-like containers: only the topmost child is visible.

use alloc::format;
use alloc::vec::Vec;
use core::any::type_name;
use core::fmt;
use core::marker::PhantomData;

use crate::adapters::{Children, ContainerAdapter};
use crate::container::StackContainer;
use crate::error::{RoutingError, RoutingResult};
use crate::hierarchy::ViewHierarchy;

/// [`ContainerAdapter`] for a view of type `V` implementing [`StackContainer`].
pub struct StackAdapter<H: ViewHierarchy, V> {
    container: H::Node,
    _view: PhantomData<fn(&H) -> V>,
}

impl<H: ViewHierarchy, V> fmt::Debug for StackAdapter<H, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackAdapter")
            .field("container", &self.container)
            .field("view", &type_name::<V>())
            .finish()
    }
}

impl<H, V> StackAdapter<H, V>
where
    H: ViewHierarchy,
    V: StackContainer<H::Node>,
{
    /// Binds an adapter to `container`.
    pub fn new(container: H::Node) -> Self {
        Self {
            container,
            _view: PhantomData,
        }
    }

    fn stack<'a>(&self, host: &'a H) -> Option<&'a V> {
        host.view(self.container)?.downcast_ref()
    }

    fn stack_mut<'a>(&self, host: &'a mut H) -> RoutingResult<&'a mut V> {
        host.view_mut(self.container)
            .and_then(|v| v.downcast_mut())
            .ok_or_else(|| RoutingError::deallocated(type_name::<V>()))
    }
}

impl<H, V> ContainerAdapter<H> for StackAdapter<H, V>
where
    H: ViewHierarchy,
    V: StackContainer<H::Node>,
{
    fn container(&self) -> H::Node {
        self.container
    }

    fn contained_children(&self, host: &H) -> Children<H::Node> {
        self.stack(host)
            .map(|s| s.children().iter().copied().collect())
            .unwrap_or_default()
    }

    fn visible_children(&self, host: &H) -> Children<H::Node> {
        self.stack(host)
            .and_then(|s| s.children().last().copied())
            .into_iter()
            .collect()
    }

    /// Pops every child above `child`.
    fn make_visible(&self, host: &mut H, child: H::Node, animated: bool) -> RoutingResult {
        let stack = self.stack_mut(host)?;
        let children = stack.children();
        if children.last() == Some(&child) {
            return Ok(());
        }
        let Some(pos) = children.iter().position(|&c| c == child) else {
            return Err(RoutingError::composition(format!(
                "{} does not contain {child:?}",
                type_name::<V>()
            )));
        };
        let kept: Vec<_> = children[..=pos].to_vec();
        stack.set_children(kept, animated);
        Ok(())
    }

    fn set_contained_children(
        &self,
        host: &mut H,
        children: Vec<H::Node>,
        animated: bool,
    ) -> RoutingResult {
        self.stack_mut(host)?.set_children(children, animated);
        Ok(())
    }
}
