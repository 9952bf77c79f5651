// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container capabilities and the two built-in container views.
//!
//! A host's container views implement [`StackContainer`] or [`TabContainer`] so
//! the built-in adapters in [`crate::adapters`] can drive them. [`Stack`] and
//! [`Tabs`] are ready-made implementations for hosts that store plain views,
//! such as [`ViewTree`](crate::tree::ViewTree).

use alloc::vec::Vec;
use core::any::Any;

/// A container showing the last of its children on top.
pub trait StackContainer<N>: Any {
    /// All children, bottom first.
    fn children(&self) -> &[N];

    /// Replaces the whole stack.
    fn set_children(&mut self, children: Vec<N>, animated: bool);
}

/// A container showing exactly one selected child at a time.
pub trait TabContainer<N>: Any {
    /// All children in tab order.
    fn children(&self) -> &[N];

    /// The selected child, if any.
    fn selected(&self) -> Option<N>;

    /// Selects `child`. Returns `false` and leaves the selection untouched if
    /// `child` is not one of [`children`](Self::children).
    fn select(&mut self, child: N) -> bool;

    /// Replaces all children.
    fn set_children(&mut self, children: Vec<N>, animated: bool);
}

/// Navigation-stack style container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack<N> {
    children: Vec<N>,
}

impl<N> Default for Stack<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Stack<N> {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// Creates a stack from children, bottom first.
    pub fn with_children(children: impl IntoIterator<Item = N>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }

    /// The topmost child.
    #[must_use]
    pub fn top(&self) -> Option<&N> {
        self.children.last()
    }

    /// Pushes a child on top.
    pub fn push(&mut self, child: N) {
        self.children.push(child);
    }
}

impl<N: 'static> StackContainer<N> for Stack<N> {
    fn children(&self) -> &[N] {
        &self.children
    }

    fn set_children(&mut self, children: Vec<N>, _animated: bool) {
        self.children = children;
    }
}

/// Tab-bar style container.
///
/// The selection is stored as an index that is always in range, so the
/// selected child is always one of the children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tabs<N> {
    children: Vec<N>,
    selected: Option<usize>,
}

impl<N> Default for Tabs<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Tabs<N> {
    /// Creates a container with no tabs.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            children: Vec::new(),
            selected: None,
        }
    }

    /// Creates a container from tabs; the first one is selected.
    pub fn with_children(children: impl IntoIterator<Item = N>) -> Self {
        let children: Vec<N> = children.into_iter().collect();
        let selected = (!children.is_empty()).then_some(0);
        Self { children, selected }
    }

    /// Index of the selected tab.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }
}

impl<N: Copy + PartialEq + 'static> TabContainer<N> for Tabs<N> {
    fn children(&self) -> &[N] {
        &self.children
    }

    fn selected(&self) -> Option<N> {
        self.selected.map(|i| self.children[i])
    }

    fn select(&mut self, child: N) -> bool {
        match self.children.iter().position(|&c| c == child) {
            Some(i) => {
                self.selected = Some(i);
                true
            }
            None => false,
        }
    }

    /// Keeps the selected child if it survives, otherwise selects the first.
    fn set_children(&mut self, children: Vec<N>, _animated: bool) {
        let previous = self.selected();
        self.selected = previous
            .and_then(|p| children.iter().position(|&c| c == p))
            .or((!children.is_empty()).then_some(0));
        self.children = children;
    }
}
