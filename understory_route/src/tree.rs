// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An arena-backed [`ViewHierarchy`] for headless hosts and tests.
//!
//! Views are stored type-erased in generational slots. Containment lives in
//! the container views themselves (see [`crate::container`]); the tree only
//! tracks the root and the overlay links between views.

use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use core::any::{Any, type_name};
use core::fmt;

use crate::error::{RoutingError, RoutingResult};
use crate::hierarchy::ViewHierarchy;

/// Identifier for a view in a [`ViewTree`].
///
/// A slot index plus a generation counter. Removing a view frees its slot;
/// reusing the slot bumps the generation, so a stale `ViewId` never resolves
/// to a newer view. A slot whose generation is exhausted is never reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ViewId(u32, u32);

impl ViewId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

struct Slot {
    generation: u32,
    view: Box<dyn Any>,
    presented: Option<ViewId>,
    presenting: Option<ViewId>,
}

/// Arena of type-erased views with a root and overlay links.
#[derive(Default)]
pub struct ViewTree {
    slots: Vec<Option<Slot>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// slots whose generation reached `u32::MAX`
    retired: usize,
    root: Option<ViewId>,
}

impl fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewTree")
            .field("len", &self.len())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl ViewTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len() - self.retired
    }

    /// Returns `true` if no view is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a detached view.
    pub fn insert<V: Any>(&mut self, view: V) -> ViewId {
        self.insert_boxed(Box::new(view))
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "ViewId stores 32-bit slot indices."
    )]
    fn insert_boxed(&mut self, view: Box<dyn Any>) -> ViewId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            // Retired slots never reach the free list, so this cannot overflow.
            let generation = self.generations[idx] + 1;
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.slots.push(None);
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        self.slots[idx] = Some(Slot {
            generation,
            view,
            presented: None,
            presenting: None,
        });
        ViewId(idx as u32, generation)
    }

    /// Removes a view. Returns `false` if `id` was already stale.
    ///
    /// Overlay links to and from the view are cleared. Containers that still
    /// list the view keep a stale handle, which searches skip.
    pub fn remove(&mut self, id: ViewId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        let (presented, presenting) = (slot.presented, slot.presenting);
        if let Some(p) = presented.and_then(|p| self.slot_mut(p)) {
            p.presenting = None;
        }
        if let Some(p) = presenting.and_then(|p| self.slot_mut(p)) {
            p.presented = None;
        }
        if self.root == Some(id) {
            self.root = None;
        }
        self.slots[id.idx()] = None;
        if id.1 == u32::MAX {
            self.retired += 1;
        } else {
            self.free_list.push(id.idx());
        }
        true
    }

    /// Returns `true` if `id` refers to a live view.
    #[must_use]
    pub fn is_alive(&self, id: ViewId) -> bool {
        self.slot(id).is_some()
    }

    /// Makes `id` the window root. Stale ids clear the root.
    pub fn set_root(&mut self, id: ViewId) {
        self.root = self.is_alive(id).then_some(id);
    }

    /// Typed access to a live view.
    #[must_use]
    pub fn get<V: Any>(&self, id: ViewId) -> Option<&V> {
        self.slot(id).and_then(|s| s.view.downcast_ref())
    }

    /// Typed mutable access to a live view.
    pub fn get_mut<V: Any>(&mut self, id: ViewId) -> Option<&mut V> {
        self.slot_mut(id).and_then(|s| s.view.downcast_mut())
    }

    /// Removes the overlay on top of `over`, returning it.
    pub fn dismiss(&mut self, over: ViewId) -> Option<ViewId> {
        let presented = self.slot_mut(over)?.presented.take()?;
        if let Some(slot) = self.slot_mut(presented) {
            slot.presenting = None;
        }
        Some(presented)
    }

    fn slot(&self, id: ViewId) -> Option<&Slot> {
        self.slots
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|s| s.generation == id.1)
    }

    fn slot_mut(&mut self, id: ViewId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|s| s.generation == id.1)
    }
}

impl ViewHierarchy for ViewTree {
    type Node = ViewId;

    fn root(&self) -> Option<ViewId> {
        self.root.filter(|&r| self.is_alive(r))
    }

    fn view(&self, node: ViewId) -> Option<&dyn Any> {
        self.slot(node).map(|s| &*s.view)
    }

    fn view_mut(&mut self, node: ViewId) -> Option<&mut dyn Any> {
        self.slot_mut(node).map(|s| &mut *s.view)
    }

    fn is_alive(&self, node: ViewId) -> bool {
        Self::is_alive(self, node)
    }

    fn insert_view(&mut self, view: Box<dyn Any>) -> ViewId {
        self.insert_boxed(view)
    }

    fn presented(&self, node: ViewId) -> Option<ViewId> {
        self.slot(node)?.presented.filter(|&p| self.is_alive(p))
    }

    fn presenting(&self, node: ViewId) -> Option<ViewId> {
        self.slot(node)?.presenting.filter(|&p| self.is_alive(p))
    }

    fn present(&mut self, over: ViewId, node: ViewId, _animated: bool) -> RoutingResult {
        if !self.is_alive(over) {
            return Err(RoutingError::deallocated(type_name::<Self>()));
        }
        if !self.is_alive(node) {
            return Err(RoutingError::composition(format!(
                "{node:?} has been deallocated"
            )));
        }
        if let Some(existing) = ViewHierarchy::presented(self, over) {
            return Err(RoutingError::composition(format!(
                "{over:?} is already presenting {existing:?}"
            )));
        }
        if let Some(slot) = self.slot_mut(over) {
            slot.presented = Some(node);
        }
        if let Some(slot) = self.slot_mut(node) {
            slot.presenting = Some(over);
        }
        Ok(())
    }
}
