//! Typed bump region with checkpoint/rollback.
//!
//! A [`Region`] hands out [`Handle`]s in allocation order. Storage is
//! committed one page at a time up to a fixed reservation; running past the
//! reservation is a configuration error and aborts the process.
//!
//! ```text
//!   reserved ─────────────────────────────────────────────┐
//!   committed ────────────────────┐                       │
//!   len ──────────┐               │                       │
//!   [ live items  | spare (page)  | not yet committed     ]
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Items committed per growth step.
pub const PAGE_ITEMS: usize = 512;

/// Spare committed capacity tolerated after a rollback before it is returned.
pub const DECOMMIT_SLACK: usize = 64 * PAGE_ITEMS;

/// Default reservation, in items.
pub const DEFAULT_RESERVE: usize = 1 << 24;

/// Index of an item inside a [`Region`].
pub struct Handle<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: usize) -> Self {
        Self {
            index: index as u32,
            _marker: PhantomData,
        }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

// Manual impls: deriving would demand the same bounds from `T`.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// A recorded allocation offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

/// Usage snapshot of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionStats {
    pub len: usize,
    pub committed: usize,
    pub reserved: usize,
}

/// Bump allocator over a growable, page-committed buffer.
pub struct Region<T> {
    items: Vec<T>,
    reserved: usize,
}

impl<T> Region<T> {
    pub fn new() -> Self {
        Self::with_reserve(DEFAULT_RESERVE)
    }

    /// A region that may never hold more than `reserved` items.
    pub fn with_reserve(reserved: usize) -> Self {
        Self {
            items: Vec::new(),
            reserved: reserved.min(u32::MAX as usize),
        }
    }

    /// Bump-allocate `value` and return its handle.
    ///
    /// Aborts the process when the reservation is exhausted.
    pub fn alloc(&mut self, value: T) -> Handle<T> {
        let index = self.items.len();
        if index >= self.reserved {
            exhausted(self.reserved);
        }
        if index == self.items.capacity() {
            // Double, rounded to whole pages, never past the reservation.
            let grow = index.max(PAGE_ITEMS).div_ceil(PAGE_ITEMS) * PAGE_ITEMS;
            self.items.reserve_exact(grow.min(self.reserved - index));
        }
        self.items.push(value);
        Handle::new(index)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get(handle.index())
    }

    /// Record the current offset.
    pub fn checkpoint(&self) -> Mark {
        Mark(self.items.len())
    }

    /// Drop everything allocated since `mark`.
    ///
    /// Handles issued after `mark` become dangling and must not be used
    /// again. A mark past the current offset is ignored.
    pub fn rollback(&mut self, mark: Mark) {
        if mark.0 >= self.items.len() {
            return;
        }
        self.items.truncate(mark.0);
        self.decommit();
    }

    /// Free every item and all committed storage.
    pub fn release(&mut self) {
        self.items = Vec::new();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn committed(&self) -> usize {
        self.items.capacity()
    }

    pub fn reserved(&self) -> usize {
        self.reserved
    }

    pub fn stats(&self) -> RegionStats {
        RegionStats {
            len: self.len(),
            committed: self.committed(),
            reserved: self.reserved,
        }
    }

    /// Everything allocated since `mark`, in allocation order.
    pub fn since(&self, mark: Mark) -> &[T] {
        self.items.get(mark.0..).unwrap_or(&[])
    }

    fn decommit(&mut self) {
        let keep = self.items.len().div_ceil(PAGE_ITEMS).max(1) * PAGE_ITEMS;
        if self.items.capacity().saturating_sub(keep) >= DECOMMIT_SLACK {
            tracing::debug!(
                committed = self.items.capacity(),
                keep,
                "region: decommitting trailing pages"
            );
            self.items.shrink_to(keep);
        }
    }
}

impl<T> Default for Region<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Region<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("len", &self.items.len())
            .field("committed", &self.items.capacity())
            .field("reserved", &self.reserved)
            .finish()
    }
}

impl<T> Index<Handle<T>> for Region<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        &self.items[handle.index()]
    }
}

impl<T> IndexMut<Handle<T>> for Region<T> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        &mut self.items[handle.index()]
    }
}

#[cold]
fn exhausted(reserved: usize) -> ! {
    tracing::error!(reserved, "region: reserved capacity exhausted");
    eprintln!("fatal: region exhausted its reserved capacity of {reserved} items");
    std::process::abort()
}
