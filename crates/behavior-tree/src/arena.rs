//! Linear (bump) arena allocator.
//!
//! [`LinearArena`] hands out aligned regions from one buffer that is allocated
//! once, up front. Regions are never freed individually: the only way to
//! reclaim memory is [`LinearArena::clear`], which rewinds the cursor to the
//! start of the buffer in O(1).
//!
//! On top of the raw [`LinearArena::allocate`] entry point the arena offers a
//! typed layer ([`LinearArena::alloc`], [`LinearArena::alloc_slice`]) that
//! returns checked handles instead of pointers. Each handle remembers which
//! arena produced it and in which epoch (the number of clears so far), so
//! reading through a handle that outlived a `clear` is a loud failure rather
//! than a dangling read.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicU32, Ordering};

use thiserror::Error;

/// Source of arena identities. Only used to tag handles.
static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(1);

/// Errors raised when an allocation request cannot be served.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    #[error("arena capacity must be non-zero")]
    ZeroCapacity,

    #[error("arena allocations must request at least one byte")]
    ZeroSize,

    #[error("alignment {0} is not a power of two")]
    InvalidAlignment(usize),

    #[error(
        "arena exhausted: requested {requested} bytes (+{adjustment} for alignment) \
         with {used} of {capacity} bytes already used"
    )]
    CapacityExceeded {
        requested: usize,
        adjustment: usize,
        used: usize,
        capacity: usize,
    },
}

/// A bump allocator over a fixed-capacity byte buffer.
///
/// The buffer is held as a raw base pointer rather than a `Box`, so handing
/// out a new region never reborrows the whole buffer and pointers returned
/// earlier stay usable until the next [`clear`](Self::clear).
pub struct LinearArena {
    id: u32,
    epoch: u64,
    base: NonNull<u8>,
    capacity: usize,
    used: usize,
    allocations: usize,
}

// SAFETY: the arena is the sole owner of its buffer; all access goes through
// `&self` (reads) or `&mut self` (writes).
unsafe impl Send for LinearArena {}
unsafe impl Sync for LinearArena {}

impl LinearArena {
    /// Creates an arena backed by `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            fatal(ArenaError::ZeroCapacity);
        }
        let buffer: &'static mut [u8] = Box::leak(vec![0u8; capacity].into_boxed_slice());
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            epoch: 0,
            base: NonNull::from(buffer).cast::<u8>(),
            capacity,
            used: 0,
            allocations: 0,
        }
    }

    /// Total size of the backing buffer in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes consumed so far, alignment padding included.
    ///
    /// This is also the offset of the cursor from the start of the buffer.
    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.used
    }

    /// Number of allocations served since creation or the last clear.
    #[inline]
    pub fn allocation_count(&self) -> usize {
        self.allocations
    }

    /// Allocates `size` bytes aligned to `alignment`.
    ///
    /// The returned pointer is valid for reads and writes of `size` bytes
    /// until the arena is cleared or dropped.
    ///
    /// # Panics
    ///
    /// Panics if the request is malformed or does not fit; arena capacity is
    /// a fixed budget, so running out of it is a configuration error.
    pub fn allocate(&mut self, size: usize, alignment: usize) -> NonNull<u8> {
        match self.try_allocate(size, alignment) {
            Ok(ptr) => ptr,
            Err(err) => fatal(err),
        }
    }

    /// Fallible form of [`allocate`](Self::allocate).
    pub fn try_allocate(&mut self, size: usize, alignment: usize) -> Result<NonNull<u8>, ArenaError> {
        let offset = self.reserve(size, alignment)?;
        // SAFETY: `reserve` returned an offset inside the buffer, and `base`
        // is non-null, so the sum is non-null too.
        Ok(unsafe { NonNull::new_unchecked(self.base.as_ptr().add(offset)) })
    }

    /// Individual deallocation is not supported by a linear arena.
    ///
    /// # Panics
    ///
    /// Always. Use [`clear`](Self::clear) to reclaim memory.
    pub fn deallocate(&mut self, ptr: NonNull<u8>) -> ! {
        tracing::error!(?ptr, "deallocate called on a linear arena");
        panic!("linear arena cannot free individual allocations ({ptr:p}); use clear()");
    }

    /// Rewinds the arena to empty.
    ///
    /// The buffer is not zeroed. Every handle issued before the clear is
    /// rejected from now on.
    pub fn clear(&mut self) {
        tracing::debug!(
            used = self.used,
            allocations = self.allocations,
            "clearing arena"
        );
        self.used = 0;
        self.allocations = 0;
        self.epoch += 1;
    }

    /// Moves `value` into the arena.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or the arena is exhausted.
    pub fn alloc<T: Copy>(&mut self, value: T) -> ArenaRef<T> {
        match self.try_alloc(value) {
            Ok(handle) => handle,
            Err(err) => fatal(err),
        }
    }

    pub fn try_alloc<T: Copy>(&mut self, value: T) -> Result<ArenaRef<T>, ArenaError> {
        let offset = self.reserve(mem::size_of::<T>(), mem::align_of::<T>())?;
        // SAFETY: `reserve` returned an offset whose address is aligned for `T`
        // and followed by at least `size_of::<T>()` bytes inside the buffer.
        unsafe { self.base.as_ptr().add(offset).cast::<T>().write(value) };
        Ok(ArenaRef {
            arena: self.id,
            epoch: self.epoch,
            offset,
            _marker: PhantomData,
        })
    }

    /// Copies `values` into the arena. An empty slice allocates nothing.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or the arena is exhausted.
    pub fn alloc_slice<T: Copy>(&mut self, values: &[T]) -> ArenaSlice<T> {
        match self.try_alloc_slice(values) {
            Ok(handle) => handle,
            Err(err) => fatal(err),
        }
    }

    pub fn try_alloc_slice<T: Copy>(&mut self, values: &[T]) -> Result<ArenaSlice<T>, ArenaError> {
        let offset = if values.is_empty() {
            0
        } else {
            let offset = self.reserve(mem::size_of_val(values), mem::align_of::<T>())?;
            // SAFETY: the reserved region is aligned for `T`, lies inside the
            // buffer and is large enough for `values.len()` elements. The
            // source slice cannot overlap memory we exclusively borrow.
            unsafe {
                let dst = self.base.as_ptr().add(offset).cast::<T>();
                ptr::copy_nonoverlapping(values.as_ptr(), dst, values.len());
            }
            offset
        };
        Ok(ArenaSlice {
            arena: self.id,
            epoch: self.epoch,
            offset,
            len: values.len(),
            _marker: PhantomData,
        })
    }

    /// Reads a value previously stored with [`alloc`](Self::alloc).
    ///
    /// # Panics
    ///
    /// Panics if the handle came from another arena or predates a clear.
    pub fn get<T: Copy>(&self, handle: ArenaRef<T>) -> &T {
        self.check_handle(handle.arena, handle.epoch);
        // SAFETY: the handle was issued by this arena in the current epoch,
        // so `offset` names an aligned, initialized `T` that no later
        // allocation overlaps.
        unsafe { &*self.base.as_ptr().add(handle.offset).cast::<T>() }
    }

    pub fn get_mut<T: Copy>(&mut self, handle: ArenaRef<T>) -> &mut T {
        self.check_handle(handle.arena, handle.epoch);
        // SAFETY: see `get`; `&mut self` guarantees exclusive access.
        unsafe { &mut *self.base.as_ptr().add(handle.offset).cast::<T>() }
    }

    /// Reads a slice previously stored with [`alloc_slice`](Self::alloc_slice).
    ///
    /// # Panics
    ///
    /// Panics if the handle came from another arena or predates a clear.
    pub fn slice<T: Copy>(&self, handle: ArenaSlice<T>) -> &[T] {
        self.check_handle(handle.arena, handle.epoch);
        if handle.len == 0 {
            return &[];
        }
        // SAFETY: as in `get`, for `len` contiguous elements.
        unsafe {
            std::slice::from_raw_parts(
                self.base.as_ptr().add(handle.offset).cast::<T>(),
                handle.len,
            )
        }
    }

    /// Claims `size` bytes at the next `alignment` boundary and returns their
    /// offset from the start of the buffer.
    fn reserve(&mut self, size: usize, alignment: usize) -> Result<usize, ArenaError> {
        if size == 0 {
            return Err(ArenaError::ZeroSize);
        }
        if !alignment.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment(alignment));
        }

        let cursor = self.base.as_ptr() as usize + self.used;
        let adjustment = align_forward_adjustment(cursor, alignment);
        let end = self
            .used
            .checked_add(adjustment)
            .and_then(|offset| offset.checked_add(size));

        match end {
            Some(end) if end <= self.capacity() => {
                let offset = self.used + adjustment;
                self.used = end;
                self.allocations += 1;
                Ok(offset)
            }
            _ => Err(ArenaError::CapacityExceeded {
                requested: size,
                adjustment,
                used: self.used,
                capacity: self.capacity(),
            }),
        }
    }

    fn check_handle(&self, arena: u32, epoch: u64) {
        if arena != self.id {
            tracing::error!(arena, expected = self.id, "foreign arena handle");
            panic!("handle from arena #{arena} used with arena #{}", self.id);
        }
        if epoch != self.epoch {
            tracing::error!(epoch, current = self.epoch, "stale arena handle");
            panic!(
                "stale arena handle from epoch {epoch}; the arena was cleared (now at epoch {})",
                self.epoch
            );
        }
    }
}

impl Drop for LinearArena {
    fn drop(&mut self) {
        // SAFETY: `base` and `capacity` describe the boxed slice leaked in
        // `new`, and nothing else frees it.
        drop(unsafe {
            Box::from_raw(ptr::slice_from_raw_parts_mut(
                self.base.as_ptr(),
                self.capacity,
            ))
        });
    }
}

impl fmt::Debug for LinearArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearArena")
            .field("id", &self.id)
            .field("epoch", &self.epoch)
            .field("used", &self.used)
            .field("capacity", &self.capacity())
            .field("allocations", &self.allocations)
            .finish()
    }
}

/// Number of bytes to skip from `address` to reach the next multiple of
/// `alignment`, which must be a power of two.
#[inline]
pub fn align_forward_adjustment(address: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    let misalignment = address & (alignment - 1);
    if misalignment == 0 {
        0
    } else {
        alignment - misalignment
    }
}

fn fatal(err: ArenaError) -> ! {
    tracing::error!(%err, "arena allocation failed");
    panic!("{err}");
}

/// Handle to a single value stored in a [`LinearArena`].
pub struct ArenaRef<T> {
    arena: u32,
    epoch: u64,
    offset: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ArenaRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaRef<T> {}

impl<T> fmt::Debug for ArenaRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArenaRef(#{}@{}+{})", self.arena, self.epoch, self.offset)
    }
}

/// Handle to a contiguous run of values stored in a [`LinearArena`].
pub struct ArenaSlice<T> {
    arena: u32,
    epoch: u64,
    offset: usize,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArenaSlice<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Clone for ArenaSlice<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaSlice<T> {}

impl<T> fmt::Debug for ArenaSlice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArenaSlice(#{}@{}+{}, len {})",
            self.arena, self.epoch, self.offset, self.len
        )
    }
}
