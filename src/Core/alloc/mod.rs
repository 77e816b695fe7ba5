use crate::error::{FrameError, Result};
use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::{self, NonNull};
mod debug;
mod getters;

use super::pod::Pod;
use zerocopy::FromBytes;

/// Alignment of every RawBuffer allocation (two cache lines).
pub const BUF_ALIGNMENT: usize = 128;

/// Resizable, 128-byte aligned byte buffer.
///
/// Tracks the element size of its contents and an occupied ("data") length
/// independently of its capacity. Content is zero-filled on allocation and is
/// not preserved across a reallocating resize.
pub struct RawBuffer {
    /// Start of the aligned allocation (dangling but aligned when empty).
    buf: NonNull<u8>,
    /// Allocated size in bytes.
    byte_buf_size: usize,
    /// Size in bytes of one stored element.
    elem_size: usize,
    /// Occupied length in bytes.
    byte_data_len: usize,
}

impl RawBuffer {
    /// Create a buffer able to hold `count` elements of `elem_size` bytes.
    pub fn new(count: usize, elem_size: usize) -> Result<Self> {
        let mut buffer = Self::empty();
        buffer.resize(count, elem_size)?;
        Ok(buffer)
    }

    /// Typed convenience for [`RawBuffer::new`].
    pub fn with_elements<T: Pod>(count: usize) -> Result<Self> {
        Self::new(count, std::mem::size_of::<T>())
    }

    /// A buffer with no allocation.
    pub fn empty() -> Self {
        Self {
            buf: Self::dangling(),
            byte_buf_size: 0,
            elem_size: 0,
            byte_data_len: 0,
        }
    }

    #[inline]
    fn dangling() -> NonNull<u8> {
        // Safety: BUF_ALIGNMENT is non-zero.
        unsafe { NonNull::new_unchecked(BUF_ALIGNMENT as *mut u8) }
    }

    /// Resize to `count` elements of `elem_size` bytes.
    ///
    /// Reallocates only if the total byte size changes; returns `Ok(true)` in
    /// that case. A reallocation resets the occupied length to zero. On error
    /// the buffer is left unchanged.
    pub fn resize(&mut self, count: usize, elem_size: usize) -> Result<bool> {
        let new_size = count
            .checked_mul(elem_size)
            .ok_or(FrameError::SizeOverflow { count, elem_size })?;

        let reallocated = if new_size != self.byte_buf_size {
            let new_buf = Self::allocate(new_size)?;
            self.release();
            self.buf = new_buf;
            self.byte_buf_size = new_size;
            self.byte_data_len = 0;
            true
        } else {
            false
        };

        self.elem_size = elem_size;
        Ok(reallocated)
    }

    /// Typed convenience for [`RawBuffer::resize`].
    pub fn resize_for<T: Pod>(&mut self, count: usize) -> Result<bool> {
        self.resize(count, std::mem::size_of::<T>())
    }

    fn allocate(size: usize) -> Result<NonNull<u8>> {
        if size == 0 {
            return Ok(Self::dangling());
        }
        let layout = Layout::from_size_align(size, BUF_ALIGNMENT)
            .map_err(|_| FrameError::AllocationFailed { bytes: size })?;
        // Safety: layout has non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };
        NonNull::new(raw).ok_or(FrameError::AllocationFailed { bytes: size })
    }

    fn release(&mut self) {
        if self.byte_buf_size == 0 {
            return;
        }
        // Safety: allocated in `allocate` with this exact size and alignment.
        unsafe {
            dealloc(
                self.buf.as_ptr(),
                Layout::from_size_align_unchecked(self.byte_buf_size, BUF_ALIGNMENT),
            );
        }
        self.buf = Self::dangling();
        self.byte_buf_size = 0;
    }

    /// Whole allocation as bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        // Safety: `buf` is valid for `byte_buf_size` initialized bytes.
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr(), self.byte_buf_size) }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // Safety: `buf` is valid for `byte_buf_size` bytes and uniquely borrowed.
        unsafe { std::slice::from_raw_parts_mut(self.buf.as_ptr(), self.byte_buf_size) }
    }

    /// Whole allocation as `T` elements; `None` if `T` is not the stored element type.
    pub fn as_slice<T: Pod>(&self) -> Option<&[T]> {
        if std::mem::size_of::<T>() != self.elem_size || self.elem_size == 0 {
            return None;
        }
        <[T]>::ref_from_bytes(self.as_bytes()).ok()
    }

    pub fn as_mut_slice<T: Pod>(&mut self) -> Option<&mut [T]> {
        if std::mem::size_of::<T>() != self.elem_size || self.elem_size == 0 {
            return None;
        }
        <[T]>::mut_from_bytes(self.as_bytes_mut()).ok()
    }

    /// Typed element pointer; null if `T` is not the stored element type.
    pub fn data_ptr<T: Pod>(&mut self) -> *mut T {
        if std::mem::size_of::<T>() != self.elem_size {
            return ptr::null_mut();
        }
        self.buf.as_ptr() as *mut T
    }

    /// Copy `right` into `self` when byte size and element size both match.
    ///
    /// Returns `false` and leaves `self` untouched otherwise; there is no
    /// implicit resize.
    pub fn assign(&mut self, right: &RawBuffer) -> bool {
        if self.byte_buf_size != right.byte_buf_size || self.elem_size != right.elem_size {
            return false;
        }
        self.as_bytes_mut().copy_from_slice(right.as_bytes());
        self.byte_data_len = right.byte_data_len;
        true
    }
}

impl PartialEq for RawBuffer {
    fn eq(&self, right: &Self) -> bool {
        self.byte_buf_size == right.byte_buf_size
            && self.elem_size == right.elem_size
            && self.as_bytes() == right.as_bytes()
    }
}

impl Default for RawBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        self.release();
    }
}

// The buffer exclusively owns its allocation.
unsafe impl Send for RawBuffer {}
unsafe impl Sync for RawBuffer {}
