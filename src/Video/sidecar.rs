// Fixed-capacity metadata sidecar traveling with each frame.

use crate::Codec::cursor::{Deserializer, Serializer};
use crate::Core::pod::Pod;
use crate::Msg::Assign;
use crate::error::{FrameError, Result};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};
use zerocopy::{FromBytes, IntoBytes};

/// Byte size of every sidecar store, independent of the element type.
pub const SIDECAR_BYTES: usize = 1024;

#[repr(C, align(8))]
#[derive(Clone, Copy)]
struct SidecarStore([u8; SIDECAR_BYTES]);

/// Append-only buffer of `E` elements in a fixed 1024-byte store.
///
/// Capacity is `1024 / size_of::<E>()` elements. Only the written prefix
/// `[0, len * size_of::<E>())` takes part in equality, assignment and
/// serialization.
pub struct MetadataSidecar<E: Pod> {
    store: SidecarStore,
    write_index: usize,
    _elem: PhantomData<E>,
}

impl<E: Pod> MetadataSidecar<E> {
    /// Size in bytes of one element.
    pub const ELEM_SIZE: usize = size_of::<E>();
    /// Capacity in elements.
    pub const CAPACITY: usize = SIDECAR_BYTES / size_of::<E>();

    const FITS_STORE: () = assert!(
        size_of::<E>() > 0 && align_of::<E>() <= align_of::<SidecarStore>(),
        "sidecar element must be sized and at most 8-byte aligned"
    );

    pub fn new() -> Self {
        let () = Self::FITS_STORE;
        Self {
            store: SidecarStore([0; SIDECAR_BYTES]),
            write_index: 0,
            _elem: PhantomData,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        Self::CAPACITY
    }

    #[inline]
    pub fn elem_size(&self) -> usize {
        Self::ELEM_SIZE
    }

    /// Number of elements written so far (the write cursor).
    #[inline]
    pub fn len(&self) -> usize {
        self.write_index
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.write_index == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.write_index == Self::CAPACITY
    }

    /// Elements that can still be appended.
    #[inline]
    pub fn remaining(&self) -> usize {
        Self::CAPACITY - self.write_index
    }

    #[inline]
    pub fn written_bytes(&self) -> usize {
        self.write_index * Self::ELEM_SIZE
    }

    /// Append `data` at the cursor. Fails without mutating if it does not fit.
    ///
    /// Returns the new write index.
    pub fn write(&mut self, data: &[E]) -> Result<usize> {
        if data.len() > self.remaining() {
            return Err(FrameError::SidecarFull {
                requested: data.len(),
                available: self.remaining(),
            });
        }
        let start = self.written_bytes();
        let bytes = data.as_bytes();
        self.store.0[start..start + bytes.len()].copy_from_slice(bytes);
        self.write_index += data.len();
        Ok(self.write_index)
    }

    pub fn push(&mut self, value: E) -> Result<()> {
        self.write(std::slice::from_ref(&value)).map(|_| ())
    }

    /// Copy `out.len()` elements starting at `begin` into `out`.
    pub fn read(&self, begin: usize, out: &mut [E]) -> Result<()> {
        let count = out.len();
        match begin.checked_add(count) {
            Some(end) if end <= self.write_index => {
                out.copy_from_slice(&self.as_slice()[begin..end]);
                Ok(())
            }
            _ => Err(FrameError::SidecarRange {
                begin,
                count,
                written: self.write_index,
            }),
        }
    }

    pub fn get(&self, index: usize) -> Option<E> {
        self.as_slice().get(index).copied()
    }

    /// The written elements.
    pub fn as_slice(&self) -> &[E] {
        // The store alignment and element size are checked in `new`.
        <[E]>::ref_from_bytes(self.as_bytes()).unwrap_or(&[])
    }

    /// The written prefix as bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.store.0[..self.written_bytes()]
    }

    /// Rewind the cursor. Memory is not cleared.
    #[inline]
    pub fn reset(&mut self) {
        self.write_index = 0;
    }

    /// Copy the written prefix of `src`. No-op returning `false` when the
    /// element sizes differ.
    pub fn assign_from<F: Pod>(&mut self, src: &MetadataSidecar<F>) -> bool {
        if Self::ELEM_SIZE != MetadataSidecar::<F>::ELEM_SIZE {
            return false;
        }
        let len = src.written_bytes();
        self.store.0[..len].copy_from_slice(src.as_bytes());
        self.write_index = src.write_index;
        true
    }

    /// Emit `{capacityBytes, elementSize, writtenByteLen, appendByteLen, store}`.
    ///
    /// Returns the number of bytes written, zero if the serializer failed.
    pub fn serialize(&self, ser: &mut Serializer<'_>) -> usize {
        let written = self.written_bytes();
        let mut n = ser.write_u32(SIDECAR_BYTES as u32);
        n += ser.write_u32(Self::ELEM_SIZE as u32);
        n += ser.write_u32(written as u32);
        n += ser.write_u32((SIDECAR_BYTES - written) as u32);
        n += ser.write_bytes(&self.store.0);
        if ser.is_failed() {
            0
        } else {
            n
        }
    }

    /// Restore from a serialized block after re-validating its layout.
    ///
    /// The sidecar is only modified once the whole block has been validated.
    pub fn deserialize(&mut self, de: &mut Deserializer<'_>) -> Result<()> {
        let capacity = de.read_u32()?;
        let element_size = de.read_u32()?;
        let written = de.read_u32()?;
        let append = de.read_u32()?;

        let valid = capacity as usize == SIDECAR_BYTES
            && element_size as usize == Self::ELEM_SIZE
            && written <= capacity
            && written as usize % Self::ELEM_SIZE == 0
            && written.checked_add(append) == Some(capacity);
        if !valid {
            return Err(FrameError::SidecarMismatch {
                capacity,
                element_size,
                written,
                append,
            });
        }

        let raw = de.read_bytes(SIDECAR_BYTES)?;
        self.store.0.copy_from_slice(raw);
        self.write_index = written as usize / Self::ELEM_SIZE;
        Ok(())
    }
}

impl<E: Pod> Default for MetadataSidecar<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Pod> Clone for MetadataSidecar<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            write_index: self.write_index,
            _elem: PhantomData,
        }
    }
}

impl<E: Pod, F: Pod> PartialEq<MetadataSidecar<F>> for MetadataSidecar<E> {
    fn eq(&self, right: &MetadataSidecar<F>) -> bool {
        Self::ELEM_SIZE == MetadataSidecar::<F>::ELEM_SIZE
            && self.write_index == right.write_index
            && self.as_bytes() == right.as_bytes()
    }
}

impl<E: Pod> Assign for MetadataSidecar<E> {
    fn assign_from(&mut self, src: &Self) -> bool {
        MetadataSidecar::assign_from(self, src)
    }
}

impl<E: Pod + fmt::Debug> fmt::Debug for MetadataSidecar<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_sidecar(self, f)
    }
}
