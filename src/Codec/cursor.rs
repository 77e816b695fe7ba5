// Bounds-checked byte-stream cursors over caller-owned buffers.
//
// All scalar fields are 4-byte little-endian words.

use crate::Core::netaddr::NetAddr;
use crate::Core::pod::Pod;
use crate::error::{FrameError, Result};
use bytes::{Buf, BufMut};
use zerocopy::IntoBytes;

/// Writer over a fixed destination slice.
///
/// Every write checks the remaining capacity first. The first write that does
/// not fit latches the cursor into the failed state: nothing of that write is
/// emitted, later writes are no-ops returning zero, and
/// [`Serializer::stream_len`] reports zero.
pub struct Serializer<'a> {
    /// Unwritten tail of the destination; `BufMut` advances it.
    buf: &'a mut [u8],
    capacity: usize,
    overflow: Option<(usize, usize)>,
}

impl<'a> Serializer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            capacity: buf.len(),
            buf,
            overflow: None,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.remaining_mut()
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.overflow.is_some()
    }

    /// Bytes emitted so far; zero once the cursor has failed.
    #[inline]
    pub fn stream_len(&self) -> usize {
        if self.is_failed() {
            0
        } else {
            self.position()
        }
    }

    #[inline]
    fn position(&self) -> usize {
        self.capacity - self.remaining()
    }

    /// Latch the failure state unless `len` more bytes fit.
    fn reserve(&mut self, len: usize) -> bool {
        if self.is_failed() {
            return false;
        }
        if len > self.remaining() {
            self.overflow = Some((len, self.remaining()));
            return false;
        }
        true
    }

    /// Raw byte write. Returns the number of bytes written.
    pub fn write_bytes(&mut self, data: &[u8]) -> usize {
        if !self.reserve(data.len()) {
            return 0;
        }
        self.buf.put_slice(data);
        data.len()
    }

    pub fn write_u32(&mut self, value: u32) -> usize {
        if !self.reserve(4) {
            return 0;
        }
        self.buf.put_u32_le(value);
        4
    }

    /// An address as two words, high half first.
    pub fn write_addr(&mut self, addr: NetAddr) -> usize {
        if !self.reserve(8) {
            return 0;
        }
        let (hi, lo) = addr.split();
        self.buf.put_u32_le(hi);
        self.buf.put_u32_le(lo);
        8
    }

    /// A POD slice in native memory order.
    pub fn write_slice<T: Pod>(&mut self, data: &[T]) -> usize {
        self.write_bytes(data.as_bytes())
    }

    /// Final status: the stream length, or the first overflow.
    pub fn finish(&self) -> Result<usize> {
        match self.overflow {
            Some((needed, remaining)) => Err(FrameError::Overflow { needed, remaining }),
            None => Ok(self.position()),
        }
    }
}

/// Reader over a received byte slice.
pub struct Deserializer<'a> {
    /// Unread tail of the input; `Buf` advances it.
    buf: &'a [u8],
    len: usize,
}

impl<'a> Deserializer<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, len: buf.len() }
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.len - self.buf.remaining()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(FrameError::Truncated {
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let buf: &'a [u8] = self.buf;
        let out = &buf[..len];
        self.buf.advance(len);
        Ok(out)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_addr(&mut self) -> Result<NetAddr> {
        self.ensure(8)?;
        let hi = self.buf.get_u32_le();
        let lo = self.buf.get_u32_le();
        Ok(NetAddr::join(hi, lo))
    }

    /// Fill `out` from the stream.
    pub fn read_into<T: Pod>(&mut self, out: &mut [T]) -> Result<()> {
        let dst = out.as_mut_bytes();
        self.ensure(dst.len())?;
        self.buf.copy_to_slice(dst);
        Ok(())
    }
}
