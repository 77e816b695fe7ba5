use super::cursor::{Deserializer, Serializer};
use crate::Core::netaddr::NetAddr;
use crate::Video::{Shape, SIDECAR_BYTES};
use crate::error::{FrameError, Result};
use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Magic word opening every frame record.
pub const FRAME_MAGIC: u32 = 0;

/// Size of one scalar wire field.
pub const WORD_SIZE: usize = 4;

/// Fixed header: magic, tag, src hi/lo, dst hi/lo, sequence, pixel size, height, width.
pub const HEADER_WORDS: usize = 10;
pub const HEADER_SIZE: usize = HEADER_WORDS * WORD_SIZE;

/// Sidecar block: four length words followed by the raw store.
pub const SIDECAR_BLOCK_SIZE: usize = 4 * WORD_SIZE + SIDECAR_BYTES;

/// Offset of the first pixel byte in a record.
pub const PIXEL_OFFSET: usize = HEADER_SIZE + SIDECAR_BLOCK_SIZE;

/// Fixed-order record header as it appears on the wire.
///
/// Every field is a 4-byte little-endian word with alignment 1, so the struct
/// is exactly the first [`HEADER_SIZE`] bytes of a record and can be read from
/// or written to any byte offset.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable,
)]
pub struct WireHeader {
    pub magic: U32,
    pub type_tag: U32,
    pub net_src_hi: U32,
    pub net_src_lo: U32,
    pub net_dst_hi: U32,
    pub net_dst_lo: U32,
    pub sequence_id: U32,
    pub pixel_size: U32,
    pub height: U32,
    pub width: U32,
}

impl WireHeader {
    /// A header for a frame of `shape`, addresses unset.
    pub fn new(type_tag: u32, sequence_id: u32, shape: Shape) -> Self {
        Self {
            magic: U32::new(FRAME_MAGIC),
            type_tag: U32::new(type_tag),
            sequence_id: U32::new(sequence_id),
            pixel_size: U32::new(shape.pixel_size),
            height: U32::new(shape.height),
            width: U32::new(shape.width),
            ..Self::default()
        }
    }

    #[inline]
    pub fn magic(&self) -> u32 {
        self.magic.get()
    }

    #[inline]
    pub fn type_tag(&self) -> u32 {
        self.type_tag.get()
    }

    #[inline]
    pub fn sequence_id(&self) -> u32 {
        self.sequence_id.get()
    }

    #[inline]
    pub fn net_src(&self) -> NetAddr {
        NetAddr::join(self.net_src_hi.get(), self.net_src_lo.get())
    }

    #[inline]
    pub fn net_dst(&self) -> NetAddr {
        NetAddr::join(self.net_dst_hi.get(), self.net_dst_lo.get())
    }

    pub fn set_net_points(&mut self, src: NetAddr, dst: NetAddr) {
        let (hi, lo) = src.split();
        self.net_src_hi.set(hi);
        self.net_src_lo.set(lo);
        let (hi, lo) = dst.split();
        self.net_dst_hi.set(hi);
        self.net_dst_lo.set(lo);
    }

    pub fn shape(&self) -> Shape {
        Shape {
            width: self.width.get(),
            height: self.height.get(),
            pixel_size: self.pixel_size.get(),
        }
    }

    /// Pixel byte count declared by this header.
    pub fn pixel_bytes(&self) -> Option<usize> {
        (self.width.get() as usize)
            .checked_mul(self.height.get() as usize)?
            .checked_mul(self.pixel_size.get() as usize)
    }

    /// Total record length declared by this header.
    pub fn record_len(&self) -> Option<usize> {
        self.pixel_bytes()?.checked_add(PIXEL_OFFSET)
    }

    /// Header copied out of the front of `src`, without consuming anything.
    pub fn from_prefix(src: &[u8]) -> Result<Self> {
        let (header, _) = Self::ref_from_prefix(src).map_err(|_| FrameError::Truncated {
            needed: HEADER_SIZE,
            remaining: src.len(),
        })?;
        Ok(*header)
    }

    /// Returns bytes written, zero if the serializer failed.
    #[inline]
    pub fn write(&self, ser: &mut Serializer<'_>) -> usize {
        ser.write_bytes(self.as_bytes())
    }

    pub fn read(de: &mut Deserializer<'_>) -> Result<Self> {
        Self::from_prefix(de.read_bytes(HEADER_SIZE)?)
    }
}
