use super::sidecar::MetadataSidecar;
use crate::Core::alloc::RawBuffer;
use crate::Core::pod::Pod;
use crate::Msg::Assign;
use crate::error::{FrameError, Result};
use std::fmt;
use std::marker::PhantomData;

/// A frame's (width, height, pixel element size) triple.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    pub width: u32,
    pub height: u32,
    pub pixel_size: u32,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}B", self.width, self.height, self.pixel_size)
    }
}

/// A `width x height` image of `P` pixels plus a metadata sidecar of `M`
/// elements.
///
/// Pixels live row-major in a 128-byte aligned [`RawBuffer`]. Shape changes
/// only happen through [`Frame::resize`]; assignment between frames of
/// different shape is a no-op.
pub struct Frame<P: Pod, M: Pod = u16> {
    width: u32,
    height: u32,
    pixels: RawBuffer,
    sidecar: MetadataSidecar<M>,
    _pixel: PhantomData<P>,
}

impl<P: Pod, M: Pod> Frame<P, M> {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut frame = Self {
            width: 0,
            height: 0,
            pixels: RawBuffer::empty(),
            sidecar: MetadataSidecar::new(),
            _pixel: PhantomData,
        };
        frame.resize(width, height)?;
        Ok(frame)
    }

    /// Payload constructor for frame pools of a fixed shape.
    pub fn creator(width: u32, height: u32) -> impl FnMut() -> Result<Self> {
        move || Self::new(width, height)
    }

    /// Reshape to `width x height`. Pixel content is not preserved when the
    /// byte size changes.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(FrameError::SizeOverflow {
                count: width as usize,
                elem_size: height as usize,
            })?;
        self.pixels.resize_for::<P>(count)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixel_size(&self) -> usize {
        std::mem::size_of::<P>()
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn byte_size(&self) -> usize {
        self.len() * self.pixel_size()
    }

    pub fn shape(&self) -> Shape {
        Shape {
            width: self.width,
            height: self.height,
            pixel_size: self.pixel_size() as u32,
        }
    }

    pub fn pixels(&self) -> &[P] {
        self.pixels.as_slice::<P>().unwrap_or(&[])
    }

    pub fn pixels_mut(&mut self) -> &mut [P] {
        self.pixels.as_mut_slice::<P>().unwrap_or(&mut [])
    }

    /// Typed pointer to the first pixel, for handing to capture drivers.
    pub fn pixel_buffer(&mut self) -> *mut P {
        self.pixels.data_ptr::<P>()
    }

    #[inline]
    pub fn pixel_bytes(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    #[inline]
    pub fn pixel_bytes_mut(&mut self) -> &mut [u8] {
        self.pixels.as_bytes_mut()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<P> {
        let idx = self.index(x, y)?;
        self.pixels().get(idx).copied()
    }

    /// Returns `false` if `(x, y)` is outside the frame.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: P) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.pixels_mut()[idx] = value;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, value: P) {
        self.pixels_mut().fill(value);
    }

    #[inline]
    pub fn raw_buffer(&self) -> &RawBuffer {
        &self.pixels
    }

    #[inline]
    pub fn sidecar(&self) -> &MetadataSidecar<M> {
        &self.sidecar
    }

    #[inline]
    pub fn sidecar_mut(&mut self) -> &mut MetadataSidecar<M> {
        &mut self.sidecar
    }

    /// Copy pixels and sidecar from an equal-shape frame; no-op returning
    /// `false` on shape mismatch.
    pub fn assign_from(&mut self, src: &Frame<P, M>) -> bool {
        if self.width != src.width || self.height != src.height {
            return false;
        }
        self.pixels.assign(&src.pixels) && self.sidecar.assign_from(&src.sidecar)
    }
}

impl<P: Pod, M: Pod> PartialEq for Frame<P, M> {
    fn eq(&self, right: &Self) -> bool {
        self.width == right.width
            && self.height == right.height
            && self.pixels == right.pixels
            && self.sidecar == right.sidecar
    }
}

impl<P: Pod, M: Pod> Assign for Frame<P, M> {
    fn assign_from(&mut self, src: &Self) -> bool {
        Frame::assign_from(self, src)
    }
}

impl<P: Pod, M: Pod> fmt::Debug for Frame<P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_frame(self, f)
    }
}
