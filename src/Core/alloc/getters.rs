use super::*;

/// Size and occupancy accessors for RawBuffer
impl RawBuffer {
    /// Allocated size in bytes.
    #[inline]
    pub fn byte_buf_size(&self) -> usize {
        self.byte_buf_size
    }

    /// Occupied length in bytes.
    #[inline]
    pub fn byte_data_len(&self) -> usize {
        self.byte_data_len
    }

    /// Size in bytes of one stored element.
    #[inline]
    pub fn elem_size(&self) -> usize {
        self.elem_size
    }

    /// Capacity in stored elements.
    #[inline]
    pub fn native_buf_size(&self) -> usize {
        if self.elem_size == 0 {
            0
        } else {
            self.byte_buf_size / self.elem_size
        }
    }

    /// Capacity measured in `T` elements.
    #[inline]
    pub fn buf_size<T: Pod>(&self) -> usize {
        self.byte_buf_size / std::mem::size_of::<T>()
    }

    /// Occupied length measured in `T` elements.
    #[inline]
    pub fn data_len<T: Pod>(&self) -> usize {
        self.byte_data_len / std::mem::size_of::<T>()
    }

    /// Set the occupied length in `T` elements, clamped to the capacity.
    pub fn set_data_len<T: Pod>(&mut self, len: usize) {
        let bytes = len.saturating_mul(std::mem::size_of::<T>());
        self.byte_data_len = bytes.min(self.byte_buf_size);
    }

    /// Start address of the allocation, for alignment checks and debugging.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.buf.as_ptr()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.byte_buf_size == 0
    }
}
