use crate::Video::Shape;

/// Errors produced by buffers, sidecars and the frame codec.
///
/// Pool exhaustion and payload type mismatches are not errors; those surface
/// as `None` from the pool and handle APIs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The stream does not start with the frame magic word.
    #[error("invalid frame magic (expected {expected}, found {found})")]
    InvalidMagic { expected: u32, found: u32 },

    /// The stream shape disagrees with the destination frame.
    #[error("frame shape mismatch (stream {found}, destination {expected})")]
    ShapeMismatch { expected: Shape, found: Shape },

    /// A serializer write did not fit in the destination buffer.
    #[error("stream overflow ({needed} bytes needed, {remaining} remaining)")]
    Overflow { needed: usize, remaining: usize },

    /// The input ended before a complete record was read.
    #[error("stream truncated ({needed} bytes needed, {remaining} remaining)")]
    Truncated { needed: usize, remaining: usize },

    /// The consumed length differs from the declared input length.
    #[error("declared length {declared} does not match consumed length {consumed}")]
    LengthMismatch { declared: usize, consumed: usize },

    /// The serialized sidecar block does not fit the destination sidecar.
    #[error("sidecar layout mismatch (capacity {capacity}, element size {element_size}, written {written}, append {append})")]
    SidecarMismatch {
        capacity: u32,
        element_size: u32,
        written: u32,
        append: u32,
    },

    /// A sidecar append would exceed its fixed capacity.
    #[error("sidecar full ({requested} elements requested, {available} available)")]
    SidecarFull { requested: usize, available: usize },

    /// A sidecar read reaches outside the written range.
    #[error("sidecar read out of range (begin {begin}, count {count}, written {written})")]
    SidecarRange {
        begin: usize,
        count: usize,
        written: usize,
    },

    /// `count * element_size` does not fit in the address space.
    #[error("buffer size overflow ({count} x {elem_size} bytes)")]
    SizeOverflow { count: usize, elem_size: usize },

    /// The aligned allocator returned null.
    #[error("aligned allocation of {bytes} bytes failed")]
    AllocationFailed { bytes: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
