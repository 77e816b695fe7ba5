use std::fmt;
use crate::Core::alloc::RawBuffer;
use crate::Core::pod::Pod;
use crate::Msg::{DeletionPolicy, MessageWrapper, Payload, PoolStats, RoutingPolicy};
use crate::Video::{Frame, MetadataSidecar};

/// Debug function for RawBuffer
///
/// Shows the allocation address and sizes, never the contents.
pub fn debug_raw_buffer(buffer: &RawBuffer, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RawBuffer")
        .field("buf", &format_args!("{:p}", buffer.as_ptr()))
        .field("byte_buf_size", &buffer.byte_buf_size())
        .field("elem_size", &buffer.elem_size())
        .field("byte_data_len", &buffer.byte_data_len())
        .finish()
}

/// Debug function for MetadataSidecar
///
/// Lists the written elements only.
pub fn debug_sidecar<E: Pod + fmt::Debug>(
    sidecar: &MetadataSidecar<E>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    f.debug_struct("MetadataSidecar")
        .field("elem_size", &sidecar.elem_size())
        .field("capacity", &sidecar.capacity())
        .field("written", &sidecar.as_slice())
        .finish()
}

/// Debug function for Frame
///
/// Shape and sidecar occupancy; pixel data is left out.
pub fn debug_frame<P: Pod, M: Pod>(frame: &Frame<P, M>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Frame")
        .field("shape", &format_args!("{}", frame.shape()))
        .field("pixels", frame.raw_buffer())
        .field("sidecar_len", &frame.sidecar().len())
        .finish()
}

pub fn debug_wrapper<T, R, D>(
    wrapper: &MessageWrapper<T, R, D>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    f.debug_struct("MessageWrapper")
        .field("tag", &wrapper.msg_class_id())
        .field("payload", &std::any::type_name::<T>())
        .field("routing", &wrapper.routing_header())
        .field("slot_id", &wrapper.slot_id())
        .finish()
}

pub fn debug_pool(stats: &PoolStats, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pool")
        .field("tag", &stats.tag)
        .field("size", &stats.size)
        .field("available", &stats.available)
        .field("checked_out", &stats.checked_out)
        .field("alive", &stats.alive)
        .finish()
}
