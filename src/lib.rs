// Module naming follows project convention (Core / Msg / Video / Codec / Pipeline)
#[allow(non_snake_case)]
pub mod Core {
    pub mod alloc;
    pub mod guard;
    pub mod netaddr;
    pub mod pod;
    pub mod type_tag;
    pub use alloc::{RawBuffer, BUF_ALIGNMENT}; // re-export for stable path
    pub use netaddr::NetAddr;
    pub use pod::Pod;
    pub use type_tag::{TypeRegistry, TypeTag};
}
#[allow(non_snake_case)]
pub mod Msg;
#[allow(non_snake_case)]
pub mod Video;
#[allow(non_snake_case)]
pub mod Codec;
#[allow(non_snake_case)]
pub mod Pipeline;
#[allow(non_snake_case)]
pub mod Debug {
    #[allow(non_snake_case)]
    pub mod StructDebug;
}
pub mod error;

pub use Codec::{FrameCodec, WireHeader};
pub use Core::{NetAddr, Pod, RawBuffer, TypeRegistry, TypeTag};
pub use Msg::{
    AnyHandle, AnyMessage, Assign, DeletionPolicy, DropPayload, Handle, MessageWrapper, Payload,
    Pool, PoolBuilder, PoolRegistry, PoolStats, RetainPayload, Routed, RoutingHeader,
    RoutingPolicy, Unrouted,
};
pub use Video::{Frame, MetadataSidecar, Shape};
pub use error::{FrameError, Result};
