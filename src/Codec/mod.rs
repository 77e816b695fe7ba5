pub mod cursor;
pub mod frame_codec;
pub mod layout;

pub use cursor::{Deserializer, Serializer};
pub use frame_codec::FrameCodec;
pub use layout::{WireHeader, FRAME_MAGIC, HEADER_SIZE, PIXEL_OFFSET, SIDECAR_BLOCK_SIZE};
