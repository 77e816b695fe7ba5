pub mod frame;
pub mod sidecar;

pub use frame::{Frame, Shape};
pub use sidecar::{MetadataSidecar, SIDECAR_BYTES};
