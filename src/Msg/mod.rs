pub mod builder;
pub mod handle;
pub mod policy;
pub mod pool;
pub mod registry;
pub mod wrapper;

pub use builder::PoolBuilder;
pub use handle::{AnyHandle, AnyMessage, Handle};
pub use policy::{
    Assign, DeletionPolicy, DropPayload, RetainPayload, Routed, RoutingPolicy, Unrouted,
};
pub use pool::{Pool, PoolStats};
pub use registry::PoolRegistry;
pub use wrapper::{MessageWrapper, Payload, RoutingHeader};
