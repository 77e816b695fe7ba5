use super::policy::{DeletionPolicy, RoutingPolicy};
use super::pool::Pool;
use super::wrapper::Payload;
use crate::Core::pod::Pod;
use crate::Core::type_tag::{TypeRegistry, TypeTag};
use crate::Video::Frame;
use std::sync::Arc;

pub struct PoolBuilder {
    pool_size: usize,
    types: Option<Arc<TypeRegistry>>,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self {
            pool_size: 8, // instances preallocated per pool
            types: None,  // process-wide registry
        }
    }
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    /// Tag payload types from `types` instead of the process-wide registry.
    pub fn with_type_registry(mut self, types: Arc<TypeRegistry>) -> Self {
        self.types = Some(types);
        self
    }

    fn tag_for<T: 'static>(&self) -> TypeTag {
        match &self.types {
            Some(types) => types.tag_for::<T>(),
            None => TypeTag::of::<T>(),
        }
    }

    pub fn build<T, R, D>(self, ctor: impl FnMut() -> T) -> Pool<T, R, D>
    where
        T: Payload,
        R: RoutingPolicy,
        D: DeletionPolicy<T>,
    {
        Pool::with_tag(self.pool_size, self.tag_for::<T>(), ctor)
    }

    pub fn try_build<T, R, D, E>(
        self,
        ctor: impl FnMut() -> Result<T, E>,
    ) -> Result<Pool<T, R, D>, E>
    where
        T: Payload,
        R: RoutingPolicy,
        D: DeletionPolicy<T>,
    {
        Pool::try_with_tag(self.pool_size, self.tag_for::<T>(), ctor)
    }

    /// A pool of zeroed `width` x `height` frames.
    pub fn build_frames<P, M, R, D>(
        self,
        width: u32,
        height: u32,
    ) -> crate::Result<Pool<Frame<P, M>, R, D>>
    where
        P: Pod,
        M: Pod,
        R: RoutingPolicy,
        D: DeletionPolicy<Frame<P, M>>,
    {
        self.try_build(Frame::creator(width, height))
    }
}
