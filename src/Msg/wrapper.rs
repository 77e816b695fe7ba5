use super::policy::{DeletionPolicy, DropPayload, Routed, RoutingPolicy};
use super::pool::PoolShared;
use crate::Core::netaddr::NetAddr;
use crate::Core::type_tag::TypeTag;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::sync::Weak;

/// Anything that can travel in a [`MessageWrapper`].
pub trait Payload: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Payload for T {}

/// Provenance and ordering stamped on a message.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutingHeader {
    pub net_src: NetAddr,
    pub net_dst: NetAddr,
    pub sequence_id: u32,
}

impl RoutingHeader {
    pub fn new(net_src: NetAddr, net_dst: NetAddr, sequence_id: u32) -> Self {
        Self {
            net_src,
            net_dst,
            sequence_id,
        }
    }
}

/// One payload plus its type tag, routing state and pool back-reference.
///
/// Wrappers are created in bulk by a [`Pool`](super::Pool) or one at a time as
/// free-standing messages, and are reached through a
/// [`Handle`](super::Handle). When a wrapper is finally destroyed its payload
/// is handed to the deletion policy `D`.
pub struct MessageWrapper<T, R = Routed, D = DropPayload>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    payload: ManuallyDrop<T>,
    tag: TypeTag,
    routing: R,
    sequence_id: u32,
    slot_id: Option<u32>,
    pool: Option<Weak<PoolShared<T, R, D>>>,
    _deletion: PhantomData<fn() -> D>,
}

impl<T, R, D> MessageWrapper<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    /// A free-standing wrapper tagged from the process-wide registry.
    pub fn new(payload: T) -> Self {
        Self::with_tag(payload, TypeTag::of::<T>())
    }

    /// A free-standing wrapper with an explicit tag.
    pub fn with_tag(payload: T, tag: TypeTag) -> Self {
        Self {
            payload: ManuallyDrop::new(payload),
            tag,
            routing: R::default(),
            sequence_id: 0,
            slot_id: None,
            pool: None,
            _deletion: PhantomData,
        }
    }

    pub(crate) fn pooled(
        payload: T,
        tag: TypeTag,
        slot_id: u32,
        pool: Weak<PoolShared<T, R, D>>,
    ) -> Self {
        Self {
            payload: ManuallyDrop::new(payload),
            tag,
            routing: R::default(),
            sequence_id: 0,
            slot_id: Some(slot_id),
            pool: Some(pool),
            _deletion: PhantomData,
        }
    }

    #[inline]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    #[inline]
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    /// Type tag of the payload.
    #[inline]
    pub fn msg_class_id(&self) -> TypeTag {
        self.tag
    }

    #[inline]
    pub fn net_src(&self) -> NetAddr {
        self.routing.net_src()
    }

    #[inline]
    pub fn net_dst(&self) -> NetAddr {
        self.routing.net_dst()
    }

    pub fn set_net_src(&mut self, src: NetAddr) {
        let dst = self.routing.net_dst();
        self.routing.set_net_points(src, dst);
    }

    pub fn set_net_dst(&mut self, dst: NetAddr) {
        let src = self.routing.net_src();
        self.routing.set_net_points(src, dst);
    }

    #[inline]
    pub fn set_net_points(&mut self, src: NetAddr, dst: NetAddr) {
        self.routing.set_net_points(src, dst);
    }

    #[inline]
    pub fn sequence_id(&self) -> u32 {
        self.sequence_id
    }

    #[inline]
    pub fn set_sequence_id(&mut self, sequence_id: u32) {
        self.sequence_id = sequence_id;
    }

    pub fn routing_header(&self) -> RoutingHeader {
        RoutingHeader {
            net_src: self.net_src(),
            net_dst: self.net_dst(),
            sequence_id: self.sequence_id,
        }
    }

    pub fn set_routing_header(&mut self, header: RoutingHeader) {
        self.routing.set_net_points(header.net_src, header.net_dst);
        self.sequence_id = header.sequence_id;
    }

    /// Copy addresses and sequence id from another wrapper.
    pub fn copy_routing_from(&mut self, src: &Self) {
        self.routing.copy_net_points(&src.routing);
        self.sequence_id = src.sequence_id;
    }

    pub(crate) fn clear_routing(&mut self) {
        self.routing.clear_net_points();
        self.sequence_id = 0;
    }

    /// Slot index inside the owning pool; `None` for free-standing wrappers.
    #[inline]
    pub fn slot_id(&self) -> Option<u32> {
        self.slot_id
    }

    #[inline]
    pub fn is_pooled(&self) -> bool {
        self.pool.is_some()
    }

    pub(crate) fn pool(&self) -> Option<&Weak<PoolShared<T, R, D>>> {
        self.pool.as_ref()
    }

    /// The payload as `U`, or `None` when `U` is not the payload type.
    ///
    /// Matches on the concrete Rust type, so it holds for wrappers tagged by
    /// any registry.
    pub fn check_msg<U: 'static>(&self) -> Option<&U> {
        (&*self.payload as &dyn Any).downcast_ref::<U>()
    }

    pub fn check_msg_mut<U: 'static>(&mut self) -> Option<&mut U> {
        (&mut *self.payload as &mut dyn Any).downcast_mut::<U>()
    }
}

impl<T, R, D> Deref for MessageWrapper<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    type Target = T;

    fn deref(&self) -> &T {
        &self.payload
    }
}

impl<T, R, D> DerefMut for MessageWrapper<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    fn deref_mut(&mut self) -> &mut T {
        &mut self.payload
    }
}

impl<T, R, D> Drop for MessageWrapper<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    fn drop(&mut self) {
        // Safety: the payload is taken exactly once, here.
        let payload = unsafe { ManuallyDrop::take(&mut self.payload) };
        D::dispose(payload);
    }
}

impl<T, R, D> fmt::Debug for MessageWrapper<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_wrapper(self, f)
    }
}
