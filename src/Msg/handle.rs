use super::policy::{Assign, DeletionPolicy, DropPayload, Routed, RoutingPolicy};
use super::wrapper::{MessageWrapper, Payload, RoutingHeader};
use crate::Core::type_tag::TypeTag;
use std::any::Any;
use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::sync::Arc;

/// Exclusive owner of a wrapper for as long as any handle refers to it.
///
/// Dropping the lease is the single release point: the wrapper goes back to
/// its pool if the pool is still alive, otherwise it is destroyed here.
pub(crate) struct Lease<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    wrapper: ManuallyDrop<Box<MessageWrapper<T, R, D>>>,
}

impl<T, R, D> Drop for Lease<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    fn drop(&mut self) {
        // Safety: the wrapper is taken exactly once, here.
        let wrapper = unsafe { ManuallyDrop::take(&mut self.wrapper) };

        match wrapper.pool().and_then(|home| home.upgrade()) {
            Some(shared) => shared.put_back(wrapper),
            None => drop(wrapper),
        }
    }
}

/// Shared, reference-counted access to a message.
///
/// Cloning a handle fans the same message out to another holder; it does not
/// copy the payload (see [`Handle::clone_msg`]). The message is released when
/// the last handle drops.
pub struct Handle<T, R = Routed, D = DropPayload>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    lease: Arc<Lease<T, R, D>>,
}

impl<T, R, D> Handle<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    /// A free-standing message, destroyed when its last handle drops.
    pub fn new(payload: T) -> Self {
        Self::from_wrapper(MessageWrapper::new(payload))
    }

    pub fn from_wrapper(wrapper: MessageWrapper<T, R, D>) -> Self {
        Self::from_box(Box::new(wrapper))
    }

    pub(crate) fn from_box(wrapper: Box<MessageWrapper<T, R, D>>) -> Self {
        Self {
            lease: Arc::new(Lease {
                wrapper: ManuallyDrop::new(wrapper),
            }),
        }
    }

    /// Mutable access, available only while this is the sole handle.
    pub fn get_mut(&mut self) -> Option<&mut MessageWrapper<T, R, D>> {
        Arc::get_mut(&mut self.lease).map(|lease| &mut **lease.wrapper)
    }

    #[inline]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.lease) == 1
    }

    /// Number of handles currently sharing this message.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.lease)
    }

    /// Whether both handles refer to the same message.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.lease, &other.lease)
    }

    /// Deep copy through the owning pool.
    ///
    /// `None` for free-standing messages, after the pool is gone, when the
    /// pool is exhausted, or when the payload refuses the copy.
    pub fn clone_msg(&self) -> Option<Self>
    where
        T: Assign,
    {
        let shared = self.pool()?.upgrade()?;
        if !shared.is_alive() {
            return None;
        }
        shared.clone_msg(self)
    }

    /// Erase the payload type.
    pub fn into_any(self) -> AnyHandle {
        AnyHandle(self.lease)
    }
}

impl<T, R, D> Clone for Handle<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    fn clone(&self) -> Self {
        Self {
            lease: Arc::clone(&self.lease),
        }
    }
}

impl<T, R, D> Deref for Handle<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    type Target = MessageWrapper<T, R, D>;

    fn deref(&self) -> &Self::Target {
        &self.lease.wrapper
    }
}

impl<T, R, D> fmt::Debug for Handle<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

/// Type-erased view of a message, for heterogeneous routing code.
pub trait AnyMessage: Send + Sync + 'static {
    fn msg_class_id(&self) -> TypeTag;
    fn routing_header(&self) -> RoutingHeader;
    fn slot_id(&self) -> Option<u32>;
    fn payload_any(&self) -> &dyn Any;
    fn payload_any_mut(&mut self) -> &mut dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl dyn AnyMessage {
    /// The payload as `U`, or `None` when `U` is not the payload type.
    pub fn check_msg<U: 'static>(&self) -> Option<&U> {
        self.payload_any().downcast_ref::<U>()
    }

    pub fn check_msg_mut<U: 'static>(&mut self) -> Option<&mut U> {
        self.payload_any_mut().downcast_mut::<U>()
    }
}

impl<T, R, D> AnyMessage for Lease<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    fn msg_class_id(&self) -> TypeTag {
        self.wrapper.msg_class_id()
    }

    fn routing_header(&self) -> RoutingHeader {
        self.wrapper.routing_header()
    }

    fn slot_id(&self) -> Option<u32> {
        self.wrapper.slot_id()
    }

    fn payload_any(&self) -> &dyn Any {
        self.wrapper.payload()
    }

    fn payload_any_mut(&mut self) -> &mut dyn Any {
        self.wrapper.payload_mut()
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A [`Handle`] with its payload type erased.
#[derive(Clone)]
pub struct AnyHandle(Arc<dyn AnyMessage>);

impl AnyHandle {
    #[inline]
    pub fn msg_class_id(&self) -> TypeTag {
        self.0.msg_class_id()
    }

    #[inline]
    pub fn routing_header(&self) -> RoutingHeader {
        self.0.routing_header()
    }

    #[inline]
    pub fn slot_id(&self) -> Option<u32> {
        self.0.slot_id()
    }

    pub fn check_msg<U: 'static>(&self) -> Option<&U> {
        self.0.check_msg::<U>()
    }

    /// Mutable payload access while this is the sole handle.
    pub fn check_msg_mut<U: 'static>(&mut self) -> Option<&mut U> {
        Arc::get_mut(&mut self.0)?.check_msg_mut::<U>()
    }

    /// Recover the typed handle; gives `self` back on a type mismatch.
    pub fn downcast<T, R, D>(self) -> std::result::Result<Handle<T, R, D>, AnyHandle>
    where
        T: Payload,
        R: RoutingPolicy,
        D: DeletionPolicy<T>,
    {
        match Arc::clone(&self.0).into_any_arc().downcast::<Lease<T, R, D>>() {
            Ok(lease) => Ok(Handle { lease }),
            Err(_) => Err(self),
        }
    }
}

impl fmt::Debug for AnyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyHandle")
            .field("tag", &self.msg_class_id())
            .field("routing", &self.routing_header())
            .field("slot_id", &self.slot_id())
            .finish()
    }
}
