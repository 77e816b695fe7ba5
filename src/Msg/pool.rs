use super::handle::Handle;
use super::policy::{Assign, DeletionPolicy, DropPayload, Routed, RoutingPolicy};
use super::wrapper::{MessageWrapper, Payload};
use crate::Core::guard::QueueLock;
use crate::Core::type_tag::TypeTag;
use crossbeam_utils::CachePadded;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Point-in-time occupancy of a pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolStats {
    pub tag: TypeTag,
    pub size: usize,
    /// Instances waiting in the queue.
    pub available: usize,
    /// Instances currently held through handles.
    pub checked_out: usize,
    pub alive: bool,
}

/// State shared between a pool and the wrappers it created.
///
/// Wrappers reach it through a `Weak` back-reference, so a torn-down pool is
/// never resurrected by an in-flight release.
pub(crate) struct PoolShared<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    queue: QueueLock<VecDeque<Box<MessageWrapper<T, R, D>>>>,
    /// Cleared strictly before the queue is drained on teardown.
    alive: CachePadded<AtomicBool>,
    /// Updated only while the queue lock is held.
    checked_out: CachePadded<AtomicUsize>,
    size: usize,
    tag: TypeTag,
}

impl<T, R, D> PoolShared<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    fn take(&self) -> Option<Box<MessageWrapper<T, R, D>>> {
        let mut queue = self.queue.lock();
        let wrapper = queue.pop_front()?;
        self.checked_out.fetch_add(1, Ordering::AcqRel);
        Some(wrapper)
    }

    /// Return path of the last handle: clear routing and re-enqueue, or
    /// delete the instance if the pool has been torn down.
    pub(crate) fn put_back(&self, mut wrapper: Box<MessageWrapper<T, R, D>>) {
        wrapper.clear_routing();

        let mut queue = self.queue.lock();
        if self.alive.load(Ordering::Acquire) {
            queue.push_back(wrapper);
            self.checked_out.fetch_sub(1, Ordering::AcqRel);
            return;
        }
        drop(queue);

        tracing::debug!(
            tag = %self.tag,
            slot = ?wrapper.slot_id(),
            "pool already destroyed, deleting returned instance"
        );
        drop(wrapper);
    }

    pub(crate) fn try_acquire(&self) -> Option<Handle<T, R, D>> {
        match self.take() {
            Some(wrapper) => Some(Handle::from_box(wrapper)),
            None => {
                tracing::trace!(tag = %self.tag, size = self.size, "pool exhausted");
                None
            }
        }
    }

    /// Acquire a fresh instance and copy routing and payload from `src`.
    ///
    /// On exhaustion or a failed payload copy the result is `None`; a
    /// partially prepared instance goes straight back to the queue.
    pub(crate) fn clone_msg(&self, src: &MessageWrapper<T, R, D>) -> Option<Handle<T, R, D>>
    where
        T: Assign,
    {
        let mut handle = self.try_acquire()?;
        let copied = match handle.get_mut() {
            Some(dst) => {
                dst.copy_routing_from(src);
                dst.payload_mut().assign_from(src.payload())
            }
            None => false,
        };
        if copied {
            Some(handle)
        } else {
            tracing::trace!(tag = %self.tag, "payload copy failed, clone released");
            None
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    fn stats(&self) -> PoolStats {
        let queue = self.queue.lock();
        PoolStats {
            tag: self.tag,
            size: self.size,
            available: queue.len(),
            checked_out: self.checked_out.load(Ordering::Acquire),
            alive: self.alive.load(Ordering::Acquire),
        }
    }
}

/// Bounded, thread-safe pool of preconstructed messages of one payload type.
///
/// Acquisition never blocks beyond the queue lock: an exhausted pool yields
/// `None` and back-pressure is left to the caller. Handles return their
/// instance automatically when the last reference drops. While the pool is
/// alive, `checked_out + available == size`.
pub struct Pool<T, R = Routed, D = DropPayload>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    shared: Arc<PoolShared<T, R, D>>,
}

impl<T, R, D> Pool<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    /// Preallocate `size` messages built by `ctor`, tagged from the
    /// process-wide registry.
    pub fn new(size: usize, ctor: impl FnMut() -> T) -> Self {
        Self::with_tag(size, TypeTag::of::<T>(), ctor)
    }

    pub fn with_tag(size: usize, tag: TypeTag, mut ctor: impl FnMut() -> T) -> Self {
        match Self::try_with_tag(size, tag, || Ok::<T, Infallible>(ctor())) {
            Ok(pool) => pool,
            Err(never) => match never {},
        }
    }

    /// Like [`Pool::new`] with a fallible constructor; the first error aborts
    /// construction and is returned.
    pub fn try_new<E>(size: usize, ctor: impl FnMut() -> Result<T, E>) -> Result<Self, E> {
        Self::try_with_tag(size, TypeTag::of::<T>(), ctor)
    }

    pub fn try_with_tag<E>(
        size: usize,
        tag: TypeTag,
        mut ctor: impl FnMut() -> Result<T, E>,
    ) -> Result<Self, E> {
        let shared = Arc::new(PoolShared {
            queue: QueueLock::new(VecDeque::with_capacity(size)),
            alive: CachePadded::new(AtomicBool::new(true)),
            checked_out: CachePadded::new(AtomicUsize::new(0)),
            size,
            tag,
        });

        let home = Arc::downgrade(&shared);
        {
            let mut queue = shared.queue.lock();
            for slot in 0..size {
                let payload = ctor()?;
                queue.push_back(Box::new(MessageWrapper::pooled(
                    payload,
                    tag,
                    slot as u32,
                    home.clone(),
                )));
            }
        }

        tracing::debug!(tag = %tag, size, "message pool created");
        Ok(Self { shared })
    }

    /// Non-blocking pop; `None` when every instance is checked out.
    pub fn try_acquire(&self) -> Option<Handle<T, R, D>> {
        self.shared.try_acquire()
    }

    /// Acquire an instance carrying a copy of `src`'s routing header and payload.
    pub fn clone_msg(&self, src: &MessageWrapper<T, R, D>) -> Option<Handle<T, R, D>>
    where
        T: Assign,
    {
        self.shared.clone_msg(src)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.shared.size
    }

    #[inline]
    pub fn tag(&self) -> TypeTag {
        self.shared.tag
    }

    /// Instances currently queued.
    pub fn available(&self) -> usize {
        self.shared.queue.lock().len()
    }

    /// Instances currently held through handles.
    pub fn checked_out(&self) -> usize {
        self.shared.checked_out.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.shared.is_alive()
    }

    /// Consistent snapshot taken under the queue lock.
    pub fn stats(&self) -> PoolStats {
        self.shared.stats()
    }
}

impl<T, R, D> Drop for Pool<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    fn drop(&mut self) {
        // Mark dead before touching the queue so racing releases delete instead.
        self.shared.alive.store(false, Ordering::SeqCst);
        let queued = std::mem::take(&mut *self.shared.queue.lock());

        tracing::debug!(
            tag = %self.shared.tag,
            size = self.shared.size,
            queued = queued.len(),
            "message pool destroyed"
        );
        drop(queued);
    }
}

impl<T, R, D> fmt::Debug for Pool<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_pool(&self.stats(), f)
    }
}
