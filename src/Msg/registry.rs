use super::handle::Handle;
use super::policy::{DeletionPolicy, DropPayload, Routed, RoutingPolicy};
use super::pool::{Pool, PoolStats};
use super::wrapper::Payload;
use crate::Core::type_tag::{TypeRegistry, TypeTag};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

trait RegisteredPool: Send + Sync {
    fn stats(&self) -> PoolStats;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T, R, D> RegisteredPool for Pool<T, R, D>
where
    T: Payload,
    R: RoutingPolicy,
    D: DeletionPolicy<T>,
{
    fn stats(&self) -> PoolStats {
        Pool::stats(self)
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Directory of pools keyed by payload type tag.
///
/// Holds one pool per payload type; inserting a second pool for the same type
/// replaces the first. Dropping the registry drops every pool it still owns.
pub struct PoolRegistry {
    types: Arc<TypeRegistry>,
    pools: RwLock<HashMap<TypeTag, Arc<dyn RegisteredPool>>>,
}

impl PoolRegistry {
    /// A registry keyed by the process-wide type tags.
    pub fn new() -> Self {
        Self::with_type_registry(TypeRegistry::global())
    }

    pub fn with_type_registry(types: Arc<TypeRegistry>) -> Self {
        Self {
            types,
            pools: RwLock::new(HashMap::new()),
        }
    }

    pub fn type_registry(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    /// Register `pool` under its payload's tag. Returns `true` if an earlier
    /// pool for the same payload type was replaced.
    pub fn insert<T, R, D>(&self, pool: Arc<Pool<T, R, D>>) -> bool
    where
        T: Payload,
        R: RoutingPolicy,
        D: DeletionPolicy<T>,
    {
        let tag = self.types.tag_for::<T>();
        if pool.tag() != tag {
            tracing::warn!(
                registry_tag = %tag,
                pool_tag = %pool.tag(),
                "pool was tagged by a different type registry"
            );
        }

        let replaced = self.pools.write().insert(tag, pool).is_some();
        if replaced {
            tracing::debug!(tag = %tag, "replaced registered pool");
        }
        replaced
    }

    /// The pool for payload `T` with policies `R` and `D`, if registered.
    pub fn lookup<T, R, D>(&self) -> Option<Arc<Pool<T, R, D>>>
    where
        T: Payload,
        R: RoutingPolicy,
        D: DeletionPolicy<T>,
    {
        let tag = self.types.lookup::<T>()?;
        let pool = Arc::clone(self.pools.read().get(&tag)?);
        pool.into_any_arc().downcast::<Pool<T, R, D>>().ok()
    }

    /// Acquire from the pool for `T`; `None` if unregistered or exhausted.
    pub fn acquire<T, R, D>(&self) -> Option<Handle<T, R, D>>
    where
        T: Payload,
        R: RoutingPolicy,
        D: DeletionPolicy<T>,
    {
        self.lookup::<T, R, D>()?.try_acquire()
    }

    /// [`PoolRegistry::acquire`] with the default policies.
    pub fn acquire_routed<T: Payload>(&self) -> Option<Handle<T, Routed, DropPayload>> {
        self.acquire::<T, Routed, DropPayload>()
    }

    /// Unregister the pool for `T`. Outstanding handles stay valid; the pool
    /// is torn down once no other owner holds it.
    pub fn remove<T: 'static>(&self) -> bool {
        match self.types.lookup::<T>() {
            Some(tag) => self.pools.write().remove(&tag).is_some(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.pools.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.read().is_empty()
    }

    /// Occupancy of every registered pool, ordered by tag and logged at info.
    pub fn pool_info(&self) -> Vec<PoolStats> {
        let mut stats: Vec<PoolStats> = self.pools.read().values().map(|p| p.stats()).collect();
        stats.sort_by_key(|s| s.tag);

        for s in &stats {
            tracing::info!(
                tag = %s.tag,
                size = s.size,
                available = s.available,
                checked_out = s.checked_out,
                "pool info"
            );
        }
        stats
    }
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PoolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("pools", &self.len())
            .field("types", &self.types.len())
            .finish()
    }
}
