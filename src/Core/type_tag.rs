// Run-time type tags: one small integer per distinct payload type.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Integer identifying a payload's concrete type.
///
/// Tags are handed out lazily by a [`TypeRegistry`], starting at 1, and stay
/// stable for the lifetime of that registry.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeTag(u32);

impl TypeTag {
    /// Tag of `T` in the process-wide default registry.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        GLOBAL_TYPES.tag_for::<T>()
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Rebuild a tag from its wire value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

lazy_static! {
    static ref GLOBAL_TYPES: Arc<TypeRegistry> = Arc::new(TypeRegistry::new());
}

/// Binds each Rust type to a freshly incremented tag on first request.
///
/// The first caller for a given type wins: concurrent first callers serialize
/// on the write lock and all observe the same value.
pub struct TypeRegistry {
    next: AtomicU32,
    tags: RwLock<HashMap<TypeId, TypeTag>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(0),
            tags: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide default registry backing [`TypeTag::of`].
    pub fn global() -> Arc<TypeRegistry> {
        Arc::clone(&GLOBAL_TYPES)
    }

    pub fn tag_for<T: ?Sized + 'static>(&self) -> TypeTag {
        let id = TypeId::of::<T>();
        if let Some(tag) = self.tags.read().get(&id) {
            return *tag;
        }

        let mut tags = self.tags.write();
        *tags
            .entry(id)
            .or_insert_with(|| TypeTag(self.next.fetch_add(1, Ordering::Relaxed) + 1))
    }

    /// Tag of `T` if one was already assigned; never assigns.
    pub fn lookup<T: ?Sized + 'static>(&self) -> Option<TypeTag> {
        self.tags.read().get(&TypeId::of::<T>()).copied()
    }

    /// Number of types bound so far.
    pub fn len(&self) -> usize {
        self.tags.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("bound", &self.len())
            .field("last_tag", &self.next.load(Ordering::Relaxed))
            .finish()
    }
}
