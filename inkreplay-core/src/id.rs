//! # IDs
//! Strokes (and anything else that needs it) are identified by a serial number, implemented in this module
//! via the `SerialID<T>` type, namespaced by the type T.
//!
//! IDs are handed out by an [`IdServer`], which is owned by whatever context creates the objects
//! (see [`crate::document::Document`]). There is no process-wide counter: two servers may hand out the same
//! numeric value, so IDs are only comparable when they came from the same server.

/// Monotonic source of [`SerialID`]s. IDs are strictly increasing in allocation order.
pub struct IdServer<T: std::any::Any> {
    // Next ID to hand out. Never zero.
    next: std::sync::atomic::AtomicU64,
    _phantom: std::marker::PhantomData<fn() -> T>,
}
impl<T: std::any::Any> Default for IdServer<T> {
    fn default() -> Self {
        Self {
            next: 1.into(),
            _phantom: std::marker::PhantomData,
        }
    }
}
impl<T: std::any::Any> IdServer<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Allocate a single ID, greater than every ID previously allocated by this server.
    #[must_use]
    pub fn allocate(&self) -> SerialID<T> {
        // Unwrap ok - `many(1)` always yields exactly one.
        self.many(1).next().unwrap()
    }
    /// Allocate many IDs at once, in increasing order.
    ///
    /// IDs are assigned eagerly - dropping the returned iterator early does *not* recycle the unused IDs.
    /// Exhausting all `u64::MAX - 1` IDs of a server is a fatal error.
    pub fn many(&self, count: usize) -> impl ExactSizeIterator<Item = SerialID<T>> {
        // Usize is always <= 64bits
        let count_u64 = count as u64;

        let start_id = self
            .next
            .fetch_add(count_u64, std::sync::atomic::Ordering::Relaxed);

        // Wrapped past zero, or the last ID of this batch doesn't fit.
        let last_fits = count_u64 == 0 || start_id.checked_add(count_u64 - 1).is_some();
        if start_id == 0 || !last_fits {
            // Poison so subsequent allocs keep failing instead of reusing numbers.
            self.next.store(0, std::sync::atomic::Ordering::Relaxed);
            log::error!("{} ID overflow!", std::any::type_name::<T>());
            panic!("{} ID overflow!", std::any::type_name::<T>());
        }

        (0..count).map(move |idx| SerialID {
            // Non-zero-ness checked above.
            id: std::num::NonZeroU64::new(idx as u64 + start_id).unwrap(),
            _phantom: std::marker::PhantomData,
        })
    }
}
impl<T: std::any::Any> std::fmt::Debug for IdServer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdServer")
            .field("namespace", &std::any::type_name::<T>())
            .field("next", &self.next)
            .finish()
    }
}

/// ID unique within the [`IdServer`] that allocated it.
/// IDs with different types may share a value but should not be considered equal.
pub struct SerialID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    // Namespace marker
    _phantom: std::marker::PhantomData<fn() -> T>,
}
impl<T: std::any::Any> Clone for SerialID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for SerialID<T> {}
impl<T: std::any::Any> PartialEq for SerialID<T> {
    fn eq(&self, other: &Self) -> bool {
        // Namespace already checked at compile time.
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for SerialID<T> {}
impl<T: std::any::Any> PartialOrd for SerialID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: std::any::Any> Ord for SerialID<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
impl<T: std::any::Any> std::hash::Hash for SerialID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl<T: std::any::Any> SerialID<T> {
    /// Get the raw numeric value of this ID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
}
impl<T: std::any::Any> std::fmt::Display for SerialID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        //Unwrap here is safe - the rsplit will always return at least one element, even for empty strings.
        write!(
            f,
            "{}#{}",
            std::any::type_name::<T>().rsplit("::").next().unwrap(),
            self.id
        )
    }
}
impl<T: std::any::Any> std::fmt::Debug for SerialID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}
