use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use vc_shape::TypeDescriptor;
use vc_shape::info::ShapeInfo;
use vc_utils::TypeIdMap;

use crate::WritePlan;

// -----------------------------------------------------------------------------
// PlanCache

/// Concurrent map from type to its [`WritePlan`].
///
/// Plans are built on first use. A miss builds the plan without holding
/// any lock, then inserts it unless another thread got there first; every
/// caller ends up with the entry that won. Entries are never removed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_json::PlanCache;
/// use vc_shape::Typed;
///
/// let cache = PlanCache::new();
/// let a = cache.get_or_build(<Vec<u8> as Typed>::shape_info());
/// let b = cache.get_or_build(<Vec<u8> as Typed>::shape_info());
///
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(cache.len(), 1);
/// ```
pub struct PlanCache {
    plans: RwLock<TypeIdMap<Arc<WritePlan>>>,
    builds: AtomicUsize,
}

static GLOBAL: LazyLock<Arc<PlanCache>> = LazyLock::new(|| Arc::new(PlanCache::new()));

impl PlanCache {
    #[inline]
    pub const fn new() -> Self {
        Self {
            plans: RwLock::new(TypeIdMap::new()),
            builds: AtomicUsize::new(0),
        }
    }

    /// Returns the process-wide cache.
    #[inline]
    pub fn global() -> &'static Arc<PlanCache> {
        &GLOBAL
    }

    /// Returns the plan for `info`, building it on a miss.
    pub fn get_or_build(&self, info: &'static ShapeInfo) -> Arc<WritePlan> {
        let descriptor = info.descriptor();
        if let Some(plan) = self.read().get(&descriptor.id()) {
            return Arc::clone(plan);
        }

        let built = Arc::new(WritePlan::build(info));
        self.builds.fetch_add(1, Ordering::Relaxed);

        let mut plans = self.write();
        let plan = plans.get_or_insert(descriptor.id(), || Arc::clone(&built));
        if Arc::ptr_eq(plan, &built) {
            log::debug!("built write plan for `{descriptor}`");
        } else {
            log::debug!("discarded concurrent write plan build for `{descriptor}`");
        }
        Arc::clone(plan)
    }

    /// Returns the cached plan without building.
    pub fn get(&self, descriptor: TypeDescriptor) -> Option<Arc<WritePlan>> {
        self.read().get(&descriptor.id()).cloned()
    }

    #[inline]
    pub fn contains(&self, descriptor: TypeDescriptor) -> bool {
        self.read().contains(&descriptor.id())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Number of plan builds so far, including discarded duplicates.
    #[inline]
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, TypeIdMap<Arc<WritePlan>>> {
        self.plans.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, TypeIdMap<Arc<WritePlan>>> {
        self.plans.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PlanCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlanCache")
            .field("len", &self.len())
            .field("builds", &self.build_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::sync::Arc;
    use std::sync::Barrier;
    use std::thread;

    use vc_shape::{Typed, impl_shape_struct};

    use super::PlanCache;
    use crate::WritePlan;

    struct Reading {
        sensor: String,
        values: Vec<f64>,
        tags: BTreeMap<String, String>,
    }

    impl_shape_struct!(Reading {
        sensor: String,
        values: Vec<f64>,
        tags: BTreeMap<String, String>,
    });

    #[test]
    fn concurrent_builds_agree() {
        const THREADS: usize = 8;

        let cache = PlanCache::new();
        let barrier = Barrier::new(THREADS);
        let plans: Vec<Arc<WritePlan>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cache.get_or_build(Reading::shape_info())
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.len(), 1);
        assert!(cache.build_count() >= 1);
        for plan in &plans {
            assert!(Arc::ptr_eq(plan, &plans[0]));
            assert_eq!(**plan, WritePlan::build(Reading::shape_info()));
        }
    }

    #[test]
    fn lookups_do_not_build() {
        let cache = PlanCache::new();
        let info = <Vec<String> as Typed>::shape_info();
        assert!(cache.get(info.descriptor()).is_none());

        cache.get_or_build(info);
        cache.get_or_build(info);
        assert_eq!(cache.build_count(), 1);
        assert!(cache.contains(info.descriptor()));
        assert!(!cache.is_empty());
    }
}
