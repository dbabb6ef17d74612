use std::{
    collections::{HashMap, VecDeque},
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::OnceCell;

use crate::{
    composition::model::Composition, foundation::error::LottieResult, load::resources::Theme,
    spec::source::CompositionSpec,
};

/// Default number of compositions kept by [`CompositionCache`].
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

/// Identity of a cached composition.
///
/// The full [`CompositionSpec`] is the key, so inline documents compare by their text. Bundled
/// resources are additionally qualified by the [`Theme`] they were resolved with; every other
/// source ignores the theme.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    spec: CompositionSpec,
    theme: Option<Theme>,
}

impl CacheKey {
    /// Key for `spec` loaded under `theme`.
    pub fn new(spec: CompositionSpec, theme: Theme) -> Self {
        let theme = matches!(spec, CompositionSpec::Resource(_)).then_some(theme);
        Self { spec, theme }
    }

    /// Source this key identifies.
    pub fn spec(&self) -> &CompositionSpec {
        &self.spec
    }

    /// Theme variant, for resource keys.
    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }
}

impl From<CompositionSpec> for CacheKey {
    fn from(spec: CompositionSpec) -> Self {
        Self::new(spec, Theme::default())
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.theme {
            Some(theme) => write!(f, "{} ({theme})", self.spec),
            None => write!(f, "{}", self.spec),
        }
    }
}

type Slot = Arc<OnceCell<Arc<Composition>>>;

#[derive(Default)]
struct Entries {
    slots: HashMap<Arc<CacheKey>, Slot>,
    // Least recently used first; holds in-flight keys too.
    order: VecDeque<Arc<CacheKey>>,
}

impl Entries {
    fn touch(&mut self, key: &CacheKey) {
        if let Some(pos) = self.order.iter().position(|k| **k == *key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    fn remove(&mut self, key: &CacheKey) -> Option<Slot> {
        if let Some(pos) = self.order.iter().position(|k| **k == *key) {
            self.order.remove(pos);
        }
        self.slots.remove(key)
    }

    fn completed(&self) -> usize {
        self.slots.values().filter(|s| s.initialized()).count()
    }
}

/// Bounded LRU of loaded compositions with per-key load de-duplication.
///
/// Concurrent loads of the same key share one underlying load. Only completed compositions count
/// toward the capacity. Failed loads leave nothing behind, so the next request tries again.
pub struct CompositionCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl Default for CompositionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl CompositionCache {
    /// Cache holding at most `capacity` completed compositions; `0` disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
        }
    }

    /// Maximum number of completed compositions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Completed composition for `key`, marking it most recently used.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Composition>> {
        let mut entries = self.lock();
        let value = entries.slots.get(key)?.get().cloned()?;
        entries.touch(key);
        Some(value)
    }

    /// Store an already-loaded composition under `key`.
    pub fn insert(&self, key: CacheKey, composition: Arc<Composition>) {
        if self.capacity == 0 {
            return;
        }
        let key = Arc::new(key);
        let mut entries = self.lock();
        entries.remove(&key);
        entries.slots.insert(
            Arc::clone(&key),
            Arc::new(OnceCell::new_with(Some(composition))),
        );
        entries.order.push_back(key);
        self.evict(&mut entries);
    }

    /// Drop `key`, returning its composition if it had finished loading.
    pub fn remove(&self, key: &CacheKey) -> Option<Arc<Composition>> {
        self.lock().remove(key)?.get().cloned()
    }

    /// Number of completed compositions.
    pub fn len(&self) -> usize {
        self.lock().completed()
    }

    /// Whether no completed composition is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything. Loads already in flight still complete for their callers.
    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.slots.clear();
        entries.order.clear();
    }

    /// Return the cached composition for `key`, or run `load` once and share its result.
    pub(crate) async fn get_or_try_load<F, Fut>(
        &self,
        key: &CacheKey,
        load: F,
    ) -> LottieResult<Arc<Composition>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = LottieResult<Arc<Composition>>>,
    {
        if self.capacity == 0 {
            return load().await;
        }

        let slot = {
            let mut entries = self.lock();
            match entries.slots.get(key).cloned() {
                Some(slot) => {
                    entries.touch(key);
                    slot
                }
                None => {
                    let slot: Slot = Arc::new(OnceCell::new());
                    let key = Arc::new(key.clone());
                    entries.slots.insert(Arc::clone(&key), Arc::clone(&slot));
                    entries.order.push_back(key);
                    slot
                }
            }
        };

        if let Some(hit) = slot.get() {
            tracing::debug!(%key, "composition cache hit");
            return Ok(Arc::clone(hit));
        }
        let result = slot.get_or_try_init(load).await.cloned();

        // The slot may have been evicted, removed or cleared while loading.
        let mut entries = self.lock();
        let current = entries
            .slots
            .get(key)
            .is_some_and(|s| Arc::ptr_eq(s, &slot));
        if current {
            if result.is_ok() {
                self.evict(&mut entries);
            } else if !slot.initialized() {
                entries.remove(key);
            }
        }
        result
    }

    fn evict(&self, entries: &mut Entries) {
        let mut completed = entries.completed();
        while completed > self.capacity {
            let oldest = entries
                .order
                .iter()
                .position(|k| entries.slots.get(k).is_some_and(|s| s.initialized()));
            let Some(key) = oldest.and_then(|pos| entries.order.remove(pos)) else {
                break;
            };
            entries.slots.remove(&key);
            completed -= 1;
            tracing::debug!(%key, "evicted composition from cache");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CompositionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositionCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/load/cache.rs"]
mod tests;
