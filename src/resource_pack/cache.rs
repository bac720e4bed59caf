//! Memoizing loader wrapper.
//!
//! Each asset path is fetched at most once per process. Concurrent requests
//! for the same path wait on the single in-flight fetch and all observe the
//! same `Arc`. Failures are cached as well.

use super::loader::ResourceLoader;
use super::path::ResourcePath;
use crate::error::{RenderError, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

type Slot<T> = Arc<OnceLock<std::result::Result<T, Arc<RenderError>>>>;

struct Memo<T> {
    slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T: Clone> Memo<T> {
    fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn get_or_load(&self, path: &ResourcePath, load: impl FnOnce() -> Result<T>) -> Result<T> {
        let key = path.to_string();
        // The map lock is only held long enough to find the slot.
        let slot = self.slots.lock().entry(key).or_default().clone();

        let mut fetched = false;
        let entry = slot.get_or_init(|| {
            fetched = true;
            load().map_err(Arc::new)
        });
        if !fetched {
            log::trace!("Cache hit for {}", path);
        }

        match entry {
            Ok(value) => Ok(value.clone()),
            Err(e) => Err(RenderError::Shared(e.clone())),
        }
    }

    fn len(&self) -> usize {
        self.slots.lock().len()
    }

    fn clear(&self) {
        self.slots.lock().clear();
    }
}

/// Wraps a loader and memoizes every JSON and texture fetch by path.
pub struct MemoizedLoader<L> {
    inner: L,
    json: Memo<Arc<Value>>,
    textures: Memo<Arc<Vec<u8>>>,
}

impl<L: ResourceLoader> MemoizedLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            json: Memo::new(),
            textures: Memo::new(),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Number of distinct paths requested so far.
    pub fn cached_entries(&self) -> usize {
        self.json.len() + self.textures.len()
    }
}

impl<L: ResourceLoader> ResourceLoader for MemoizedLoader<L> {
    fn load_json(&self, path: &ResourcePath) -> Result<Arc<Value>> {
        self.json.get_or_load(path, || self.inner.load_json(path))
    }

    fn load_texture(&self, path: &ResourcePath) -> Result<Arc<Vec<u8>>> {
        self.textures.get_or_load(path, || self.inner.load_texture(path))
    }

    fn close(&self) -> Result<()> {
        self.json.clear();
        self.textures.clear();
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::loader::MemoryLoader;
    use crate::types::ResourceLocation;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingLoader {
        inner: MemoryLoader,
        calls: AtomicUsize,
    }

    impl ResourceLoader for CountingLoader {
        fn load_json(&self, path: &ResourcePath) -> Result<Arc<Value>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.inner.load_json(path)
        }

        fn load_texture(&self, path: &ResourcePath) -> Result<Arc<Vec<u8>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.load_texture(path)
        }
    }

    fn model_path(id: &str) -> ResourcePath {
        ResourcePath::model(&ResourceLocation::parse(id).unwrap()).unwrap()
    }

    fn counting(inner: MemoryLoader) -> MemoizedLoader<CountingLoader> {
        MemoizedLoader::new(CountingLoader {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_fetches_once() {
        let path = model_path("block/stone");
        let loader = counting(MemoryLoader::new().with_json(&path, json!({"a": 1})));

        let first = loader.load_json(&path).unwrap();
        let second = loader.load_json(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(loader.cached_entries(), 1);
    }

    #[test]
    fn test_failures_are_memoized() {
        let loader = counting(MemoryLoader::new());
        let path = model_path("block/missing");

        assert!(loader.load_json(&path).unwrap_err().is_not_found());
        assert!(loader.load_json(&path).unwrap_err().is_not_found());
        assert_eq!(loader.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_requests_coalesce() {
        let path = model_path("block/stone");
        let loader = counting(MemoryLoader::new().with_json(&path, json!({"a": 1})));

        let results: Vec<Arc<Value>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| loader.load_json(&path).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(loader.inner().calls.load(Ordering::SeqCst), 1);
        for value in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], value));
        }
    }

    #[test]
    fn test_close_clears_cache() {
        let path = model_path("block/stone");
        let loader = counting(MemoryLoader::new().with_json(&path, json!({})));
        loader.load_json(&path).unwrap();
        loader.close().unwrap();
        assert_eq!(loader.cached_entries(), 0);
        loader.load_json(&path).unwrap();
        assert_eq!(loader.inner().calls.load(Ordering::SeqCst), 2);
    }
}
