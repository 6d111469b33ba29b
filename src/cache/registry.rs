//! Cache registry - Central management for all caches.

use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::{CacheConfig, TypedCache};

/// Central registry for managing multiple typed caches.
///
/// Repositories and session stores ask the registry for their cache by
/// name, so two components asking for the same name share one cache.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

/// Type-erased cache plus the type name it was created with.
struct CacheEntry {
    cache: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl CacheRegistry {
    /// Create a new empty cache registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an existing cache or create and register a new one.
    ///
    /// If the name is already taken by a cache of different types, a fresh
    /// unregistered cache is returned and the conflict is logged.
    pub fn get_or_create<K, V>(&self, name: &str, config: CacheConfig) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        if let Some(entry) = self.caches.read().get(name) {
            return match entry.cache.downcast_ref::<TypedCache<K, V>>() {
                Some(cache) => cache.clone(),
                None => {
                    warn!(
                        "Cache '{}' already exists as {}, requested {}",
                        name,
                        entry.type_name,
                        std::any::type_name::<TypedCache<K, V>>()
                    );
                    TypedCache::new(name, config)
                }
            };
        }

        let mut caches = self.caches.write();
        // Another task may have registered it between the two locks.
        if let Some(cache) = caches
            .get(name)
            .and_then(|entry| entry.cache.downcast_ref::<TypedCache<K, V>>())
        {
            return cache.clone();
        }

        debug!("Creating cache: {}", name);
        let cache = TypedCache::new(name, config);
        caches.insert(
            name.to_string(),
            CacheEntry {
                cache: Box::new(cache.clone()),
                type_name: std::any::type_name::<TypedCache<K, V>>(),
            },
        );
        cache
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &caches.len())
            .field("cache_names", &caches.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_shares_cache() {
        let registry = CacheRegistry::new();
        let a: TypedCache<u64, String> = registry.get_or_create("langs", CacheConfig::default());
        let b: TypedCache<u64, String> = registry.get_or_create("langs", CacheConfig::default());

        a.insert(1, "pt".to_string());
        assert_eq!(b.get(&1), Some("pt".to_string()));
        assert_eq!(registry.caches.read().len(), 1);
    }

    #[test]
    fn test_type_conflict_returns_detached_cache() {
        let registry = CacheRegistry::new();
        let a: TypedCache<u64, String> = registry.get_or_create("x", CacheConfig::default());
        let b: TypedCache<u64, u64> = registry.get_or_create("x", CacheConfig::default());

        a.insert(1, "one".to_string());
        b.insert(1, 1);
        assert_eq!(a.get(&1), Some("one".to_string()));
        assert_eq!(registry.caches.read().len(), 1);
    }
}
