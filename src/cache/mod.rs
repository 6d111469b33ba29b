//! Cache module - named in-memory caches backed by Moka.
//!
//! - `CacheRegistry` - central registry holding all named caches
//! - `TypedCache` - typed handle over a single Moka cache
//! - `CacheConfig` - capacity and expiry settings per cache
//!
//! ```rust,ignore
//! let langs = registry.get_or_create::<u64, String>("user_lang", CacheConfig::default());
//! langs.insert(user_id, "pt".to_string());
//! ```

mod config;
mod registry;
mod typed;

pub use config::CacheConfig;
pub use registry::CacheRegistry;
pub use typed::TypedCache;
