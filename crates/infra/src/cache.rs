//! Path-scoped cache of rendered listing data.
//!
//! Reads of a route are cached under the route path. A successful mutation
//! calls [`PathRevalidator::revalidate_path`] with the affected path, which
//! drops the cached value so the next read goes back to the store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use invoicedesk_invoicing::Invoice;

/// Route whose data every invoice mutation invalidates.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Receives "data for this path is stale" signals.
pub trait PathRevalidator: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

impl<R> PathRevalidator for Arc<R>
where
    R: PathRevalidator + ?Sized,
{
    fn revalidate_path(&self, path: &str) {
        (**self).revalidate_path(path)
    }
}

#[derive(Debug)]
struct PathEntry<V> {
    value: Option<Cached<V>>,
    revalidations: u64,
}

impl<V> Default for PathEntry<V> {
    fn default() -> Self {
        Self {
            value: None,
            revalidations: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct Cached<V> {
    value: V,
    cached_at: DateTime<Utc>,
}

/// In-process cache keyed by route path.
#[derive(Debug)]
pub struct PathCache<V> {
    entries: RwLock<HashMap<String, PathEntry<V>>>,
}

/// Cache for the invoice listing.
pub type ListingCache = PathCache<Vec<Invoice>>;

impl<V> PathCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for PathCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> PathCache<V> {
    /// Cached value for `path`, if one is present.
    pub fn get(&self, path: &str) -> Option<V> {
        let map = self.entries.read().ok()?;
        map.get(path)?.value.as_ref().map(|c| c.value.clone())
    }

    /// When the current value for `path` was stored.
    pub fn cached_at(&self, path: &str) -> Option<DateTime<Utc>> {
        let map = self.entries.read().ok()?;
        map.get(path)?.value.as_ref().map(|c| c.cached_at)
    }

    pub fn put(&self, path: &str, value: V) {
        if let Ok(mut map) = self.entries.write() {
            map.entry(path.to_string()).or_default().value = Some(Cached {
                value,
                cached_at: Utc::now(),
            });
        }
    }

    /// Store `value` only if `path` has not been revalidated since
    /// `generation` was read with [`PathCache::revalidations`].
    ///
    /// Returns whether the value was stored. A reader that loaded `value`
    /// before a concurrent mutation revalidated the path must not put it back.
    pub fn put_if_current(&self, path: &str, generation: u64, value: V) -> bool {
        let Ok(mut map) = self.entries.write() else {
            return false;
        };
        let entry = map.entry(path.to_string()).or_default();
        if entry.revalidations != generation {
            tracing::debug!(path, generation, current = entry.revalidations, "stale listing not cached");
            return false;
        }
        entry.value = Some(Cached {
            value,
            cached_at: Utc::now(),
        });
        true
    }

    /// Number of times `path` has been revalidated.
    pub fn revalidations(&self, path: &str) -> u64 {
        self.entries
            .read()
            .ok()
            .and_then(|map| map.get(path).map(|e| e.revalidations))
            .unwrap_or(0)
    }
}

impl<V: Send + Sync> PathRevalidator for PathCache<V> {
    fn revalidate_path(&self, path: &str) {
        match self.entries.write() {
            Ok(mut map) => {
                let entry = map.entry(path.to_string()).or_default();
                entry.value = None;
                entry.revalidations += 1;
                tracing::debug!(path, revalidations = entry.revalidations, "path revalidated");
            }
            Err(_) => tracing::warn!(path, "path cache lock poisoned; revalidation skipped"),
        }
    }
}
