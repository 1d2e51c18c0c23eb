//! Reverse name lookup seam

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::account::ChainId;
use crate::error::AccountsError;

/// Reverse resolution of an address to its primary name
#[async_trait]
pub trait NameLookupService: Send + Sync {
    /// `Ok(None)` when the address has no name on this chain
    async fn reverse_lookup(
        &self,
        address: &str,
        chain: ChainId,
    ) -> Result<Option<String>, AccountsError>;
}

#[async_trait]
impl<T: NameLookupService + ?Sized> NameLookupService for Arc<T> {
    async fn reverse_lookup(
        &self,
        address: &str,
        chain: ChainId,
    ) -> Result<Option<String>, AccountsError> {
        (**self).reverse_lookup(address, chain).await
    }
}

struct CacheEntry {
    name: Option<String>,
    fetched_at: Instant,
}

/// TTL cache in front of another lookup service.
///
/// Both hits and confirmed misses are cached; errors are not.
pub struct CachedLookup<L> {
    inner: L,
    ttl: Duration,
    entries: Mutex<HashMap<(ChainId, String), CacheEntry>>,
}

impl<L: NameLookupService> CachedLookup<L> {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

    pub fn new(inner: L) -> Self {
        Self::with_ttl(inner, Self::DEFAULT_TTL)
    }

    pub fn with_ttl(inner: L, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, key: &(ChainId, String)) -> Option<Option<String>> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(key)
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| e.name.clone())
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

#[async_trait]
impl<L: NameLookupService> NameLookupService for CachedLookup<L> {
    async fn reverse_lookup(
        &self,
        address: &str,
        chain: ChainId,
    ) -> Result<Option<String>, AccountsError> {
        let key = (chain, address.to_lowercase());
        if let Some(name) = self.cached(&key) {
            debug!("ENS cache hit for {} on {}", address, chain);
            return Ok(name);
        }

        let name = self.inner.reverse_lookup(address, chain).await?;
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key,
                CacheEntry {
                    name: name.clone(),
                    fetched_at: Instant::now(),
                },
            );
        }
        Ok(name)
    }
}
