// Shared, read-mostly catalog store. Consumers across threads read cloned
// values out of the current snapshot while a publisher swaps in whole
// catalogs atomically. Lookup accounting mirrors what the serving layer
// wants to watch: hits, misses, publishes.
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::destination::Destination;
use crate::ingest::ProcessedCatalog;
use crate::product::Product;

#[derive(Debug, Default)]
struct StoreStats {
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
    publish_count: AtomicUsize,
}

// Point-in-time view of the store counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreStatsReport {
    pub generation: u64,
    pub destinations: usize,
    pub products: usize,
    pub listings: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub publish_count: usize,
}

#[derive(Debug, Default)]
pub struct CatalogStore {
    snapshot: RwLock<Option<Arc<ProcessedCatalog>>>,
    generation: AtomicU64,
    stats: StoreStats,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: ProcessedCatalog) -> Self {
        let store = Self::new();
        store.publish(catalog);
        store
    }

    // Atomically replace the served snapshot. Readers holding the previous
    // Arc keep a consistent view until they drop it.
    pub fn publish(&self, catalog: ProcessedCatalog) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            feed_id = %catalog.feed_id,
            generation,
            destinations = catalog.destination_count(),
            products = catalog.product_count(),
            "publishing catalog snapshot"
        );
        *self.snapshot.write() = Some(Arc::new(catalog));
        self.stats.publish_count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        *self.snapshot.write() = None;
    }

    fn current(&self) -> Option<Arc<ProcessedCatalog>> {
        self.snapshot.read().clone()
    }

    fn record(&self, hit: bool) {
        if hit {
            self.stats.hit_count.fetch_add(1, Ordering::SeqCst);
        } else {
            self.stats.miss_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn destination(&self, destination_id: u64) -> Option<Destination> {
        let found = self
            .current()
            .and_then(|catalog| catalog.destination(destination_id).cloned());
        self.record(found.is_some());
        found
    }

    pub fn product(&self, product_code: &str) -> Option<Product> {
        let found = self
            .current()
            .and_then(|catalog| catalog.product(product_code).cloned());
        self.record(found.is_some());
        found
    }

    pub fn products_for(&self, destination_id: u64) -> Vec<Product> {
        let products: Vec<Product> = self
            .current()
            .map(|catalog| {
                catalog
                    .products_for(destination_id)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        self.record(!products.is_empty());
        products
    }

    pub fn stats(&self) -> StoreStatsReport {
        let snapshot = self.current();
        StoreStatsReport {
            generation: self.generation.load(Ordering::SeqCst),
            destinations: snapshot
                .as_ref()
                .map_or(0, |catalog| catalog.destination_count()),
            products: snapshot
                .as_ref()
                .map_or(0, |catalog| catalog.product_count()),
            listings: snapshot
                .as_ref()
                .map_or(0, |catalog| catalog.listing_count()),
            hit_count: self.stats.hit_count.load(Ordering::SeqCst),
            miss_count: self.stats.miss_count.load(Ordering::SeqCst),
            publish_count: self.stats.publish_count.load(Ordering::SeqCst),
        }
    }
}
