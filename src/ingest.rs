// Feed ingestion: parse a catalog feed document, validate every entry
// against its schema, and index the survivors. Invalid entries are rejected
// individually and reported back alongside the catalog.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::destination::Destination;
use crate::feed::CatalogFeed;
use crate::hierarchy::{DestinationIndex, HierarchyError};
use crate::product::Product;
use crate::validate::{validate_destination, validate_product, ValidationError};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("feed carries no destinations and no products")]
    EmptyFeed,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Destination,
    Product,
}

// An entry that failed schema validation, with its position in the feed
// array so the producer can locate it.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEntry {
    pub kind: EntryKind,
    pub position: usize,
    pub error: ValidationError,
}

// Conjunctive product filter; unset criteria match everything. A product
// missing the metadata an active criterion needs is excluded, since the cap
// or floor cannot be proven to hold.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub max_duration_minutes: Option<u64>,
    pub title_contains: Option<String>,
    pub destination_id: Option<u64>,
    pub with_images: bool,
}

// Validated, indexed view of one feed document.
#[derive(Debug, Clone)]
pub struct ProcessedCatalog {
    pub feed_id: String,
    pub generated_at: DateTime<Utc>,
    pub currency: Option<String>,
    index: DestinationIndex,
    products: HashMap<String, Product>,
    listings: HashMap<u64, Vec<String>>,
    pub rejected: Vec<RejectedEntry>,
    pub replaced_duplicates: usize,
}

impl ProcessedCatalog {
    pub fn destination(&self, destination_id: u64) -> Option<&Destination> {
        self.index.get(destination_id)
    }

    pub fn product(&self, product_code: &str) -> Option<&Product> {
        self.products.get(product_code)
    }

    // Products listed under a destination, in listing order. Codes the feed
    // promised but never delivered are skipped.
    pub fn products_for(&self, destination_id: u64) -> Vec<&Product> {
        self.listings
            .get(&destination_id)
            .map(|codes| {
                codes
                    .iter()
                    .filter_map(|code| self.products.get(code))
                    .collect()
            })
            .unwrap_or_default()
    }

    // All products, ordered by code for deterministic output.
    pub fn products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.values().collect();
        products.sort_by(|a, b| a.product_code.cmp(&b.product_code));
        products
    }

    pub fn index(&self) -> &DestinationIndex {
        &self.index
    }

    pub fn destination_count(&self) -> usize {
        self.index.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn listing_count(&self) -> usize {
        self.listings.len()
    }

    pub fn validate_hierarchy(&self) -> Result<(), HierarchyError> {
        self.index.validate()
    }

    pub fn is_hierarchy_valid(&self) -> bool {
        self.validate_hierarchy().is_ok()
    }
}

#[derive(Debug, Default)]
pub struct CatalogIngestor {}

impl CatalogIngestor {
    pub fn new() -> Self {
        Self {}
    }

    // Parse and validate a single destination payload from JSON text.
    pub fn parse_destination(&self, json: &str) -> Result<Destination, IngestError> {
        let value =
            serde_json::from_str(json).map_err(|e| IngestError::JsonParse(e.to_string()))?;
        Ok(validate_destination(&value)?)
    }

    // Parse and validate a single product payload from JSON text.
    pub fn parse_product(&self, json: &str) -> Result<Product, IngestError> {
        let value =
            serde_json::from_str(json).map_err(|e| IngestError::JsonParse(e.to_string()))?;
        Ok(validate_product(&value)?)
    }

    pub fn ingest(&self, json: &str) -> Result<ProcessedCatalog, IngestError> {
        let feed: CatalogFeed =
            serde_json::from_str(json).map_err(|e| IngestError::JsonParse(e.to_string()))?;
        self.ingest_feed(feed)
    }

    pub fn ingest_feed(&self, feed: CatalogFeed) -> Result<ProcessedCatalog, IngestError> {
        if feed.destinations.is_empty() && feed.products.is_empty() {
            return Err(IngestError::EmptyFeed);
        }

        let mut index = DestinationIndex::new();
        let mut products: HashMap<String, Product> = HashMap::new();
        let mut rejected = Vec::new();
        let mut replaced_duplicates = 0;

        for (position, entry) in feed.destinations.iter().enumerate() {
            match validate_destination(entry) {
                Ok(destination) => {
                    if index.insert(destination).is_some() {
                        replaced_duplicates += 1;
                    }
                }
                Err(error) => {
                    warn!(feed_id = %feed.feed_id, position, %error, "rejecting destination entry");
                    rejected.push(RejectedEntry {
                        kind: EntryKind::Destination,
                        position,
                        error,
                    });
                }
            }
        }

        for (position, entry) in feed.products.iter().enumerate() {
            match validate_product(entry) {
                Ok(product) => {
                    if products.insert(product.product_code.clone(), product).is_some() {
                        replaced_duplicates += 1;
                    }
                }
                Err(error) => {
                    warn!(feed_id = %feed.feed_id, position, %error, "rejecting product entry");
                    rejected.push(RejectedEntry {
                        kind: EntryKind::Product,
                        position,
                        error,
                    });
                }
            }
        }

        // Listings for the same destination merge; product codes resolve
        // lazily at query time.
        let mut listings: HashMap<u64, Vec<String>> = HashMap::new();
        for listing in feed.listings {
            listings
                .entry(listing.destination_id)
                .or_default()
                .extend(listing.product_codes);
        }

        debug!(
            feed_id = %feed.feed_id,
            destinations = index.len(),
            products = products.len(),
            listings = listings.len(),
            rejected = rejected.len(),
            "feed ingested"
        );

        Ok(ProcessedCatalog {
            feed_id: feed.feed_id,
            generated_at: feed.generated_at,
            currency: feed.currency,
            index,
            products,
            listings,
            rejected,
            replaced_duplicates,
        })
    }

    // Products matching every active criterion.
    pub fn filter_products<'a>(
        &self,
        catalog: &'a ProcessedCatalog,
        filter: &ProductFilter,
    ) -> Vec<&'a Product> {
        let pool = match filter.destination_id {
            Some(destination_id) => catalog.products_for(destination_id),
            None => catalog.products(),
        };

        let mut matched = Vec::new();
        for product in pool {
            if !filter
                .max_price
                .map_or(true, |max| product.from_price().map_or(false, |p| p <= max))
            {
                continue;
            }

            if !filter.min_rating.map_or(true, |min| {
                product.average_rating().map_or(false, |r| r >= min)
            }) {
                continue;
            }

            if !filter.max_duration_minutes.map_or(true, |max| {
                product.duration_minutes().map_or(false, |d| d <= max)
            }) {
                continue;
            }

            if !filter
                .title_contains
                .as_ref()
                .map_or(true, |needle| product.title.contains(needle))
            {
                continue;
            }

            if filter.with_images && product.images.as_deref().map_or(true, |imgs| imgs.is_empty()) {
                continue;
            }

            matched.push(product);
        }

        matched
    }
}
