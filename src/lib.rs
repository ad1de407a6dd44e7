// Travel catalog data contracts: wire schemas for destinations and bookable
// products, boundary validation for untyped payloads, hierarchy indexing,
// feed ingestion and a shared read-mostly store.

pub mod destination;
pub mod feed;
pub mod hierarchy;
pub mod ingest;
pub mod product;
pub mod store;
pub mod validate;

// Re-export key types for convenience
pub use destination::{Coordinates, Destination, ROOT_PARENT_ID};
pub use feed::{CatalogFeed, CatalogListing};
pub use hierarchy::{DestinationIndex, HierarchyError};
pub use ingest::{
    CatalogIngestor, EntryKind, IngestError, ProcessedCatalog, ProductFilter, RejectedEntry,
};
pub use product::{
    ImageVariant, PricingSummary, Product, ProductDuration, ProductImage, ProductPricing,
    ProductReviews,
};
pub use store::{CatalogStore, StoreStatsReport};
pub use validate::{
    check_destination, check_product, strict_issues_destination, strict_issues_product,
    validate_destination, validate_product, StrictIssue, ValidationError,
};
