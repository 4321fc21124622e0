//! Catalog implementations: the built-in tables and a YAML file loader.

pub mod static_catalog;
pub mod yaml_catalog;

pub use static_catalog::{is_valid_slot_time, StaticCatalog, DEFAULT_CURRENCY};
pub use yaml_catalog::{load_catalog_file, parse_catalog_yaml, CatalogFile};
