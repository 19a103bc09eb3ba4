pub mod numeric;
pub mod records;

// Re-export the core types to provide a clean public API.
pub use numeric::clean_numeric;
pub use records::{DemandRecord, InventoryRecord, ProductMasterRecord, SalesRecord};
