//! Unit hash table traversal and the per-process identity cache.

mod cache;
mod scanner;

pub use cache::{IdentityCache, ScanResult};
pub use scanner::{ScanStats, UnitScanner};
