//! Place catalog
//!
//! The catalog is loaded once from the XML knowledge file and then shared
//! read-only by every recommendation request:
//! - `place`: typed place records and the `Catalog` collection
//! - `loader`: XML parsing and validation
//! - process-wide single load through `init` / `global`

use std::path::Path;
use std::sync::{Arc, OnceLock};

use tracing::warn;

pub mod error;
pub mod loader;
pub mod place;

pub use error::{CatalogError, Result};
pub use loader::CatalogLoader;
pub use place::{Catalog, Place};

static GLOBAL_CATALOG: OnceLock<Option<Arc<Catalog>>> = OnceLock::new();

/// Load a catalog file into a shareable handle
pub fn load(path: impl AsRef<Path>) -> Result<Arc<Catalog>> {
    CatalogLoader::load(path).map(Arc::new)
}

/// Performs the single process-wide catalog load. **Call once at startup.**
///
/// A failed load is remembered as well, so later callers see an unavailable
/// catalog instead of retrying. Concurrent callers block until the winning
/// load finishes and then get `AlreadyInitialized`.
pub fn init(path: impl AsRef<Path>) -> Result<Arc<Catalog>> {
    let mut outcome = None;
    GLOBAL_CATALOG.get_or_init(|| {
        let loaded = load(path);
        let catalog = loaded.as_ref().ok().cloned();
        outcome = Some(loaded);
        catalog
    });

    match outcome {
        Some(Err(e)) => {
            warn!("Place catalog unavailable: {}", e);
            Err(e)
        }
        Some(Ok(catalog)) => Ok(catalog),
        None => Err(CatalogError::AlreadyInitialized),
    }
}

/// Returns the shared catalog, or `None` if it was never loaded or failed to load
pub fn global() -> Option<Arc<Catalog>> {
    GLOBAL_CATALOG.get().and_then(|slot| slot.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in this binary that touches the process-wide slot.
    #[test]
    fn test_failed_init_is_remembered() {
        let result = init("missing_catalog_for_init_test.xml");
        assert!(matches!(result, Err(CatalogError::FileNotFound(_))));
        assert!(global().is_none());

        let again = init("missing_catalog_for_init_test.xml");
        assert!(matches!(again, Err(CatalogError::AlreadyInitialized)));
        assert!(global().is_none());
    }
}
