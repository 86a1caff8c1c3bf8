//! Caller-owned persistence seam.
//!
//! The classifier and the workflow never touch storage; code that loads and
//! saves requests takes a `RequestStore` instead of reaching for shared state.

use crate::StoreError;
use crate::request::SoftwareRequest;

pub trait RequestStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<SoftwareRequest>, StoreError>;

    /// Insert or replace the request with the same id.
    fn save(&self, request: SoftwareRequest) -> Result<(), StoreError>;

    fn list(&self) -> Result<Vec<SoftwareRequest>, StoreError>;

    /// Fetch a request that must exist.
    fn require(&self, id: &str) -> Result<SoftwareRequest, StoreError> {
        self.get(id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
