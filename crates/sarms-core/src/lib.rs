//! Core of the software request management system: impact analysis types,
//! priority classification, and the request status workflow.

pub mod error;
pub mod impact;
pub mod priority;
pub mod request;
pub mod status;
pub mod store;
pub mod transition;

pub use error::{ErrorKind, ImpactError, StoreError, ValidationError};
pub use impact::{CustomerImpact, ImpactAnalysis};
pub use priority::{Classification, Criterion, PriorityTier, classify, explain, missing_criteria};
pub use request::SoftwareRequest;
pub use status::{RequestStatus, Role};
pub use store::RequestStore;
pub use transition::{StatusChangeRecord, TransitionRequest, allowed_transitions, validate_transition};
