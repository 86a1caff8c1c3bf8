use thiserror::Error;

use crate::status::{RequestStatus, Role};

/// Category of a rejected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    IllegalTransition,
    MissingRequiredRemark,
    MissingAssignment,
    IllegalAssignment,
}

/// A status change that failed validation.
///
/// Every variant is user-correctable: the caller renders it and blocks the
/// update until the input is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{role} may not move a request from {from} to {to}")]
    IllegalTransition {
        from: RequestStatus,
        to: RequestStatus,
        role: Role,
    },

    #[error("a remark is required to move a request to {to}")]
    MissingRequiredRemark { to: RequestStatus },

    #[error("a project manager must be assigned before the request goes under review")]
    MissingAssignment,

    #[error("{role} may not assign a project manager when moving a request to {to}")]
    IllegalAssignment { to: RequestStatus, role: Role },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IllegalTransition { .. } => ErrorKind::IllegalTransition,
            Self::MissingRequiredRemark { .. } => ErrorKind::MissingRequiredRemark,
            Self::MissingAssignment => ErrorKind::MissingAssignment,
            Self::IllegalAssignment { .. } => ErrorKind::IllegalAssignment,
        }
    }
}

/// Problems with an impact analysis caught at the form boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImpactError {
    #[error("financial impact must be a non-negative amount, got {0}")]
    InvalidFinancialImpact(f64),

    #[error("an explanation is required for regulatory requirements")]
    MissingRegulatoryExplanation,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot file not found: {0}")]
    SnapshotNotFound(std::path::PathBuf),

    #[error("request not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("{0}")]
    Other(String),
}
