//! Thread-safe in-memory request store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use sarms_core::{RequestStore, SoftwareRequest, StoreError};
use tracing::{debug, info};

use crate::snapshot;

/// Requests keyed by id, guarded by a single `RwLock`.
///
/// Use [`open`](Self::open) for an empty store and
/// [`open_snapshot`](Self::open_snapshot) to seed it from a JSON file.
#[derive(Default)]
pub struct MemoryStore {
    requests: RwLock<HashMap<String, SoftwareRequest>>,
}

impl MemoryStore {
    pub fn open() -> Self {
        Self::default()
    }

    /// Seed a store from a JSON snapshot written by [`save_snapshot`](Self::save_snapshot).
    pub fn open_snapshot(path: &Path) -> Result<Self, StoreError> {
        let store = Self::open();
        for request in snapshot::load_snapshot(path)? {
            store.save(request)?;
        }
        info!(count = store.len()?, path = %path.display(), "loaded request snapshot");
        Ok(store)
    }

    /// Like [`open_snapshot`](Self::open_snapshot), but a missing file gives an
    /// empty store. The first [`save_snapshot`](Self::save_snapshot) creates it.
    pub fn open_snapshot_or_empty(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            info!(path = %path.display(), "no request snapshot yet, starting empty");
            return Ok(Self::open());
        }
        Self::open_snapshot(path)
    }

    /// Write every request to `path`, ordered by id.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), StoreError> {
        snapshot::save_snapshot(path, &self.list()?)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.requests.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Read-modify-write a single request under the write lock.
    ///
    /// Holding the lock across `f` means two concurrent status changes can
    /// not both validate against the same stale status. The closure's error
    /// is returned as-is and nothing is written.
    pub fn update<T, E>(
        &self,
        id: &str,
        f: impl FnOnce(&mut SoftwareRequest) -> Result<T, E>,
    ) -> Result<Result<T, E>, StoreError> {
        let mut requests = self.requests.write().map_err(|_| StoreError::Poisoned)?;
        let current = requests
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut working = current.clone();
        let outcome = f(&mut working);
        if outcome.is_ok() {
            debug!(request = %id, status = %working.status, "request updated");
            requests.insert(id.to_string(), working);
        }
        Ok(outcome)
    }
}

impl RequestStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<SoftwareRequest>, StoreError> {
        let requests = self.requests.read().map_err(|_| StoreError::Poisoned)?;
        Ok(requests.get(id).cloned())
    }

    fn save(&self, request: SoftwareRequest) -> Result<(), StoreError> {
        let mut requests = self.requests.write().map_err(|_| StoreError::Poisoned)?;
        debug!(request = %request.id, status = %request.status, "request saved");
        requests.insert(request.id.clone(), request);
        Ok(())
    }

    fn list(&self) -> Result<Vec<SoftwareRequest>, StoreError> {
        let requests = self.requests.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<SoftwareRequest> = requests.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use sarms_core::{
        CustomerImpact, ErrorKind, ImpactAnalysis, PriorityTier, RequestStatus, Role,
        ValidationError,
    };
    use std::sync::Arc;

    fn at(ts: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
    }

    fn request(id: &str) -> SoftwareRequest {
        SoftwareRequest::submit(
            id,
            format!("SARMS-2026-{id:0>4}"),
            "Vendor onboarding workflow",
            ImpactAnalysis {
                financial_impact_usd: 20_000.0,
                customer_impact: CustomerImpact::External,
                ..Default::default()
            },
            PriorityTier::Low,
            "customer@company.com",
            at("2026-02-01T12:00:00Z"),
        )
    }

    #[test]
    fn open_is_empty() {
        let store = MemoryStore::open();
        assert!(store.is_empty().unwrap());
        assert!(store.get("1").unwrap().is_none());
    }

    #[test]
    fn missing_snapshot_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requests.json");
        assert!(matches!(
            MemoryStore::open_snapshot(&path),
            Err(StoreError::SnapshotNotFound(_))
        ));

        let store = MemoryStore::open_snapshot_or_empty(&path).unwrap();
        assert!(store.is_empty().unwrap());

        store.save(request("1")).unwrap();
        store.save_snapshot(&path).unwrap();
        let reopened = MemoryStore::open_snapshot_or_empty(&path).unwrap();
        assert_eq!(reopened.require("1").unwrap(), request("1"));
    }

    #[test]
    fn save_then_get() {
        let store = MemoryStore::open();
        store.save(request("1")).unwrap();
        let got = store.get("1").unwrap().unwrap();
        assert_eq!(got.tracking_number, "SARMS-2026-0001");
    }

    #[test]
    fn save_replaces_same_id() {
        let store = MemoryStore::open();
        store.save(request("1")).unwrap();
        let mut changed = request("1");
        changed.requested_solution_name = "Renamed".into();
        store.save(changed).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.require("1").unwrap().requested_solution_name, "Renamed");
    }

    #[test]
    fn require_missing_errors() {
        let store = MemoryStore::open();
        assert!(matches!(store.require("42"), Err(StoreError::NotFound(id)) if id == "42"));
    }

    #[test]
    fn list_is_ordered_by_id() {
        let store = MemoryStore::open();
        for id in ["3", "1", "2"] {
            store.save(request(id)).unwrap();
        }
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn update_applies_valid_transition() {
        let store = MemoryStore::open();
        store.save(request("1")).unwrap();

        let outcome = store
            .update("1", |req| {
                req.transition(
                    RequestStatus::UnderReview,
                    Role::Admin,
                    "admin@company.com",
                    None,
                    Some("pm@company.com"),
                )
            })
            .unwrap();
        assert!(outcome.is_ok());

        let stored = store.require("1").unwrap();
        assert_eq!(stored.status, RequestStatus::UnderReview);
        assert_eq!(stored.assigned_to.as_deref(), Some("pm@company.com"));
    }

    #[test]
    fn update_discards_failed_transition() {
        let store = MemoryStore::open();
        store.save(request("1")).unwrap();

        let outcome: Result<_, ValidationError> = store
            .update("1", |req| {
                req.transition(RequestStatus::UnderReview, Role::Admin, "admin@company.com", None, None)
            })
            .unwrap();
        assert_eq!(outcome.unwrap_err().kind(), ErrorKind::MissingAssignment);
        assert_eq!(store.require("1").unwrap(), request("1"));
    }

    #[test]
    fn update_missing_request_errors() {
        let store = MemoryStore::open();
        let result = store.update("9", |_| Ok::<(), ValidationError>(()));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn concurrent_updates_cannot_both_win() {
        let store = Arc::new(MemoryStore::open());
        let mut req = request("1");
        req.transition(
            RequestStatus::UnderReview,
            Role::Admin,
            "admin@company.com",
            None,
            Some("pm@company.com"),
        )
        .unwrap();
        store.save(req).unwrap();

        // Approve-then-hold loses the second change (approved is terminal),
        // hold-then-approve keeps both.
        let handles: Vec<_> = [
            (RequestStatus::Approved, None),
            (RequestStatus::OnHold, Some("waiting on budget")),
        ]
        .into_iter()
        .map(|(target, remark)| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                store
                    .update("1", |req| {
                        req.transition(target, Role::ProjectManager, "pm@company.com", remark, None)
                    })
                    .unwrap()
                    .is_ok()
            })
        })
        .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        let stored = store.require("1").unwrap();

        // Either order ends with a consistent, fully recorded history.
        assert_eq!(stored.status_history.len(), 1 + successes);
        let last = stored.status_history.last().unwrap();
        assert_eq!(last.to_status, stored.status);
    }
}
