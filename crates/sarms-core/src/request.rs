//! Snapshot of a software request as held by the surrounding CRUD layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ValidationError;
use crate::impact::ImpactAnalysis;
use crate::priority::{self, PriorityTier};
use crate::status::{RequestStatus, Role};
use crate::transition::{self, StatusChangeRecord, TransitionRequest};

/// A submitted request with its workflow state.
///
/// Only the fields the workflow reads or writes are modelled; everything else
/// on the form (department, cost center, contact person, documents) stays
/// with the CRUD layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareRequest {
    pub id: String,
    pub tracking_number: String,
    pub requested_solution_name: String,
    pub impact_analysis: ImpactAnalysis,
    /// Priority as perceived by the submitter.
    pub priority: PriorityTier,
    pub status: RequestStatus,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub status_history: Vec<StatusChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_hold_remark: Option<String>,
}

impl SoftwareRequest {
    /// A freshly submitted request in status `new`.
    pub fn submit(
        id: impl Into<String>,
        tracking_number: impl Into<String>,
        requested_solution_name: impl Into<String>,
        impact_analysis: ImpactAnalysis,
        priority: PriorityTier,
        submitted_by: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            tracking_number: tracking_number.into(),
            requested_solution_name: requested_solution_name.into(),
            impact_analysis,
            priority,
            status: RequestStatus::New,
            submitted_by: submitted_by.into(),
            submitted_at: now,
            assigned_to: None,
            assigned_by: None,
            assigned_at: None,
            last_updated: now,
            status_history: Vec::new(),
            rejection_remark: None,
            on_hold_remark: None,
        }
    }

    /// System-computed priority, derived from the impact analysis on every call.
    pub fn calculated_priority(&self) -> PriorityTier {
        priority::classify(&self.impact_analysis)
    }

    /// Whether the computed tier differs from what the submitter chose.
    pub fn priority_mismatch(&self) -> bool {
        self.calculated_priority() != self.priority
    }

    /// Statuses `role` may move this request to.
    pub fn allowed_transitions(&self, role: Role) -> std::collections::BTreeSet<RequestStatus> {
        transition::allowed_transitions(self.status, role)
    }

    /// Validate a change of this request's status.
    ///
    /// Reads the current status and existing assignee from the snapshot; the
    /// snapshot itself is left untouched.
    pub fn validate_transition(
        &self,
        target: RequestStatus,
        role: Role,
        actor: &str,
        remark: Option<&str>,
        assigned_to: Option<&str>,
    ) -> Result<StatusChangeRecord, ValidationError> {
        let mut request = TransitionRequest::new(self.status, target, role, actor)
            .already_assigned_to(self.assigned_to.as_deref());
        request.remark = remark;
        request.assigned_to = assigned_to;
        transition::validate_transition(request)
    }

    /// Apply a validated status change.
    ///
    /// The remark lands on `rejection_remark` or `on_hold_remark` depending on
    /// the target, and the other remark field is cleared. The assignee the
    /// record carries is stored with `assigned_by` and `assigned_at`; a record
    /// without one leaves the assignment alone.
    pub fn apply_transition(&mut self, record: StatusChangeRecord) {
        let now = record.changed_at;

        self.rejection_remark = match record.to_status {
            RequestStatus::Rejected => record.remark.clone(),
            _ => None,
        };
        self.on_hold_remark = match record.to_status {
            RequestStatus::OnHold => record.remark.clone(),
            _ => None,
        };

        if let Some(assignee) = &record.assigned_to {
            self.assigned_to = Some(assignee.clone());
            self.assigned_by = Some(record.changed_by.clone());
            self.assigned_at = Some(now);
        }

        info!(
            request = %self.id,
            from = %record.from_status,
            to = %record.to_status,
            changed_by = %record.changed_by,
            "status change applied"
        );

        self.status = record.to_status;
        self.last_updated = now;
        self.status_history.push(record);
    }

    /// Validate and apply in one step.
    pub fn transition(
        &mut self,
        target: RequestStatus,
        role: Role,
        actor: &str,
        remark: Option<&str>,
        assigned_to: Option<&str>,
    ) -> Result<StatusChangeRecord, ValidationError> {
        let record = self.validate_transition(target, role, actor, remark, assigned_to)?;
        self.apply_transition(record.clone());
        Ok(record)
    }
}
