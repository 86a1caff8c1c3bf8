//! Status workflow: which transitions are legal, who may trigger them, and
//! what each one requires.
//!
//! ```text
//! new ──(admin)──► under_review ──► approved | rejected | request_for_discussion | on_hold
//! request_for_discussion ──► approved | rejected | on_hold
//! on_hold ──► approved | rejected | request_for_discussion
//! ```
//!
//! `approved` and `rejected` are terminal. Customers never change status.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ValidationError;
use crate::status::{RequestStatus, Role};

/// One entry of a request's status history.
///
/// Produced by [`validate_transition`]; storage belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRecord {
    pub from_status: RequestStatus,
    pub to_status: RequestStatus,
    pub changed_by: String,
    pub changed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Project manager assigned by this change. `None` when the assignment
    /// was left as it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

/// Inputs to a status change, as collected by the status dialog.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRequest<'a> {
    pub current: RequestStatus,
    pub target: RequestStatus,
    pub role: Role,
    /// Identity recorded as `changed_by`, e.g. the actor's email.
    pub actor: &'a str,
    pub remark: Option<&'a str>,
    /// Project manager chosen in this change, if any.
    pub assigned_to: Option<&'a str>,
    /// Project manager already on the request before this change.
    pub current_assignee: Option<&'a str>,
}

impl<'a> TransitionRequest<'a> {
    pub fn new(current: RequestStatus, target: RequestStatus, role: Role, actor: &'a str) -> Self {
        Self {
            current,
            target,
            role,
            actor,
            remark: None,
            assigned_to: None,
            current_assignee: None,
        }
    }

    pub fn with_remark(mut self, remark: &'a str) -> Self {
        self.remark = Some(remark);
        self
    }

    pub fn assign_to(mut self, assignee: &'a str) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    pub fn already_assigned_to(mut self, assignee: Option<&'a str>) -> Self {
        self.current_assignee = assignee;
        self
    }
}

/// Targets reachable from `current` per the transition table, ignoring role.
pub fn legal_targets(current: RequestStatus) -> &'static [RequestStatus] {
    use crate::status::RequestStatus::*;
    match current {
        New => &[UnderReview],
        UnderReview => &[Approved, Rejected, RequestForDiscussion, OnHold],
        RequestForDiscussion => &[Approved, Rejected, OnHold],
        OnHold => &[Approved, Rejected, RequestForDiscussion],
        Approved | Rejected => &[],
    }
}

/// Statuses `role` may move a request to from `current`.
///
/// Empty for customers and terminal statuses. Leaving `new` is an
/// assignment step, so only admins get `under_review` there.
pub fn allowed_transitions(current: RequestStatus, role: Role) -> BTreeSet<RequestStatus> {
    if !role.can_manage_status() {
        return BTreeSet::new();
    }
    if current == RequestStatus::New && !role.can_assign() {
        return BTreeSet::new();
    }
    legal_targets(current).iter().copied().collect()
}

/// Validate a status change, stamping the record with the current time.
pub fn validate_transition(
    request: TransitionRequest<'_>,
) -> Result<StatusChangeRecord, ValidationError> {
    validate_transition_at(request, Utc::now())
}

/// Validate a status change against an explicit clock.
///
/// Checks run in order and stop at the first failure: legality for the
/// role, then the remark for rejection/hold, then the assignment when
/// entering review without a project manager. A new assignee is only
/// accepted from a role that may assign, on the way into review, for a
/// request that has no project manager yet; naming the current one again
/// is not a change.
pub fn validate_transition_at(
    request: TransitionRequest<'_>,
    now: DateTime<Utc>,
) -> Result<StatusChangeRecord, ValidationError> {
    let TransitionRequest {
        current,
        target,
        role,
        actor,
        remark,
        assigned_to,
        current_assignee,
    } = request;

    if !allowed_transitions(current, role).contains(&target) {
        debug!(%current, %target, %role, "illegal status transition");
        return Err(ValidationError::IllegalTransition {
            from: current,
            to: target,
            role,
        });
    }

    let remark = non_blank(remark);
    if target.requires_remark() && remark.is_none() {
        debug!(%target, "status change missing remark");
        return Err(ValidationError::MissingRequiredRemark { to: target });
    }

    if target == RequestStatus::UnderReview
        && non_blank(current_assignee).is_none()
        && non_blank(assigned_to).is_none()
    {
        debug!("status change missing project manager assignment");
        return Err(ValidationError::MissingAssignment);
    }

    let current_assignee = non_blank(current_assignee);
    let assigned_to = non_blank(assigned_to).filter(|pm| current_assignee != Some(*pm));
    if assigned_to.is_some()
        && (target != RequestStatus::UnderReview
            || !role.can_assign()
            || current_assignee.is_some())
    {
        debug!(%target, %role, "assignment not permitted on this status change");
        return Err(ValidationError::IllegalAssignment { to: target, role });
    }

    Ok(StatusChangeRecord {
        from_status: current,
        to_status: target,
        changed_by: actor.to_string(),
        changed_at: now,
        remark: remark.map(str::to_string),
        assigned_to: assigned_to.map(str::to_string),
    })
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
