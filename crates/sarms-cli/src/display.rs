//! Vertical card display for requests and classification results.

use std::collections::BTreeSet;

use sarms_core::{Classification, ImpactAnalysis, RequestStatus, Role, SoftwareRequest};

const MAX_HISTORY_ITEMS: usize = 10;

/// Print a classification result.
pub fn print_classification(impact: &ImpactAnalysis, result: &Classification) {
    println!("=== Priority: {} ===", result.tier);
    println!("{}", result.explanation);
    println!();
    print_impact(impact);
}

/// Print the statuses a role may move to, one per line.
pub fn print_transitions(current: RequestStatus, role: Role, targets: &BTreeSet<RequestStatus>) {
    if targets.is_empty() {
        println!("{role} cannot change a request in status {current}");
        return;
    }
    println!("{role} may move a request in status {current} to:");
    for target in targets {
        let note = if target.requires_remark() {
            " (remark required)"
        } else {
            ""
        };
        println!("  {:<24} {}{}", target.as_str(), target.label(), note);
    }
}

/// Print a request as a card grouped by section.
pub fn print_request_card(request: &SoftwareRequest, role: Option<Role>) {
    println!("=== {} ===", request.tracking_number);
    println!("{}", request.requested_solution_name);
    println!();

    println!("Workflow");
    row("status", request.status.label());
    row("submitted_by", &request.submitted_by);
    row("submitted_at", &request.submitted_at.to_rfc3339());
    if let Some(pm) = &request.assigned_to {
        row("assigned_to", pm);
    }
    if let Some(by) = &request.assigned_by {
        row("assigned_by", by);
    }
    if let Some(remark) = &request.rejection_remark {
        row("rejection_remark", remark);
    }
    if let Some(remark) = &request.on_hold_remark {
        row("on_hold_remark", remark);
    }
    row("last_updated", &request.last_updated.to_rfc3339());
    println!();

    println!("Priority");
    row("user", request.priority.as_str());
    row("system", request.calculated_priority().as_str());
    println!();

    print_impact(&request.impact_analysis);

    if !request.status_history.is_empty() {
        let len = request.status_history.len();
        println!("History ({len})");
        for record in request.status_history.iter().rev().take(MAX_HISTORY_ITEMS) {
            let remark = record
                .remark
                .as_deref()
                .map(|r| format!(": {r}"))
                .unwrap_or_default();
            let assigned = record
                .assigned_to
                .as_deref()
                .map(|pm| format!(" (assigned {pm})"))
                .unwrap_or_default();
            println!(
                "  {} {} -> {} by {}{}{}",
                record.changed_at.format("%Y-%m-%d %H:%M"),
                record.from_status,
                record.to_status,
                record.changed_by,
                assigned,
                remark
            );
        }
        if len > MAX_HISTORY_ITEMS {
            println!("  ... and {} more", len - MAX_HISTORY_ITEMS);
        }
        println!();
    }

    if let Some(role) = role {
        print_transitions(request.status, role, &request.allowed_transitions(role));
    }
}

fn print_impact(impact: &ImpactAnalysis) {
    println!("Impact Analysis");
    row("regulatory", yes_no(impact.is_regulatory_requirement));
    if let Some(explanation) = &impact.regulatory_explanation {
        row("regulatory_explanation", explanation);
    }
    row("financial_impact_usd", &format!("{:.2}", impact.financial_impact_usd));
    row("customer_impact", impact.customer_impact.as_str());
    row("operational_urgency", yes_no(impact.operational_urgency));
    if !impact.existing_systems.is_empty() {
        row("existing_systems", &impact.existing_systems);
    }
    println!();
}

fn row(name: &str, value: &str) {
    println!("  {:<26} {}", name, value);
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
