//! Status, priority and queue-state badge components.

use dioxus::prelude::*;
use ticket_core::{Priority, QueueState, TicketStatus};

/// Badge for displaying ticket status.
#[component]
pub fn StatusBadge(status: TicketStatus) -> Element {
    let (bg_class, text) = match status {
        TicketStatus::Open => ("badge-open", "OPEN"),
        TicketStatus::InProgress => ("badge-in-progress", "IN_PROGRESS"),
        TicketStatus::Resolved => ("badge-resolved", "RESOLVED"),
    };

    rsx! {
        span { class: "status-badge {bg_class}", {text} }
    }
}

/// Badge for displaying ticket priority.
#[component]
pub fn PriorityBadge(priority: Priority) -> Element {
    let (bg_class, text) = match priority {
        Priority::Low => ("badge-low", "LOW"),
        Priority::Medium => ("badge-medium", "MEDIUM"),
        Priority::High => ("badge-high", "HIGH"),
    };

    rsx! {
        span { class: "priority-badge {bg_class}", {text} }
    }
}

/// Badge for displaying queue state on the admin page.
#[component]
pub fn QueueStateBadge(state: QueueState) -> Element {
    let (bg_class, text) = match state {
        QueueState::Running => ("badge-running", "Running"),
        QueueState::Paused => ("badge-paused", "Paused"),
    };

    rsx! {
        span { class: "state-badge {bg_class}", {text} }
    }
}
