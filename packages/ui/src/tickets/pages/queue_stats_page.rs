//! Admin page: per-queue job counts with pause/resume.

use dioxus::prelude::*;
use ticket_core::{QueueSnapshot, QueueState};

use crate::tickets::QueueStateBadge;

/// Admin queue stats page component.
#[component]
pub fn QueueStatsPage() -> Element {
    let mut snapshots = use_signal(Vec::<QueueSnapshot>::new);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| None::<String>);

    let mut stats_resource = use_resource(move || async move {
        loading.set(true);
        match api::list_queue_stats().await {
            Ok(s) => snapshots.set(s),
            Err(e) => error.set(Some(format!("Failed to load queue stats: {e}"))),
        }
        loading.set(false);
    });

    // Pause queue handler
    let on_pause = move |snapshot: QueueSnapshot| {
        spawn(async move {
            if let Err(e) = api::pause_queue(snapshot.name).await {
                error.set(Some(format!("Failed to pause queue: {e}")));
            } else if let Ok(s) = api::list_queue_stats().await {
                snapshots.set(s);
            }
        });
    };

    // Resume queue handler
    let on_resume = move |snapshot: QueueSnapshot| {
        spawn(async move {
            if let Err(e) = api::resume_queue(snapshot.name).await {
                error.set(Some(format!("Failed to resume queue: {e}")));
            } else if let Ok(s) = api::list_queue_stats().await {
                snapshots.set(s);
            }
        });
    };

    let backlog: u64 = snapshots().iter().map(|s| s.counts.backlog()).sum();
    let active: u64 = snapshots().iter().map(|s| s.counts.active).sum();
    let completed: u64 = snapshots().iter().map(|s| s.counts.completed).sum();
    let failed: u64 = snapshots().iter().map(|s| s.counts.failed).sum();

    rsx! {
        div { class: "page-container",
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Queues" }
                    p { class: "page-description", "Background job queues and their counts" }
                }
                div { class: "page-header-actions",
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| stats_resource.restart(),
                        "Refresh"
                    }
                }
            }

            if let Some(err) = error() {
                div { class: "error-banner",
                    span { "{err}" }
                    button { onclick: move |_| error.set(None), "×" }
                }
            }

            div { class: "stats-grid",
                div { class: "stat-card",
                    div { class: "stat-card-value", "{backlog}" }
                    div { class: "stat-card-label", "Backlog" }
                }
                div { class: "stat-card",
                    div { class: "stat-card-value", "{active}" }
                    div { class: "stat-card-label", "Active" }
                }
                div { class: "stat-card",
                    div { class: "stat-card-value", "{completed}" }
                    div { class: "stat-card-label", "Completed" }
                }
                div { class: "stat-card stat-card-accent",
                    div { class: "stat-card-value", "{failed}" }
                    div { class: "stat-card-label", "Failed" }
                }
            }

            div { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "All Queues" }
                }

                if loading() && snapshots().is_empty() {
                    div { class: "loading", "Loading queues..." }
                } else if snapshots().is_empty() {
                    div { class: "empty-state",
                        p { "No queues found" }
                        p { class: "hint", "Queues appear once the server has started them" }
                    }
                } else {
                    div { class: "table-container",
                        table { class: "data-table",
                            thead {
                                tr {
                                    th { "Name" }
                                    th { "State" }
                                    th { class: "text-right", "Waiting" }
                                    th { class: "text-right", "Active" }
                                    th { class: "text-right", "Delayed" }
                                    th { class: "text-right", "Completed" }
                                    th { class: "text-right", "Failed" }
                                    th { class: "text-right", "Paused" }
                                    th { class: "text-right", "Actions" }
                                }
                            }
                            tbody {
                                for snapshot in snapshots().iter() {
                                    {
                                        let is_paused = snapshot.state == QueueState::Paused;
                                        let snapshot_for_pause = snapshot.clone();
                                        let snapshot_for_resume = snapshot.clone();

                                        rsx! {
                                            tr { class: "data-row",
                                                td { "{snapshot.name}" }
                                                td { QueueStateBadge { state: snapshot.state } }
                                                td { class: "text-right tabular-nums", "{snapshot.counts.waiting}" }
                                                td { class: "text-right tabular-nums", "{snapshot.counts.active}" }
                                                td { class: "text-right tabular-nums", "{snapshot.counts.delayed}" }
                                                td { class: "text-right tabular-nums", "{snapshot.counts.completed}" }
                                                td { class: "text-right tabular-nums", "{snapshot.counts.failed}" }
                                                td { class: "text-right tabular-nums", "{snapshot.counts.paused}" }
                                                td { class: "text-right",
                                                    if is_paused {
                                                        button {
                                                            class: "btn btn-small btn-resume",
                                                            onclick: move |_| on_resume(snapshot_for_resume.clone()),
                                                            "Resume"
                                                        }
                                                    } else {
                                                        button {
                                                            class: "btn btn-small btn-pause",
                                                            onclick: move |_| on_pause(snapshot_for_pause.clone()),
                                                            "Pause"
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
