//! Ticket detail page with status actions and delete.

use api::UpdateTicketRequest;
use dioxus::prelude::*;
use ticket_core::{Ticket, TicketStatus};

use crate::tickets::{PriorityBadge, StatusBadge};

/// Props for TicketDetailPage.
#[derive(Props, Clone, PartialEq)]
pub struct TicketDetailPageProps {
    pub id: String,
}

/// Ticket detail page component.
#[component]
pub fn TicketDetailPage(props: TicketDetailPageProps) -> Element {
    let nav = use_navigator();
    let mut ticket = use_signal(|| None::<Ticket>);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| None::<String>);

    // Load the ticket
    let id_for_resource = props.id.clone();
    let _ticket_resource = use_resource(move || {
        let id = id_for_resource.clone();
        async move {
            loading.set(true);
            match api::get_ticket(id).await {
                Ok(t) => ticket.set(Some(t)),
                Err(e) => error.set(Some(format!("Failed to load ticket: {e}"))),
            }
            loading.set(false);
        }
    });

    // Status transition handlers
    let on_start = {
        let id = props.id.clone();
        move |_| {
            let id = id.clone();
            spawn(async move {
                let request = UpdateTicketRequest {
                    status: Some(TicketStatus::InProgress.to_string()),
                    ..Default::default()
                };
                match api::update_ticket(id, request).await {
                    Ok(updated) => ticket.set(Some(updated)),
                    Err(e) => error.set(Some(format!("Failed to update ticket: {e}"))),
                }
            });
        }
    };

    let on_resolve = {
        let id = props.id.clone();
        move |_| {
            let id = id.clone();
            spawn(async move {
                let request = UpdateTicketRequest {
                    status: Some(TicketStatus::Resolved.to_string()),
                    ..Default::default()
                };
                match api::update_ticket(id, request).await {
                    Ok(updated) => ticket.set(Some(updated)),
                    Err(e) => error.set(Some(format!("Failed to update ticket: {e}"))),
                }
            });
        }
    };

    let on_delete = {
        let id = props.id.clone();
        move |_| {
            let id = id.clone();
            spawn(async move {
                match api::delete_ticket(id).await {
                    Ok(_) => {
                        nav.push("/tickets");
                    }
                    Err(e) => error.set(Some(format!("Failed to delete ticket: {e}"))),
                }
            });
        }
    };

    let edit_path = format!("/tickets/{}/edit", props.id);

    rsx! {
        div { class: "page-container",
            nav { class: "breadcrumb",
                Link { to: "/tickets", class: "breadcrumb-link", "Tickets" }
                span { class: "breadcrumb-separator", "/" }
                span { class: "breadcrumb-current",
                    {ticket().map(|t| t.title.clone()).unwrap_or_else(|| "Loading...".to_string())}
                }
            }

            if let Some(err) = error() {
                div { class: "error-banner",
                    span { "{err}" }
                    button { onclick: move |_| error.set(None), "×" }
                }
            }

            if loading() {
                div { class: "loading", "Loading ticket..." }
            } else if let Some(t) = ticket() {
                div { class: "card",
                    div { class: "page-header",
                        div { class: "page-header-content",
                            div { class: "page-header-title-row",
                                h1 { class: "page-title", "{t.title}" }
                                StatusBadge { status: t.status }
                                PriorityBadge { priority: t.priority }
                            }
                        }
                        div { class: "page-header-actions",
                            if t.status == TicketStatus::Open {
                                button {
                                    class: "btn btn-secondary",
                                    onclick: on_start,
                                    "Start Progress"
                                }
                            }
                            if t.status != TicketStatus::Resolved {
                                button {
                                    class: "btn btn-resolve",
                                    onclick: on_resolve,
                                    "Resolve"
                                }
                            }
                            Link { to: "{edit_path}", class: "btn btn-secondary", "Edit" }
                            button {
                                class: "btn btn-danger",
                                onclick: on_delete,
                                "Delete"
                            }
                        }
                    }

                    div { class: "ticket-description",
                        if t.description.is_empty() {
                            p { class: "hint", "No description" }
                        } else {
                            p { "{t.description}" }
                        }
                    }

                    dl { class: "ticket-meta",
                        dt { "Ticket ID" }
                        dd { class: "tabular-nums", "{t.id}" }
                        dt { "Created" }
                        dd { class: "tabular-nums", {t.created_at.format("%Y-%m-%d %H:%M UTC").to_string()} }
                        dt { "Updated" }
                        dd { class: "tabular-nums", {t.updated_at.format("%Y-%m-%d %H:%M UTC").to_string()} }
                    }
                }
            }
        }
    }
}
