//! Ticket list page: filters, sortable table, pagination.

use dioxus::prelude::*;
use ticket_core::{Priority, SortBy, SortOrder, TicketStatus};

use crate::tickets::{FilterBar, Pagination, TicketTable};

/// Ticket list page component.
#[component]
pub fn TicketsPage() -> Element {
    let mut search = use_signal(String::new);
    let mut status = use_signal(|| None::<TicketStatus>);
    let mut priority = use_signal(|| None::<Priority>);
    let mut page = use_signal(|| 1u32);
    let mut sort_by = use_signal(SortBy::default);
    let mut sort_order = use_signal(SortOrder::default);

    // Reruns whenever one of the signals read below changes.
    let tickets_resource = use_resource(move || async move {
        api::list_tickets(
            status().map(|s| s.to_string()),
            priority().map(|p| p.to_string()),
            Some(search()).filter(|s| !s.is_empty()),
            Some(i64::from(page())),
            None,
            Some(sort_by().to_string()),
            Some(sort_order().to_string()),
        )
        .await
    });

    let on_sort = move |column: SortBy| {
        if sort_by() == column {
            let flipped = match sort_order() {
                SortOrder::Asc => SortOrder::Desc,
                SortOrder::Desc => SortOrder::Asc,
            };
            sort_order.set(flipped);
        } else {
            sort_by.set(column);
            sort_order.set(SortOrder::Asc);
        }
        page.set(1);
    };

    let body = match tickets_resource.read().as_ref() {
        None => rsx! {
            div { class: "loading", "Loading tickets..." }
        },
        Some(Err(e)) => rsx! {
            div { class: "error-banner", "Failed to load tickets: {e}" }
        },
        Some(Ok(data)) => {
            let tickets = data.items.clone();
            let empty = tickets.is_empty();
            let current_page = data.page;
            let total_pages = data.total_pages;
            let total = data.total;

            rsx! {
                div { class: "card",
                    if empty {
                        div { class: "empty-state",
                            p { "No tickets found" }
                            p { class: "hint", "Adjust the filters or create a new ticket" }
                        }
                    } else {
                        TicketTable {
                            tickets,
                            sort_by: sort_by(),
                            sort_order: sort_order(),
                            on_sort: on_sort,
                        }
                    }
                }
                Pagination {
                    page: current_page,
                    total_pages,
                    total,
                    on_page: move |p| page.set(p),
                }
            }
        }
    };

    rsx! {
        div { class: "page-container",
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Tickets" }
                    p { class: "page-description", "Track, filter and resolve work items" }
                }
                div { class: "page-header-actions",
                    Link { to: "/tickets/new", class: "btn btn-primary", "New Ticket" }
                }
            }

            FilterBar {
                search: search(),
                status: status(),
                priority: priority(),
                on_search: move |term: String| {
                    search.set(term);
                    page.set(1);
                },
                on_status: move |value| {
                    status.set(value);
                    page.set(1);
                },
                on_priority: move |value| {
                    priority.set(value);
                    page.set(1);
                },
            }

            {body}
        }
    }
}
