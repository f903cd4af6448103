//! Ticket list table with sortable headers.

use dioxus::prelude::*;
use ticket_core::{SortBy, SortOrder, Ticket};

use crate::tickets::{PriorityBadge, StatusBadge};

/// Props for TicketTable.
#[derive(Props, Clone, PartialEq)]
pub struct TicketTableProps {
    pub tickets: Vec<Ticket>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// Fired when a column header is clicked.
    pub on_sort: EventHandler<SortBy>,
}

fn indicator(props: &TicketTableProps, column: SortBy) -> &'static str {
    if props.sort_by == column {
        match props.sort_order {
            SortOrder::Asc => " ▲",
            SortOrder::Desc => " ▼",
        }
    } else {
        ""
    }
}

/// Table listing tickets, each row linking to its detail page.
#[component]
pub fn TicketTable(props: TicketTableProps) -> Element {
    let title_mark = indicator(&props, SortBy::Title);
    let priority_mark = indicator(&props, SortBy::Priority);
    let status_mark = indicator(&props, SortBy::Status);
    let created_mark = indicator(&props, SortBy::CreatedAt);
    let updated_mark = indicator(&props, SortBy::UpdatedAt);

    rsx! {
        div { class: "table-container",
            table { class: "data-table",
                thead {
                    tr {
                        th {
                            class: "sortable",
                            onclick: move |_| props.on_sort.call(SortBy::Title),
                            "Title{title_mark}"
                        }
                        th {
                            class: "sortable",
                            onclick: move |_| props.on_sort.call(SortBy::Priority),
                            "Priority{priority_mark}"
                        }
                        th {
                            class: "sortable",
                            onclick: move |_| props.on_sort.call(SortBy::Status),
                            "Status{status_mark}"
                        }
                        th {
                            class: "sortable",
                            onclick: move |_| props.on_sort.call(SortBy::CreatedAt),
                            "Created{created_mark}"
                        }
                        th {
                            class: "sortable",
                            onclick: move |_| props.on_sort.call(SortBy::UpdatedAt),
                            "Updated{updated_mark}"
                        }
                    }
                }
                tbody {
                    for ticket in props.tickets.iter() {
                        {
                            let ticket_id = ticket.id.to_string();
                            let created = ticket.created_at.format("%Y-%m-%d %H:%M").to_string();
                            let updated = ticket.updated_at.format("%Y-%m-%d %H:%M").to_string();

                            rsx! {
                                tr { class: "data-row",
                                    td {
                                        Link {
                                            to: "/tickets/{ticket_id}",
                                            class: "ticket-link",
                                            "{ticket.title}"
                                        }
                                    }
                                    td { PriorityBadge { priority: ticket.priority } }
                                    td { StatusBadge { status: ticket.status } }
                                    td { class: "tabular-nums", "{created}" }
                                    td { class: "tabular-nums", "{updated}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
