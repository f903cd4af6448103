//! Filter bar for the ticket list: search plus status/priority selects.

use dioxus::prelude::*;
use ticket_core::{Priority, TicketStatus};

/// Props for FilterBar.
#[derive(Props, Clone, PartialEq)]
pub struct FilterBarProps {
    pub search: String,
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    /// Fired when the user submits a search term (Enter).
    pub on_search: EventHandler<String>,
    pub on_status: EventHandler<Option<TicketStatus>>,
    pub on_priority: EventHandler<Option<Priority>>,
}

/// Filter controls for the ticket list page.
#[component]
pub fn FilterBar(props: FilterBarProps) -> Element {
    let mut draft = use_signal(|| props.search.clone());

    let status_value = props
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "ALL".to_string());
    let priority_value = props
        .priority
        .map(|p| p.to_string())
        .unwrap_or_else(|| "ALL".to_string());

    rsx! {
        div { class: "filter-bar",
            div { class: "filter-group filter-search",
                label { "Search" }
                input {
                    placeholder: "title/description...",
                    value: "{draft}",
                    oninput: move |e| draft.set(e.value()),
                    onkeydown: move |e| {
                        if e.key() == Key::Enter {
                            props.on_search.call(draft());
                        }
                    },
                }
            }
            div { class: "filter-group",
                label { "Status" }
                select {
                    value: "{status_value}",
                    onchange: move |e| props.on_status.call(e.value().parse::<TicketStatus>().ok()),

                    option { value: "ALL", "All" }
                    for status in TicketStatus::ALL {
                        option { value: "{status}", "{status}" }
                    }
                }
            }
            div { class: "filter-group",
                label { "Priority" }
                select {
                    value: "{priority_value}",
                    onchange: move |e| props.on_priority.call(e.value().parse::<Priority>().ok()),

                    option { value: "ALL", "All" }
                    for priority in Priority::ALL {
                        option { value: "{priority}", "{priority}" }
                    }
                }
            }
        }
    }
}
