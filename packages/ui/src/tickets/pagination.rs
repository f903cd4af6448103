//! Pagination controls for the ticket list.

use dioxus::prelude::*;

/// Props for Pagination.
#[derive(Props, Clone, PartialEq)]
pub struct PaginationProps {
    pub page: u32,
    pub total_pages: u64,
    pub total: u64,
    pub on_page: EventHandler<u32>,
}

/// Previous/next controls with a position readout.
#[component]
pub fn Pagination(props: PaginationProps) -> Element {
    let page = props.page;
    let at_start = page <= 1;
    let at_end = u64::from(page) >= props.total_pages;

    rsx! {
        div { class: "pagination",
            button {
                class: "btn btn-small",
                disabled: at_start,
                onclick: move |_| props.on_page.call(page.saturating_sub(1).max(1)),
                "Previous"
            }
            span { class: "pagination-status",
                "Page {props.page} of {props.total_pages.max(1)} ({props.total} tickets)"
            }
            button {
                class: "btn btn-small",
                disabled: at_end,
                onclick: move |_| props.on_page.call(page.saturating_add(1)),
                "Next"
            }
        }
    }
}
