//! Ticket creation page.

use dioxus::prelude::*;

use crate::tickets::TicketForm;

/// Ticket creation page component.
#[component]
pub fn TicketCreatePage() -> Element {
    let nav = use_navigator();

    rsx! {
        div { class: "page-container",
            nav { class: "breadcrumb",
                Link { to: "/tickets", class: "breadcrumb-link", "Tickets" }
                span { class: "breadcrumb-separator", "/" }
                span { class: "breadcrumb-current", "New Ticket" }
            }

            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "New Ticket" }
                }
            }

            div { class: "card",
                TicketForm {
                    on_saved: move |_| {
                        nav.push("/tickets");
                    },
                    on_cancel: move |_| {
                        nav.push("/tickets");
                    },
                }
            }
        }
    }
}
