//! Ticket edit page: loads the ticket, then reuses the form.

use dioxus::prelude::*;
use ticket_core::Ticket;

use crate::tickets::TicketForm;

/// Props for TicketEditPage.
#[derive(Props, Clone, PartialEq)]
pub struct TicketEditPageProps {
    pub id: String,
}

/// Ticket edit page component.
#[component]
pub fn TicketEditPage(props: TicketEditPageProps) -> Element {
    let nav = use_navigator();
    let mut ticket = use_signal(|| None::<Ticket>);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| None::<String>);

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

    let detail_path = format!("/tickets/{}", props.id);
    let cancel_path = detail_path.clone();

    rsx! {
        div { class: "page-container",
            nav { class: "breadcrumb",
                Link { to: "/tickets", class: "breadcrumb-link", "Tickets" }
                span { class: "breadcrumb-separator", "/" }
                span { class: "breadcrumb-current", "Edit" }
            }

            if let Some(err) = error() {
                div { class: "error-banner", "{err}" }
            }

            if loading() {
                div { class: "loading", "Loading ticket..." }
            } else if let Some(t) = ticket() {
                div { class: "page-header",
                    div { class: "page-header-content",
                        h1 { class: "page-title", "Edit: {t.title}" }
                    }
                }

                div { class: "card",
                    TicketForm {
                        initial: Some(t.clone()),
                        on_saved: {
                            let detail_path = detail_path.clone();
                            move |_| {
                                nav.push(detail_path.clone());
                            }
                        },
                        on_cancel: {
                            let cancel_path = cancel_path.clone();
                            move |_| {
                                nav.push(cancel_path.clone());
                            }
                        },
                    }
                }
            }
        }
    }
}
