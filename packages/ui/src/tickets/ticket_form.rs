//! Create/edit form for tickets.

use api::{CreateTicketRequest, UpdateTicketRequest};
use dioxus::prelude::*;
use ticket_core::{Priority, Ticket, DESCRIPTION_MAX_CHARS, TITLE_MIN_CHARS};

/// Props for TicketForm.
#[derive(Props, Clone, PartialEq)]
pub struct TicketFormProps {
    /// Ticket being edited; `None` means the form creates a new one.
    #[props(default)]
    pub initial: Option<Ticket>,
    /// Callback with the saved ticket.
    pub on_saved: EventHandler<Ticket>,
    /// Callback when the form is cancelled.
    pub on_cancel: EventHandler<()>,
}

/// Form component for creating or editing a ticket.
#[component]
pub fn TicketForm(props: TicketFormProps) -> Element {
    let editing = props.initial.as_ref().map(|t| t.id.to_string());

    let (init_title, init_description, init_priority) = match &props.initial {
        Some(ticket) => (
            ticket.title.clone(),
            ticket.description.clone(),
            ticket.priority.to_string(),
        ),
        None => (String::new(), String::new(), Priority::Low.to_string()),
    };

    let mut title = use_signal(|| init_title);
    let mut description = use_signal(|| init_description);
    let mut priority = use_signal(|| init_priority);
    let mut title_error = use_signal(|| None::<String>);
    let mut description_error = use_signal(|| None::<String>);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let submit = move |_| {
        let title_val = title();
        let description_val = description();
        let priority_val = priority();
        let editing = editing.clone();

        // Mirror the API's field rules so mistakes surface inline.
        title_error.set(None);
        description_error.set(None);
        let mut invalid = false;
        if title_val.chars().count() < TITLE_MIN_CHARS {
            title_error.set(Some(format!(
                "Title must be at least {TITLE_MIN_CHARS} characters"
            )));
            invalid = true;
        }
        if description_val.chars().count() > DESCRIPTION_MAX_CHARS {
            description_error.set(Some(format!(
                "Description must be at most {DESCRIPTION_MAX_CHARS} characters"
            )));
            invalid = true;
        }
        if invalid {
            return;
        }

        spawn(async move {
            submitting.set(true);
            error.set(None);

            let saved = match editing {
                None => {
                    api::create_ticket(CreateTicketRequest {
                        title: title_val,
                        description: description_val,
                        priority: priority_val,
                    })
                    .await
                }
                Some(id) => {
                    api::update_ticket(
                        id,
                        UpdateTicketRequest {
                            title: Some(title_val),
                            description: Some(description_val),
                            priority: Some(priority_val),
                            status: None,
                        },
                    )
                    .await
                }
            };

            match saved {
                Ok(ticket) => props.on_saved.call(ticket),
                Err(e) => error.set(Some(format!("Failed to save ticket: {e}"))),
            }

            submitting.set(false);
        });
    };

    rsx! {
        div { class: "ticket-form",
            if let Some(err) = error() {
                div { class: "error-banner",
                    span { "{err}" }
                    button { onclick: move |_| error.set(None), "×" }
                }
            }

            div { class: "form-group",
                label { "Title" }
                input {
                    placeholder: "Short summary...",
                    value: "{title}",
                    oninput: move |e| title.set(e.value()),
                }
                if let Some(err) = title_error() {
                    p { class: "field-error", "{err}" }
                }
            }

            div { class: "form-group",
                label { "Description" }
                textarea {
                    rows: 6,
                    placeholder: "Detail about the issue...",
                    value: "{description}",
                    oninput: move |e| description.set(e.value()),
                }
                if let Some(err) = description_error() {
                    p { class: "field-error", "{err}" }
                }
            }

            div { class: "form-group",
                label { "Priority" }
                select {
                    value: "{priority}",
                    onchange: move |e| priority.set(e.value()),

                    for p in Priority::ALL {
                        option { value: "{p}", "{p}" }
                    }
                }
            }

            div { class: "form-actions",
                button {
                    class: "btn btn-primary",
                    disabled: submitting(),
                    onclick: submit,
                    if submitting() {
                        "Saving..."
                    } else if props.initial.is_some() {
                        "Save"
                    } else {
                        "Create"
                    }
                }
                button {
                    class: "btn btn-secondary",
                    onclick: move |_| props.on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}
