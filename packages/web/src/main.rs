// Dioxus `rsx!` macro expands to unwraps internally; allow to avoid false positives.
#![allow(clippy::disallowed_methods)]

use dioxus::prelude::*;

use ui::tickets::pages::{
    QueueStatsPage, TicketCreatePage, TicketDetailPage, TicketEditPage, TicketsPage,
};
use ui::Navbar;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(AppShell)]
        #[route("/")]
        Home {},
        #[route("/tickets")]
        Tickets {},
        #[route("/tickets/new")]
        TicketCreate {},
        #[route("/tickets/:id")]
        TicketDetail { id: String },
        #[route("/tickets/:id/edit")]
        TicketEdit { id: String },
        #[route("/admin/queues")]
        AdminQueues {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");
const TICKETS_CSS: Asset = asset!("/assets/tickets.css");

fn main() {
    #[cfg(feature = "server")]
    {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: TICKETS_CSS }

        Router::<Route> {}
    }
}

/// Shared chrome: navbar on top, routed page below.
#[component]
fn AppShell() -> Element {
    rsx! {
        Navbar {
            Link { to: Route::Tickets {}, "Tickets" }
            Link { to: Route::TicketCreate {}, "New Ticket" }
            Link { to: Route::AdminQueues {}, "Queues" }
        }

        main { class: "app-main",
            Outlet::<Route> {}
        }
    }
}

/// Redirect / to /tickets.
#[component]
fn Home() -> Element {
    let nav = use_navigator();
    use_effect(move || {
        nav.push(Route::Tickets {});
    });
    rsx! {}
}

/// Ticket list page.
#[component]
fn Tickets() -> Element {
    rsx! {
        TicketsPage {}
    }
}

/// Ticket creation page.
#[component]
fn TicketCreate() -> Element {
    rsx! {
        TicketCreatePage {}
    }
}

/// Ticket detail page.
#[component]
fn TicketDetail(id: String) -> Element {
    rsx! {
        TicketDetailPage { id }
    }
}

/// Ticket edit page.
#[component]
fn TicketEdit(id: String) -> Element {
    rsx! {
        TicketEditPage { id }
    }
}

/// Admin queue stats page.
#[component]
fn AdminQueues() -> Element {
    rsx! {
        QueueStatsPage {}
    }
}
