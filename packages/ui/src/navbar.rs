use dioxus::prelude::*;

/// Top navigation bar wrapping the routes the caller links to.
#[component]
pub fn Navbar(children: Element) -> Element {
    rsx! {
        header { class: "navbar",
            div { class: "navbar-brand", "TicketDesk" }
            nav { class: "navbar-links", {children} }
        }
    }
}
