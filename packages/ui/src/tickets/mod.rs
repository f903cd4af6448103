//! Ticket UI components and pages.

mod badges;
mod filters;
mod pagination;
mod ticket_form;
mod ticket_table;

pub mod pages;

pub use badges::{PriorityBadge, QueueStateBadge, StatusBadge};
pub use filters::FilterBar;
pub use pagination::Pagination;
pub use ticket_form::TicketForm;
pub use ticket_table::TicketTable;
