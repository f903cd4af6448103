//! Ticket pages wired into the web router.

mod queue_stats_page;
mod ticket_create_page;
mod ticket_detail_page;
mod ticket_edit_page;
mod tickets_page;

pub use queue_stats_page::QueueStatsPage;
pub use ticket_create_page::TicketCreatePage;
pub use ticket_detail_page::TicketDetailPage;
pub use ticket_edit_page::TicketEditPage;
pub use tickets_page::TicketsPage;
