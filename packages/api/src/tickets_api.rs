//! Ticket management server functions.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use ticket_core::{CreateTicket, Ticket, TicketPage, TicketPatch, ValidationError};

/// Request type for creating a ticket.
///
/// Enum fields arrive as strings so a bad value comes back as a per-field
/// validation message instead of a deserialization failure. Unknown fields
/// are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTicketRequest {
    pub title: String,
    pub description: String,
    pub priority: String,
}

impl CreateTicketRequest {
    /// Parse into the validated domain input.
    pub fn into_input(self) -> Result<CreateTicket, ValidationError> {
        let priority = self
            .priority
            .parse()
            .map_err(|e: ticket_core::InvalidValue| ValidationError::field("priority", e.to_string()))?;

        Ok(CreateTicket {
            title: self.title,
            description: self.description,
            priority,
        })
    }
}

/// Request type for partially updating a ticket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTicketRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateTicketRequest {
    /// Parse into the domain patch, collecting every bad enum value.
    pub fn into_patch(self) -> Result<TicketPatch, ValidationError> {
        let mut errors = ValidationError::new();

        let priority = match self.priority {
            Some(value) => match value.parse::<ticket_core::Priority>() {
                Ok(p) => Some(p),
                Err(e) => {
                    errors.push("priority", e.to_string());
                    None
                }
            },
            None => None,
        };

        let status = match self.status {
            Some(value) => match value.parse::<ticket_core::TicketStatus>() {
                Ok(s) => Some(s),
                Err(e) => {
                    errors.push("status", e.to_string());
                    None
                }
            },
            None => None,
        };

        errors.into_result()?;

        Ok(TicketPatch {
            title: self.title,
            description: self.description,
            priority,
            status,
        })
    }
}

/// Acknowledgement for deletions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

/// Create a ticket. New tickets always start out OPEN.
#[post("/api/tickets")]
pub async fn create_ticket(request: CreateTicketRequest) -> Result<Ticket, ServerFnError> {
    #[cfg(feature = "server")]
    {
        let state = crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {e}")))?;

        let input = request
            .into_input()
            .map_err(|e| ServerFnError::new(e.to_string()))?;

        state
            .service
            .create(input)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = request;
        Err(ServerFnError::new("Server-only function"))
    }
}

/// List tickets with filtering, sorting and pagination.
#[get("/api/tickets")]
pub async fn list_tickets(
    status: Option<String>,
    priority: Option<String>,
    search: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
    sort_by: Option<String>,
    sort_order: Option<String>,
) -> Result<TicketPage, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use ticket_core::ListQuery;

        let state = crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {e}")))?;

        let mut errors = ValidationError::new();
        let query = ListQuery {
            status: parse_filter(&mut errors, "status", status),
            priority: parse_filter(&mut errors, "priority", priority),
            search,
            page,
            page_size,
            sort_by: parse_filter(&mut errors, "sortBy", sort_by),
            sort_order: parse_filter(&mut errors, "sortOrder", sort_order),
        };
        errors
            .into_result()
            .map_err(|e| ServerFnError::new(e.to_string()))?;

        state
            .service
            .list(query)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (status, priority, search, page, page_size, sort_by, sort_order);
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Get a ticket by ID.
#[get("/api/tickets/:id")]
pub async fn get_ticket(id: String) -> Result<Ticket, ServerFnError> {
    #[cfg(feature = "server")]
    {
        let state = crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {e}")))?;

        let ticket_id = parse_ticket_id(&id)?;

        state
            .service
            .find_one(ticket_id)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = id;
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Partially update a ticket.
#[post("/api/tickets/:id/update")]
pub async fn update_ticket(id: String, request: UpdateTicketRequest) -> Result<Ticket, ServerFnError> {
    #[cfg(feature = "server")]
    {
        let state = crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {e}")))?;

        let ticket_id = parse_ticket_id(&id)?;
        let patch = request
            .into_patch()
            .map_err(|e| ServerFnError::new(e.to_string()))?;

        state
            .service
            .update(ticket_id, patch)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (id, request);
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Delete a ticket.
#[post("/api/tickets/:id/delete")]
pub async fn delete_ticket(id: String) -> Result<Ack, ServerFnError> {
    #[cfg(feature = "server")]
    {
        let state = crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {e}")))?;

        let ticket_id = parse_ticket_id(&id)?;

        state
            .service
            .remove(ticket_id)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;

        Ok(Ack { ok: true })
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = id;
        Err(ServerFnError::new("Server-only function"))
    }
}

#[cfg(feature = "server")]
fn parse_ticket_id(id: &str) -> Result<ticket_core::TicketId, ServerFnError> {
    ticket_core::TicketId::parse(id)
        .map_err(|e| ServerFnError::new(format!("Invalid ticket ID: {e}")))
}

#[cfg(feature = "server")]
fn parse_filter<T: std::str::FromStr<Err = ticket_core::InvalidValue>>(
    errors: &mut ValidationError,
    field: &str,
    value: Option<String>,
) -> Option<T> {
    match value {
        Some(value) => match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                errors.push(field, e.to_string());
                None
            }
        },
        None => None,
    }
}
