//! Ticket repository for CRUD and filtered listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use ticket_core::{CreateTicket, ListQuery, Priority, Ticket, TicketId, TicketStatus};

use crate::{Database, DbError};

/// Repository for ticket persistence operations.
#[derive(Clone)]
pub struct TicketRepository {
    db: Database,
}

/// Internal record type for SurrealDB reads.
#[derive(Debug, Deserialize)]
struct TicketRecord {
    id: Option<Thing>,
    title: String,
    description: String,
    priority: Priority,
    status: TicketStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TicketRecord {
    fn ticket_id(&self) -> Result<TicketId, DbError> {
        let raw = self.id.as_ref().map(|t| t.id.to_raw()).unwrap_or_default();
        TicketId::parse(&raw)
            .map_err(|e| DbError::Query(format!("bad ticket record id {raw:?}: {e}")))
    }

    fn into_ticket(self, id: TicketId) -> Ticket {
        Ticket {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Struct for creating tickets - omits datetime fields to use SurrealDB defaults.
#[derive(Debug, Serialize)]
struct TicketCreate {
    title: String,
    description: String,
    priority: Priority,
    status: TicketStatus,
}

impl TicketRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a new ticket. New tickets always start out OPEN.
    pub async fn create(&self, input: &CreateTicket) -> Result<Ticket, DbError> {
        let id = TicketId::new();

        let create_data = TicketCreate {
            title: input.title.clone(),
            description: input.description.clone(),
            priority: input.priority,
            status: TicketStatus::Open,
        };

        let record: Option<TicketRecord> = self
            .db
            .create(("ticket", id.to_string()))
            .content(create_data)
            .await?;

        record
            .map(|r| r.into_ticket(id))
            .ok_or_else(|| DbError::Query("failed to create ticket".into()))
    }

    /// Get a ticket by ID.
    pub async fn get(&self, id: TicketId) -> Result<Ticket, DbError> {
        let record: Option<TicketRecord> = self.db.select(("ticket", id.to_string())).await?;

        record
            .map(|r| r.into_ticket(id))
            .ok_or_else(|| DbError::NotFound(format!("ticket not found: {id}")))
    }

    /// Replace a ticket's mutable fields; `updated_at` is bumped server-side.
    pub async fn update(&self, ticket: &Ticket) -> Result<Ticket, DbError> {
        let mut result = self
            .db
            .query(
                "UPDATE type::thing('ticket', $id) SET title = $title, description = $description, \
                 priority = $priority, status = $status, updated_at = time::now() RETURN AFTER",
            )
            .bind(("id", ticket.id.to_string()))
            .bind(("title", ticket.title.clone()))
            .bind(("description", ticket.description.clone()))
            .bind(("priority", ticket.priority))
            .bind(("status", ticket.status))
            .await?;

        let records: Vec<TicketRecord> = result.take(0)?;

        records
            .into_iter()
            .next()
            .map(|r| r.into_ticket(ticket.id))
            .ok_or_else(|| DbError::NotFound(format!("ticket not found: {}", ticket.id)))
    }

    /// Delete a ticket.
    pub async fn delete(&self, id: TicketId) -> Result<(), DbError> {
        let _: Option<TicketRecord> = self.db.delete(("ticket", id.to_string())).await?;

        Ok(())
    }

    /// List tickets matching the query, returning the page plus the filtered
    /// total from a single transaction.
    pub async fn list(&self, query: &ListQuery) -> Result<(Vec<Ticket>, u64), DbError> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut bindings: Vec<(&str, String)> = Vec::new();

        if let Some(status) = query.status {
            conditions.push("status = $status");
            bindings.push(("status", status.to_string()));
        }

        if let Some(priority) = query.priority {
            conditions.push("priority = $priority");
            bindings.push(("priority", priority.to_string()));
        }

        if let Some(search) = query.search() {
            // Case-sensitive substring match over title OR description.
            conditions.push("(title CONTAINS $search OR description CONTAINS $search)");
            bindings.push(("search", search.to_string()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // One transaction, so the page and the count see the same snapshot.
        let query_text = format!(
            "BEGIN TRANSACTION; \
             SELECT * FROM ticket {where_clause} ORDER BY {column} {direction} LIMIT {limit} START {start}; \
             SELECT count() FROM ticket {where_clause} GROUP ALL; \
             COMMIT TRANSACTION;",
            column = query.sort_by().column(),
            direction = query.sort_order().keyword(),
            limit = query.page_size(),
            start = query.offset(),
        );

        let mut result = self.db.query(&query_text);
        for (name, value) in bindings {
            result = result.bind((name, value));
        }

        let mut response = result.await?;
        let records: Vec<TicketRecord> = response.take(0)?;

        #[derive(Deserialize)]
        struct CountRow {
            count: i64,
        }

        let counts: Vec<CountRow> = response.take(1)?;
        let total = counts.first().map_or(0, |c| c.count.max(0) as u64);

        let mut items = Vec::with_capacity(records.len());
        for record in records {
            let id = record.ticket_id()?;
            items.push(record.into_ticket(id));
        }

        Ok((items, total))
    }
}
