//! Ticket domain types for tracked work items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{InvalidValue, ValidationError};

/// Minimum length of a ticket title, in characters.
pub const TITLE_MIN_CHARS: usize = 5;
/// Maximum length of a ticket description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 5000;

/// Unique identifier for a ticket, using ULID for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub Ulid);

impl TicketId {
    /// Create a new unique ticket ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a ticket ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How urgent a ticket is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            other => Err(InvalidValue::new("priority", other, "LOW, MEDIUM, HIGH")),
        }
    }
}

/// Where a ticket is in its lifecycle.
///
/// Transitions are unconstrained; reaching `Resolved` stops SLA enforcement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "OPEN",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::Resolved => "RESOLVED",
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TicketStatus::Resolved)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(TicketStatus::Open),
            "IN_PROGRESS" => Ok(TicketStatus::InProgress),
            "RESOLVED" => Ok(TicketStatus::Resolved),
            other => Err(InvalidValue::new(
                "status",
                other,
                "OPEN, IN_PROGRESS, RESOLVED",
            )),
        }
    }
}

/// A tracked work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Unique identifier, assigned at creation, immutable.
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    /// Maintained by the store.
    pub created_at: DateTime<Utc>,
    /// Maintained by the store.
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Merge a partial update over this ticket, field by field.
    ///
    /// Absent patch fields preserve the stored value.
    pub fn apply_patch(&mut self, patch: &TicketPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Input for creating a ticket. Status is not accepted: new tickets open as OPEN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTicket {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl CreateTicket {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_title(&mut errors, &self.title);
        check_description(&mut errors, &self.description);
        errors.into_result()
    }
}

/// Partial update for a ticket. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TicketStatus>,
}

impl TicketPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if let Some(title) = &self.title {
            check_title(&mut errors, title);
        }
        if let Some(description) = &self.description {
            check_description(&mut errors, description);
        }
        errors.into_result()
    }
}

fn check_title(errors: &mut ValidationError, title: &str) {
    if title.chars().count() < TITLE_MIN_CHARS {
        errors.push(
            "title",
            format!("must be at least {TITLE_MIN_CHARS} characters"),
        );
    }
}

fn check_description(errors: &mut ValidationError, description: &str) {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.push(
            "description",
            format!("must be at most {DESCRIPTION_MAX_CHARS} characters"),
        );
    }
}

/// Column to sort a ticket listing by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    Priority,
    Status,
    Title,
}

impl SortBy {
    /// Storage column backing this sort key.
    pub fn column(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "created_at",
            SortBy::UpdatedAt => "updated_at",
            SortBy::Priority => "priority",
            SortBy::Status => "status",
            SortBy::Title => "title",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "createdAt",
            SortBy::UpdatedAt => "updatedAt",
            SortBy::Priority => "priority",
            SortBy::Status => "status",
            SortBy::Title => "title",
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortBy {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortBy::CreatedAt),
            "updatedAt" => Ok(SortBy::UpdatedAt),
            "priority" => Ok(SortBy::Priority),
            "status" => Ok(SortBy::Status),
            "title" => Ok(SortBy::Title),
            other => Err(InvalidValue::new(
                "sortBy",
                other,
                "createdAt, updatedAt, priority, status, title",
            )),
        }
    }
}

/// Sort direction for a ticket listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL-style keyword for this direction.
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(InvalidValue::new("sortOrder", other, "asc, desc")),
        }
    }
}

/// Query for listing tickets with filtering, sorting and pagination.
///
/// Raw values are kept as received; the accessors apply the clamping rules
/// (`page >= 1`, `page_size` in `[1, 100]`, defaults 1/10).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ListQuery {
    /// Requested page, clamped to a minimum of 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32
    }

    /// Requested page size, clamped to `[1, 100]`, defaulting to 10.
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(10).clamp(1, 100) as u32
    }

    /// Number of records to skip for the requested page.
    pub fn offset(&self) -> u64 {
        (u64::from(self.page()) - 1) * u64::from(self.page_size())
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by.unwrap_or_default()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order.unwrap_or_default()
    }

    /// Search term, ignoring empty strings.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

/// One page of a ticket listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPage {
    pub items: Vec<Ticket>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl TicketPage {
    /// Assemble a page envelope; `total_pages = ceil(total / page_size)`.
    pub fn new(items: Vec<Ticket>, page: u32, page_size: u32, total: u64) -> Self {
        Self {
            items,
            page,
            page_size,
            total,
            total_pages: total.div_ceil(u64::from(page_size)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_validation_checks_title_and_description() {
        let input = CreateTicket {
            title: "Bug!".to_string(),
            description: "x".repeat(DESCRIPTION_MAX_CHARS + 1),
            priority: Priority::High,
        };
        let err = input.validate().unwrap_err();
        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description"]);

        let ok = CreateTicket {
            title: "Bug!!".to_string(),
            description: String::new(),
            priority: Priority::Low,
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn patch_only_validates_present_fields() {
        assert!(TicketPatch::default().validate().is_ok());

        let patch = TicketPatch {
            title: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(patch.validate().unwrap_err().errors[0].field, "title");
    }

    #[test]
    fn apply_patch_preserves_absent_fields() {
        let mut ticket = Ticket {
            id: TicketId::new(),
            title: "Login broken".to_string(),
            description: "Cannot sign in".to_string(),
            priority: Priority::High,
            status: TicketStatus::Open,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        ticket.apply_patch(&TicketPatch {
            status: Some(TicketStatus::Resolved),
            ..Default::default()
        });
        assert_eq!(ticket.title, "Login broken");
        assert_eq!(ticket.priority, Priority::High);
        assert_eq!(ticket.status, TicketStatus::Resolved);
    }

    #[test]
    fn list_query_clamps_page_and_page_size() {
        let query = ListQuery {
            page: Some(-1),
            page_size: Some(200),
            ..Default::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), 100);

        let defaults = ListQuery::default();
        assert_eq!(defaults.page(), 1);
        assert_eq!(defaults.page_size(), 10);
        assert_eq!(defaults.sort_by(), SortBy::CreatedAt);
        assert_eq!(defaults.sort_order(), SortOrder::Desc);

        let zero = ListQuery {
            page: Some(0),
            page_size: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.page(), 1);
        assert_eq!(zero.page_size(), 1);
    }

    #[test]
    fn page_envelope_rounds_total_pages_up() {
        assert_eq!(TicketPage::new(vec![], 1, 10, 0).total_pages, 0);
        assert_eq!(TicketPage::new(vec![], 1, 10, 1).total_pages, 1);
        assert_eq!(TicketPage::new(vec![], 1, 10, 10).total_pages, 1);
        assert_eq!(TicketPage::new(vec![], 1, 10, 11).total_pages, 2);
    }

    #[test]
    fn enum_wire_values_round_trip() {
        assert_eq!("IN_PROGRESS".parse::<TicketStatus>().unwrap(), TicketStatus::InProgress);
        assert_eq!(TicketStatus::InProgress.to_string(), "IN_PROGRESS");
        assert!("in_progress".parse::<TicketStatus>().is_err());
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("URGENT".parse::<Priority>().is_err());
    }
}
