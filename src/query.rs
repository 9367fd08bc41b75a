//! Query descriptors and predicate assembly for user listings.
//!
//! A listing request is described by [`UserQuery`]: page, page size, sort
//! field and direction, and an optional [`UserFilters`] set. Filters compile
//! into tagged predicate conditions (one variant per predicate kind), and a
//! dedicated builder emits the parameterized clause text and the positional
//! bind values in lock-step. Caller-supplied values are never interpolated
//! into SQL text; sort columns and directions come from closed enums.

use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Fields a user listing may be sorted by
///
/// The column name is emitted from this enum, never from caller text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Username,
    Email,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Column name for the ORDER BY clause.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Username => "username",
            SortField::Email => "email",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Uppercased SQL keyword for the ORDER BY clause.
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Optional filter set for user listings
///
/// Absent fields impose no constraint. Present fields combine with logical
/// AND; there is no OR or negation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilters {
    /// Case-sensitive username substring match
    pub username: Option<String>,

    /// Exact email match
    pub email: Option<String>,

    /// Exact role match
    pub role: Option<String>,

    /// Active-flag equality
    pub is_active: Option<bool>,
}

impl UserFilters {
    /// Compiles the present filters into predicate conditions.
    pub(crate) fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();

        if let Some(username) = &self.username {
            conditions.push(Condition::UsernameContains(username.clone()));
        }
        if let Some(email) = &self.email {
            conditions.push(Condition::EmailEq(email.clone()));
        }
        if let Some(role) = &self.role {
            conditions.push(Condition::RoleEq(role.clone()));
        }
        if let Some(is_active) = self.is_active {
            conditions.push(Condition::ActiveEq(is_active));
        }

        conditions
    }
}

/// One predicate clause, tagged by kind and carrying its own bind value
///
/// Each variant emits a fixed SQL fragment with exactly one `?` placeholder;
/// the value is bound positionally when the query is built.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Condition {
    /// Case-sensitive substring match on username
    ///
    /// `instr` rather than LIKE: LIKE is case-insensitive for ASCII in
    /// SQLite, and wildcard characters in the fragment would act as
    /// patterns instead of literal text.
    UsernameContains(String),

    /// Exact email equality
    EmailEq(String),

    /// Exact role equality
    RoleEq(String),

    /// Active-flag equality
    ActiveEq(bool),
}

impl Condition {
    /// Parameterized clause fragment for this condition.
    pub(crate) fn sql(&self) -> &'static str {
        match self {
            Condition::UsernameContains(_) => "instr(username, ?) > 0",
            Condition::EmailEq(_) => "email = ?",
            Condition::RoleEq(_) => "role = ?",
            Condition::ActiveEq(_) => "is_active = ?",
        }
    }

    /// The positional bind value for this condition's `?` placeholder.
    pub(crate) fn bind_value(&self) -> BindValue {
        match self {
            Condition::UsernameContains(fragment) => BindValue::Text(fragment.clone()),
            Condition::EmailEq(email) => BindValue::Text(email.clone()),
            Condition::RoleEq(role) => BindValue::Text(role.clone()),
            Condition::ActiveEq(is_active) => BindValue::Flag(*is_active),
        }
    }
}

/// A value bound to one predicate placeholder
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BindValue {
    /// Text-typed bind (substring patterns and equality values)
    Text(String),

    /// Boolean bind, normalized to the store's representation by the driver
    Flag(bool),
}

/// Builds the WHERE clause for a condition set
///
/// Empty input yields an empty string; otherwise the fragments are joined
/// with AND.
pub(crate) fn where_clause(conditions: &[Condition]) -> String {
    if conditions.is_empty() {
        return String::new();
    }

    let fragments: Vec<&str> = conditions.iter().map(Condition::sql).collect();
    format!("WHERE {}", fragments.join(" AND "))
}

/// A user listing request
///
/// Defaults: page 1, page size 20, newest first by creation time, no
/// filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuery {
    /// 1-based page number (values below 1 are treated as 1)
    pub page: u32,

    /// Rows per page (values below 1 are treated as 1)
    pub page_size: u32,

    /// Sort field
    pub sort_by: SortField,

    /// Sort direction
    pub sort_order: SortOrder,

    /// Optional filter set
    pub filters: UserFilters,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            filters: UserFilters::default(),
        }
    }
}

/// Pagination metadata for a listing result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current 1-based page
    pub page: u32,

    /// Requested page size
    pub page_size: u32,

    /// Total rows matching the predicate
    pub total: i64,

    /// ceil(total / page_size); 0 when nothing matches
    pub total_pages: i64,
}

impl Pagination {
    /// Derives pagination metadata from a total match count.
    pub fn new(page: u32, page_size: u32, total: i64) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_pages = (total + page_size as i64 - 1) / page_size as i64;

        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

/// One page of users plus pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPage {
    /// Matching rows for the requested page, in sort order
    pub data: Vec<User>,

    /// Pagination metadata
    pub pagination: Pagination,
}
