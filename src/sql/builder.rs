//! Builds the parameterized milestone listing queries (page + count).

use crate::models::{MilestoneQuery, Table};

/// Columns selected for every milestone read, in `Milestone` field order.
pub const MILESTONE_COLUMNS: &[&str] = &[
    "id",
    "program_id",
    "user_id",
    "name",
    "description",
    "milestone_type",
    "external_id",
    "created_at",
    "updated_at",
];

/// Quote identifier for PostgreSQL (safe: only from whitelists).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub fn column_list(columns: &[&str]) -> String {
    columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, PartialEq, Eq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<String>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: String) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Escape LIKE wildcards so user input matches literally (default escape char is `\`).
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// WHERE clause for the free-text search, or empty when there is none.
fn search_clause(q: &mut QueryBuf, search: &str) -> String {
    if search.is_empty() {
        return String::new();
    }
    let n = q.push_param(like_pattern(search));
    format!(
        " WHERE {} ILIKE ${n} OR {} ILIKE ${n}",
        quoted("name"),
        quoted("description"),
    )
}

/// SELECT one page of milestones: search over name/description, whitelisted ORDER BY
/// with id as tie-breaker, literal LIMIT/OFFSET.
pub fn select_milestone_page(query: &MilestoneQuery) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = quoted(Table::Milestones.as_str());
    let where_clause = search_clause(&mut q, &query.search);
    let order = &query.order;
    let mut order_clause = format!(
        " ORDER BY {} {}",
        quoted(order.column.column_name()),
        order.direction.keyword()
    );
    if order.column.column_name() != "id" {
        order_clause.push_str(&format!(", {} ASC", quoted("id")));
    }
    q.sql = format!(
        "SELECT {} FROM {}{}{} LIMIT {} OFFSET {}",
        column_list(MILESTONE_COLUMNS),
        table,
        where_clause,
        order_clause,
        query.per_page,
        query.offset()
    );
    q
}

/// SELECT COUNT(*) with the same search filter as the page query.
pub fn count_milestones(query: &MilestoneQuery) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = quoted(Table::Milestones.as_str());
    let where_clause = search_clause(&mut q, &query.search);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", table, where_clause);
    q
}
