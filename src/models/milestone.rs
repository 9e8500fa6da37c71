use super::{merge_i64, merge_string, null_as_default, Merge};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A tracked learning achievement tied to a program (and optionally a user).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Milestone {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub program_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub milestone_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub external_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Merge for Milestone {
    /// Id and timestamps are owned by the store and never taken from the payload.
    fn merge_from(&mut self, incoming: &Self) {
        merge_i64(&mut self.program_id, incoming.program_id);
        merge_i64(&mut self.user_id, incoming.user_id);
        merge_string(&mut self.name, &incoming.name);
        merge_string(&mut self.description, &incoming.description);
        merge_string(&mut self.milestone_type, &incoming.milestone_type);
        merge_string(&mut self.external_id, &incoming.external_id);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderColumn {
    Id,
    Name,
    ProgramId,
    UserId,
    MilestoneType,
    CreatedAt,
    UpdatedAt,
}

impl OrderColumn {
    pub fn column_name(&self) -> &'static str {
        match self {
            OrderColumn::Id => "id",
            OrderColumn::Name => "name",
            OrderColumn::ProgramId => "program_id",
            OrderColumn::UserId => "user_id",
            OrderColumn::MilestoneType => "milestone_type",
            OrderColumn::CreatedAt => "created_at",
            OrderColumn::UpdatedAt => "updated_at",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "id" => OrderColumn::Id,
            "name" => OrderColumn::Name,
            "program_id" => OrderColumn::ProgramId,
            "user_id" => OrderColumn::UserId,
            "milestone_type" => OrderColumn::MilestoneType,
            "created_at" => OrderColumn::CreatedAt,
            "updated_at" => OrderColumn::UpdatedAt,
            _ => return None,
        })
    }

    fn compare(&self, a: &Milestone, b: &Milestone) -> Ordering {
        match self {
            OrderColumn::Id => a.id.cmp(&b.id),
            OrderColumn::Name => a.name.cmp(&b.name),
            OrderColumn::ProgramId => a.program_id.cmp(&b.program_id),
            OrderColumn::UserId => a.user_id.cmp(&b.user_id),
            OrderColumn::MilestoneType => a.milestone_type.cmp(&b.milestone_type),
            OrderColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            OrderColumn::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Ordering for the milestone listing. Only whitelisted columns are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MilestoneOrder {
    pub column: OrderColumn,
    pub direction: SortDirection,
}

impl Default for MilestoneOrder {
    fn default() -> Self {
        MilestoneOrder {
            column: OrderColumn::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl MilestoneOrder {
    /// Parse `"column"` or `"column asc|desc"`. Empty input yields the default order;
    /// anything unrecognised yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let Some(column) = parts.next() else {
            return Some(Self::default());
        };
        let column = OrderColumn::from_name(&column.to_ascii_lowercase())?;
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(MilestoneOrder { column, direction })
    }

    /// Compare two rows under this ordering, breaking ties by id.
    pub fn compare(&self, a: &Milestone, b: &Milestone) -> Ordering {
        let primary = match self.direction {
            SortDirection::Asc => self.column.compare(a, b),
            SortDirection::Desc => self.column.compare(b, a),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Search, ordering and paging for one listing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MilestoneQuery {
    pub search: String,
    pub order: MilestoneOrder,
    pub page: u32,
    pub per_page: u32,
}

impl MilestoneQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Case-insensitive substring match over name and description.
    pub fn matches(&self, milestone: &Milestone) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        milestone.name.to_lowercase().contains(&needle)
            || milestone.description.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Milestone {
        Milestone {
            id: 5,
            program_id: 3,
            user_id: 2,
            name: "Finish Module 1".into(),
            description: "first module".into(),
            milestone_type: "enrollment".into(),
            ..Default::default()
        }
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let mut target = stored();
        let incoming = Milestone {
            name: "Updated".into(),
            ..Default::default()
        };
        target.merge_from(&incoming);
        assert_eq!(target.id, 5);
        assert_eq!(target.name, "Updated");
        assert_eq!(target.program_id, 3);
        assert_eq!(target.description, "first module");
    }

    #[test]
    fn merge_ignores_payload_id() {
        let mut target = stored();
        let incoming = Milestone {
            id: 99,
            program_id: 7,
            ..Default::default()
        };
        target.merge_from(&incoming);
        assert_eq!(target.id, 5);
        assert_eq!(target.program_id, 7);
    }

    #[test]
    fn merge_is_idempotent() {
        let incoming = Milestone {
            name: "Updated".into(),
            user_id: 8,
            ..Default::default()
        };
        let mut once = stored();
        once.merge_from(&incoming);
        let mut twice = once.clone();
        twice.merge_from(&incoming);
        assert_eq!(once, twice);
    }

    #[test]
    fn decode_zero_values_missing_fields() {
        let m: Milestone =
            serde_json::from_str(r#"{"name":"Finish Module 1","program_id":3,"unknown":true}"#).unwrap();
        assert_eq!(m.id, 0);
        assert_eq!(m.name, "Finish Module 1");
        assert_eq!(m.program_id, 3);
        assert!(m.description.is_empty());
        assert!(m.created_at.is_none());
    }

    #[test]
    fn decode_null_as_zero_value() {
        let m: Milestone = serde_json::from_str(
            r#"{"id":null,"name":"Finish Module 1","program_id":null,"description":null,"created_at":null}"#,
        )
        .unwrap();
        assert_eq!(m.id, 0);
        assert_eq!(m.program_id, 0);
        assert_eq!(m.name, "Finish Module 1");
        assert!(m.description.is_empty());
        assert!(m.created_at.is_none());
    }

    #[test]
    fn parse_order() {
        assert_eq!(MilestoneOrder::parse(""), Some(MilestoneOrder::default()));
        assert_eq!(
            MilestoneOrder::parse("name DESC"),
            Some(MilestoneOrder {
                column: OrderColumn::Name,
                direction: SortDirection::Desc,
            })
        );
        assert_eq!(
            MilestoneOrder::parse("program_id"),
            Some(MilestoneOrder {
                column: OrderColumn::ProgramId,
                direction: SortDirection::Asc,
            })
        );
        assert_eq!(MilestoneOrder::parse("password"), None);
        assert_eq!(MilestoneOrder::parse("name; DROP TABLE users"), None);
        assert_eq!(MilestoneOrder::parse("name sideways"), None);
    }

    #[test]
    fn desc_order_breaks_ties_by_id() {
        let order = MilestoneOrder::parse("program_id desc").unwrap();
        let a = Milestone { id: 1, program_id: 3, ..Default::default() };
        let b = Milestone { id: 2, program_id: 3, ..Default::default() };
        let c = Milestone { id: 3, program_id: 9, ..Default::default() };
        let mut rows = vec![a.clone(), b.clone(), c.clone()];
        rows.sort_by(|x, y| order.compare(x, y));
        let ids: Vec<i64> = rows.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn search_matches_name_or_description() {
        let q = MilestoneQuery {
            search: "MODULE".into(),
            order: MilestoneOrder::default(),
            page: 1,
            per_page: 10,
        };
        assert!(q.matches(&stored()));
        let other = Milestone {
            name: "Quiz".into(),
            description: "weekly".into(),
            ..Default::default()
        };
        assert!(!q.matches(&other));
    }

    #[test]
    fn offset_from_page() {
        let q = MilestoneQuery {
            search: String::new(),
            order: MilestoneOrder::default(),
            page: 3,
            per_page: 10,
        };
        assert_eq!(q.offset(), 20);
    }
}
