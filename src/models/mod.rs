//! Data-transfer structs for every persisted table, plus the partial-update merge.

mod activity;
mod milestone;
mod provider;
mod user;

pub use activity::{Activity, Outcome, OutcomeType, Program};
pub use milestone::{Milestone, MilestoneOrder, MilestoneQuery, OrderColumn, SortDirection};
pub use provider::{ProviderPlatform, ProviderUserMapping};
pub use user::{Facility, LeftMenuLink, User};

/// Field-level merge used by partial updates: only non-zero / non-empty incoming fields
/// overwrite the stored value.
pub trait Merge {
    fn merge_from(&mut self, incoming: &Self);
}

/// The fixed list of migrated tables, in foreign-key dependency order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Facilities,
    Users,
    ProviderPlatforms,
    ProviderUserMappings,
    LeftMenuLinks,
    Programs,
    Milestones,
    Outcomes,
    Activities,
}

impl Table {
    pub const ALL: [Table; 9] = [
        Table::Facilities,
        Table::Users,
        Table::ProviderPlatforms,
        Table::ProviderUserMappings,
        Table::LeftMenuLinks,
        Table::Programs,
        Table::Milestones,
        Table::Outcomes,
        Table::Activities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Facilities => "facilities",
            Table::Users => "users",
            Table::ProviderPlatforms => "provider_platforms",
            Table::ProviderUserMappings => "provider_user_mappings",
            Table::LeftMenuLinks => "left_menu_links",
            Table::Programs => "programs",
            Table::Milestones => "milestones",
            Table::Outcomes => "outcomes",
            Table::Activities => "activities",
        }
    }
}

/// `deserialize_with` helper: an explicit JSON `null` decodes as the zero value, the same
/// as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + Default,
{
    use serde::Deserialize;
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn merge_i64(target: &mut i64, incoming: i64) {
    if incoming != 0 {
        *target = incoming;
    }
}

fn merge_string(target: &mut String, incoming: &str) {
    if !incoming.is_empty() {
        *target = incoming.to_string();
    }
}
