use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Program {
    pub id: i64,
    pub provider_platform_id: i64,
    pub name: String,
    pub description: String,
    pub external_id: String,
    pub thumbnail_url: String,
}

/// One day of user interaction with a program. `time_delta` is the time spent
/// that day; `total_time` is the running total for the user and program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub user_id: i64,
    pub program_id: i64,
    pub activity_type: String,
    pub total_time: i64,
    pub time_delta: i64,
    pub external_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeType {
    Completion,
    Grade,
    Certificate,
    PathwayCompletion,
}

impl OutcomeType {
    pub const ALL: [OutcomeType; 4] = [
        OutcomeType::Completion,
        OutcomeType::Grade,
        OutcomeType::Certificate,
        OutcomeType::PathwayCompletion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeType::Completion => "completion",
            OutcomeType::Grade => "grade",
            OutcomeType::Certificate => "certificate",
            OutcomeType::PathwayCompletion => "pathway_completion",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: i64,
    pub user_id: i64,
    pub program_id: i64,
    #[serde(rename = "type")]
    pub outcome_type: OutcomeType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_type_names_match_serde() {
        for t in OutcomeType::ALL {
            let json = serde_json::to_value(t).unwrap();
            assert_eq!(json, serde_json::Value::String(t.as_str().to_string()));
        }
    }
}
