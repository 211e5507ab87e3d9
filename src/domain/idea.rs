use {
    super::id::IdeaId,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaSummary {
    pub id: IdeaId,
    pub title: String,
    pub stage: String,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// A recorded gate decision (`dashboard_decisions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub idea_id: IdeaId,
    pub decision_type: String,
    pub made_by: String,
    pub reasoning: String,
    pub created_at: DateTime<Utc>,
}

/// A change of direction (`dashboard_pivots`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub id: String,
    pub idea_id: IdeaId,
    pub pivot_number: i32,
    pub pivot_type: String,
    pub new_direction: String,
    pub outcome: String,
    pub created_at: DateTime<Utc>,
}

impl Pivot {
    pub fn outcome_tone(&self) -> &'static str {
        match self.outcome.as_str() {
            "success" => "text-status-green",
            "failure" => "text-status-red",
            _ => "text-status-amber",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioProduct {
    pub id: String,
    pub name: String,
    pub phase: String,
    pub kill_reason: Option<String>,
}
