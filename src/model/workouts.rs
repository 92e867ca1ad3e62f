use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

/// New monthly workout plan for a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkout {
    /// Free-form label such as "March 2024"
    pub month: String,
    pub content: String,
    pub pdf_url: Option<String>,
}

/// Stored workout plan, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub month: String,
    pub content: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
    pub sent_at: DateTime<Utc>,
}

impl Workout {
    pub fn new(id: String, user_id: String, new_workout: NewWorkout) -> Self {
        Self {
            id,
            user_id,
            month: new_workout.month,
            content: new_workout.content,
            pdf_url: new_workout.pdf_url,
            sent_at: Utc::now(),
        }
    }
}
