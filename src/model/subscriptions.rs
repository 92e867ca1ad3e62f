use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

/// New subscription request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub user_id: String,
    pub plan_name: String,
    /// ISO calendar date, not checked against `end_date`
    pub start_date: String,
    pub end_date: String,
    pub auto_renew: bool,
}

/// Stored subscription record, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    /// Member the plan was sold to; may dangle after the member is deleted
    pub user_id: String,
    pub plan_name: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub auto_renew: bool,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(id: String, new_subscription: NewSubscription) -> Self {
        Self {
            id,
            user_id: new_subscription.user_id,
            plan_name: new_subscription.plan_name,
            start_date: new_subscription.start_date,
            end_date: new_subscription.end_date,
            auto_renew: new_subscription.auto_renew,
            created_at: Utc::now(),
        }
    }
}
