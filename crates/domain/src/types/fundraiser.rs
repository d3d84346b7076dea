//! Fundraiser request and response schemas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_currency() -> String {
    "USD".to_string()
}

/// Body of `POST /v0.2/fundraiser`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundraiserRequest {
    pub nonprofit_id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub goal: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raised_offline: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub image_base64: String,
}

/// Fundraiser returned by the lookup and creation endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fundraiser {
    pub id: String,
    pub nonprofit_id: String,
    pub title: String,
    pub description: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub goal: Option<f64>,
    pub raised_offline: Option<f64>,
    pub currency: Option<String>,
}

/// How a fundraiser goal was set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FundraiserGoalType {
    Custom,
    #[default]
    Automatic,
}

/// Response of `GET /v0.2/fundraiser/{orgId}/{fundraiserId}/raised`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FundraiserRaised {
    pub currency: String,
    pub raised: f64,
    pub supporters: u64,
    pub goal_amount: f64,
    pub goal_type: FundraiserGoalType,
}

impl Default for FundraiserRaised {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            raised: 0.0,
            supporters: 0,
            goal_amount: 0.0,
            goal_type: FundraiserGoalType::default(),
        }
    }
}
