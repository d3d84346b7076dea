//! Partner webhook payload
//!
//! Sent by the remote service to the partner endpoint registered for a
//! `webhook_token` once a donation made through a donation link completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ApiClientError, ApiErrorKind, EveryOrgError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookNonprofit {
    pub slug: String,
    pub ein: Option<String>,
    pub name: String,
}

/// Donation notification body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub charge_id: Uuid,
    pub partner_donation_id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub to_nonprofit: WebhookNonprofit,
    pub amount: f64,
    pub net_amount: f64,
    #[serde(default = "usd")]
    pub currency: String,
    #[serde(default)]
    pub frequency: String,
    pub donation_date: DateTime<Utc>,
    #[serde(default)]
    pub public_testimony: String,
    #[serde(default)]
    pub private_note: String,
}

fn usd() -> String {
    "USD".to_string()
}

impl WebhookRequest {
    /// Parse a webhook body.
    ///
    /// # Errors
    /// Returns an `ApiErrorKind::Decode` API error if the body is not a valid
    /// notification.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|err| {
            EveryOrgError::from(
                ApiClientError::new(ApiErrorKind::Decode, "Invalid webhook payload")
                    .with_source(err),
            )
        })
    }

    /// Processing fees withheld from the donation.
    pub fn fees(&self) -> f64 {
        self.amount - self.net_amount
    }
}
