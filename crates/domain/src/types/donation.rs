//! Donation link request
//!
//! `environment` and `organization_id` never reach the query string: they
//! pick the URL template and the path segment. Every other field is optional
//! and is emitted only when set, under a fixed query key.

use serde::{Deserialize, Serialize};

/// Which hosted donation flow a link targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationEnvironment {
    #[default]
    Production,
    Sandbox,
}

/// Payment methods offered by the hosted donation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "card")]
    Card,
    #[serde(rename = "bank")]
    Bank,
    #[serde(rename = "paypal")]
    PayPal,
    #[serde(rename = "venmo")]
    Venmo,
    /// Mobile payments
    #[serde(rename = "pay")]
    MobilePay,
    #[serde(rename = "crypto")]
    Crypto,
    #[serde(rename = "stocks")]
    Stocks,
    #[serde(rename = "daf")]
    Daf,
    #[serde(rename = "gift")]
    GiftCard,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Bank => "bank",
            Self::PayPal => "paypal",
            Self::Venmo => "venmo",
            Self::MobilePay => "pay",
            Self::Crypto => "crypto",
            Self::Stocks => "stocks",
            Self::Daf => "daf",
            Self::GiftCard => "gift",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Once,
    Monthly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Once => "ONCE",
            Self::Monthly => "MONTHLY",
        }
    }
}

/// A query-string value before percent-encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Scalar(String),
    /// Rendered as comma-joined elements.
    List(Vec<String>),
}

/// Request for a hosted donation link
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonateRequest {
    pub environment: DonationEnvironment,
    /// Nonprofit slug or id placed in the URL path. Required.
    pub organization_id: String,
    pub amount: Option<f64>,
    /// Up to five amounts shown as buttons under the amount field.
    pub suggested_amounts: Option<Vec<f64>>,
    pub minimum_amount: Option<f64>,
    pub frequency: Option<Frequency>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub description: Option<String>,
    /// Hide the modal background so the donor cannot exit the flow.
    pub no_exit: Option<bool>,
    pub success_url: Option<String>,
    pub exit_url: Option<String>,
    pub partner_donation_id: Option<String>,
    /// Base64 JSON forwarded untouched in the partner webhook.
    pub partner_metadata: Option<String>,
    pub require_share_info: Option<bool>,
    pub share_info: Option<bool>,
    /// Recommendation only; grants are unrestricted.
    pub designation: Option<String>,
    pub webhook_token: Option<String>,
    pub theme_color: Option<String>,
    pub method: Option<PaymentMethod>,
}

impl DonateRequest {
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self { organization_id: organization_id.into(), ..Self::default() }
    }

    pub fn sandbox(mut self) -> Self {
        self.environment = DonationEnvironment::Sandbox;
        self
    }

    /// Present fields as `(query key, value)` pairs, in declaration order.
    pub fn query_fields(&self) -> Vec<(&'static str, QueryValue)> {
        let mut fields = Vec::new();

        push(&mut fields, "amount", self.amount.map(format_amount));
        if let Some(amounts) = &self.suggested_amounts {
            let values = amounts.iter().copied().map(format_amount).collect();
            fields.push(("suggestedAmounts", QueryValue::List(values)));
        }
        push(&mut fields, "min_value", self.minimum_amount.map(format_amount));
        push(&mut fields, "frequency", self.frequency.map(|f| f.as_str().to_string()));
        push(&mut fields, "email", self.email.clone());
        push(&mut fields, "first_name", self.first_name.clone());
        push(&mut fields, "last_name", self.last_name.clone());
        push(&mut fields, "description", self.description.clone());
        push(&mut fields, "no_exit", self.no_exit.map(|b| b.to_string()));
        push(&mut fields, "success_url", self.success_url.clone());
        push(&mut fields, "exit_url", self.exit_url.clone());
        push(&mut fields, "partner_donation_id", self.partner_donation_id.clone());
        push(&mut fields, "partner_metadata", self.partner_metadata.clone());
        push(&mut fields, "require_share_info", self.require_share_info.map(|b| b.to_string()));
        push(&mut fields, "share_info", self.share_info.map(|b| b.to_string()));
        push(&mut fields, "designation", self.designation.clone());
        push(&mut fields, "webhook_token", self.webhook_token.clone());
        push(&mut fields, "theme_color", self.theme_color.clone());
        push(&mut fields, "method", self.method.map(|m| m.as_str().to_string()));

        fields
    }
}

fn push(fields: &mut Vec<(&'static str, QueryValue)>, key: &'static str, value: Option<String>) {
    if let Some(value) = value {
        fields.push((key, QueryValue::Scalar(value)));
    }
}

/// Shortest decimal rendering: `25`, `12.5`.
fn format_amount(amount: f64) -> String {
    amount.to_string()
}

/// Result of building a donation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonateResult {
    pub donation_url: String,
}
