//! Hosted donation link builder
//!
//! Pure and synchronous: turns a [`DonateRequest`] into the every.org
//! donate-flow URL without touching the network. Absent fields are omitted
//! entirely; they never appear as empty query parameters.

use everyorg_domain::constants::{DONATION_PRODUCTION_URL, DONATION_SANDBOX_URL};
use everyorg_domain::{DonateRequest, DonationEnvironment, EveryOrgError, QueryValue, Result};
use urlencoding::encode;

/// Build the donation URL for `request`.
///
/// # Errors
/// Returns `EveryOrgError::Validation` if the organization id is blank or an
/// amount is not a finite number.
pub fn build_donation_url(request: &DonateRequest) -> Result<String> {
    let organization_id = request.organization_id.trim();
    if organization_id.is_empty() {
        return Err(EveryOrgError::validation(
            "organization_id",
            "Organization ID must be specified.",
        ));
    }

    let amounts = request
        .amount
        .iter()
        .chain(request.minimum_amount.iter())
        .chain(request.suggested_amounts.iter().flatten());
    for amount in amounts {
        if !amount.is_finite() {
            return Err(EveryOrgError::validation("amount", "Amounts must be finite numbers."));
        }
    }

    let template = match request.environment {
        DonationEnvironment::Production => DONATION_PRODUCTION_URL,
        DonationEnvironment::Sandbox => DONATION_SANDBOX_URL,
    };

    let target = format!("{}?{}", encode(organization_id), encode_query(&request.query_fields()));
    Ok(template.replacen("{}", &target, 1))
}

/// Percent-encode `(key, value)` pairs and join them with `&`.
///
/// List values have each element encoded and are joined with a literal comma.
pub fn encode_query(fields: &[(&str, QueryValue)]) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            let value = match value {
                QueryValue::Scalar(value) => encode(value).into_owned(),
                QueryValue::List(items) => {
                    items.iter().map(|item| encode(item).into_owned()).collect::<Vec<_>>().join(",")
                }
            };
            format!("{}={}", encode(key), value)
        })
        .collect::<Vec<_>>()
        .join("&")
}
