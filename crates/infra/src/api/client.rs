//! every.org partner API client
//!
//! Every operation validates its inputs before touching the network, issues
//! the call through the pooled public or private client and maps the outcome
//! to a typed result or an [`ApiClientError`]. All operations race the
//! caller's [`CancellationToken`]; cancellation surfaces as
//! [`EveryOrgError::Cancelled`] and is never retried.

use std::sync::Arc;

use everyorg_domain::causes::cause_segments;
use everyorg_domain::constants::{
    API_VERSION, CAUSES_DOCS_URL, MAX_PAGE_SIZE, MIN_PAGE, MIN_PAGE_SIZE,
};
use everyorg_domain::{
    is_allowed_causes, ApiClientError, ApiErrorKind, BrowseResult, DetailsResult, DonateRequest,
    DonateResult, EveryOrgError, Fundraiser, FundraiserRaised, FundraiserRequest, Result,
    SearchResult, Settings,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use urlencoding::encode;

use super::pool::{ClientOptions, ClientPool};
use crate::donation::build_donation_url;
use crate::http::HttpClient;

/// Client for the every.org partner API.
#[derive(Debug, Clone)]
pub struct EveryOrgClient {
    settings: Arc<Settings>,
    pool: ClientPool,
}

/// One outbound call, ready to send.
struct ApiCall {
    method: Method,
    /// Relative path and query, without a leading `/`.
    path: String,
    body: Option<Vec<u8>>,
    /// Message used when the service answers 404.
    not_found: String,
}

impl ApiCall {
    fn get(path: String) -> Self {
        let not_found = format!("The API {} was not found.", display_path(&path));
        Self { method: Method::GET, path, body: None, not_found }
    }

    fn post(path: String, body: Vec<u8>) -> Self {
        Self { method: Method::POST, body: Some(body), ..Self::get(path) }
    }

    fn not_found(mut self, message: String) -> Self {
        self.not_found = message;
        self
    }
}

impl EveryOrgClient {
    /// Create a client against the production service with default options.
    ///
    /// # Errors
    /// Returns `EveryOrgError::Config` if the HTTP clients cannot be built.
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_options(settings, ClientOptions::default())
    }

    pub fn with_options(settings: Settings, options: ClientOptions) -> Result<Self> {
        let pool = ClientPool::new(&settings, &options)?;
        Ok(Self { settings: Arc::new(settings), pool })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pool(&self) -> &ClientPool {
        &self.pool
    }

    /// Browse nonprofits by cause (or comma-separated causes).
    ///
    /// # Errors
    /// - `Validation` if the cause is blank or not in the allow-list, if
    ///   `page` < 1, or if `page_size` is outside `1..=50`.
    /// - `Api` on any non-success outcome.
    #[instrument(skip(self, cancel))]
    pub async fn browse_by_cause(
        &self,
        cause: &str,
        page: u32,
        page_size: u32,
        cancel: &CancellationToken,
    ) -> Result<BrowseResult> {
        if cause.trim().is_empty() {
            return Err(EveryOrgError::validation("cause", "Cause must be specified."));
        }
        if !is_allowed_causes(cause) {
            return Err(EveryOrgError::validation(
                "cause",
                format!(
                    "The cause specified is not in the allowed list of causes. See {CAUSES_DOCS_URL}"
                ),
            ));
        }
        if page_size < MIN_PAGE_SIZE {
            return Err(EveryOrgError::validation(
                "page_size",
                "Page size must be greater than or equal to 1.",
            ));
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(EveryOrgError::validation(
                "page_size",
                "Page size must be less than or equal to 50.",
            ));
        }
        if page < MIN_PAGE {
            return Err(EveryOrgError::validation("page", "Page must be greater than or equal to 1."));
        }

        let path = format!(
            "{API_VERSION}/browse/{}?take={page_size}&page={page}&apiKey={}",
            encode_causes(cause),
            self.api_key()
        );

        self.execute(self.pool.public(), ApiCall::get(path), cancel).await
    }

    /// Fetch the details of a nonprofit by slug or id.
    ///
    /// # Errors
    /// - `Validation` if `org_id` is blank.
    /// - `Api` with [`ApiErrorKind::NotFound`] if the nonprofit does not exist.
    #[instrument(skip(self, cancel))]
    pub async fn get_details(&self, org_id: &str, cancel: &CancellationToken) -> Result<DetailsResult> {
        let org_id = require("org_id", org_id, "Organization ID must be specified.")?;

        let path = format!("{API_VERSION}/nonprofit/{}?apiKey={}", encode(org_id), self.api_key());
        let call = ApiCall::get(path)
            .not_found(format!("The nonprofit with the id {org_id} was not found."));

        self.execute(self.pool.public(), call, cancel).await
    }

    /// Search nonprofits by keyword, causes, or both.
    ///
    /// A blank `keyword` or `causes` counts as absent. When only causes are
    /// given the keyword path segment is left empty.
    ///
    /// # Errors
    /// - `Validation` if both are blank, if `result_size` is outside
    ///   `1..=50`, or if any cause is not in the allow-list.
    #[instrument(skip(self, cancel))]
    pub async fn search(
        &self,
        keyword: &str,
        causes: &str,
        result_size: u32,
        cancel: &CancellationToken,
    ) -> Result<SearchResult> {
        let keyword = keyword.trim();
        let causes = causes.trim();

        if keyword.is_empty() && causes.is_empty() {
            return Err(EveryOrgError::validation(
                "keyword",
                "Either keyword or causes must be specified.",
            ));
        }
        reject_dot_segment("keyword", keyword)?;
        if result_size < MIN_PAGE_SIZE {
            return Err(EveryOrgError::validation(
                "result_size",
                "Result size must be greater than or equal to 1.",
            ));
        }
        if result_size > MAX_PAGE_SIZE {
            return Err(EveryOrgError::validation(
                "result_size",
                "Result size must be less than or equal to 50.",
            ));
        }
        if !causes.is_empty() && !is_allowed_causes(causes) {
            return Err(EveryOrgError::validation(
                "causes",
                format!(
                    "One or more causes specified are not in the allowed list of causes. See {CAUSES_DOCS_URL}"
                ),
            ));
        }

        let mut path = format!("{API_VERSION}/search/{}?take={result_size}", encode(keyword));
        if !causes.is_empty() {
            path.push_str("&causes=");
            path.push_str(&encode_causes(causes));
        }
        path.push_str("&apiKey=");
        path.push_str(&self.api_key());

        self.execute(self.pool.public(), ApiCall::get(path), cancel).await
    }

    /// Fetch a fundraiser.
    #[instrument(skip(self, cancel))]
    pub async fn get_fundraiser(
        &self,
        org_id: &str,
        fundraiser_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Fundraiser> {
        let (org_id, fundraiser_id) = require_fundraiser_ids(org_id, fundraiser_id)?;

        let path =
            format!("{API_VERSION}/fundraiser/{}/{}", encode(org_id), encode(fundraiser_id));

        self.execute(self.pool.public(), ApiCall::get(path), cancel).await
    }

    /// Fetch the amount raised so far by a fundraiser.
    #[instrument(skip(self, cancel))]
    pub async fn get_fundraiser_raised(
        &self,
        org_id: &str,
        fundraiser_id: &str,
        cancel: &CancellationToken,
    ) -> Result<FundraiserRaised> {
        let (org_id, fundraiser_id) = require_fundraiser_ids(org_id, fundraiser_id)?;

        let path = format!(
            "{API_VERSION}/fundraiser/{}/{}/raised",
            encode(org_id),
            encode(fundraiser_id)
        );

        self.execute(self.pool.public(), ApiCall::get(path), cancel).await
    }

    /// Create a fundraiser through the authenticated client.
    ///
    /// # Errors
    /// - `Config` if the settings carry no private key. No request is sent.
    /// - `Api` on any non-success outcome.
    #[instrument(skip(self, request, cancel), fields(nonprofit_id = %request.nonprofit_id))]
    pub async fn create_fundraiser(
        &self,
        request: &FundraiserRequest,
        cancel: &CancellationToken,
    ) -> Result<Fundraiser> {
        let client = self.pool.private()?;

        let body = serde_json::to_vec(request).map_err(|err| {
            EveryOrgError::validation("request", format!("Failed to serialize request: {err}"))
        })?;

        let path = format!("{API_VERSION}/fundraiser");
        self.execute(client, ApiCall::post(path, body), cancel).await
    }

    /// Build a hosted donation link. No network call is made.
    pub fn create_donation(&self, request: &DonateRequest) -> Result<DonateResult> {
        build_donation_url(request).map(|donation_url| DonateResult { donation_url })
    }

    fn api_key(&self) -> String {
        encode(self.settings.public_key()).into_owned()
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        client: &HttpClient,
        call: ApiCall,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let ApiCall { method, path, body, not_found } = call;
        let url = client.endpoint(&path)?;
        let route = display_path(&path);

        let exchange = {
            let route = route.clone();
            async move {
                let response = client.send(method.clone(), url, body).await.map_err(|err| {
                    warn!(route = %route, error = %err, "request failed without a response");
                    let message =
                        format!("A general error occurred while making the request {route}.");
                    ApiClientError::new(err.kind(), message).with_source(err)
                })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(map_status_error(status, &route, not_found, response.text()));
                }

                let result = serde_json::from_slice::<T>(response.body()).map_err(|err| {
                    ApiClientError::new(
                        ApiErrorKind::Decode,
                        format!("Failed to parse response from {route}."),
                    )
                    .with_status(status.as_u16())
                    .with_source(err)
                })?;

                info!(%method, route = %route, %status, "request successful");
                Ok::<T, ApiClientError>(result)
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(route = %route, "request cancelled");
                Err(EveryOrgError::Cancelled)
            }
            result = exchange => result.map_err(EveryOrgError::from),
        }
    }
}

fn map_status_error(status: StatusCode, route: &str, not_found: String, body: String) -> ApiClientError {
    let message = if status == StatusCode::NOT_FOUND {
        not_found
    } else {
        format!(
            "Error HTTP occurred while making the request {route}. Status: {}",
            status.as_u16()
        )
    };

    let error = ApiClientError::from_status(status.as_u16(), message);
    if body.is_empty() {
        error
    } else {
        error.with_source(body)
    }
}

/// Path without the query, prefixed with `/`. Never contains the API key.
fn display_path(path: &str) -> String {
    let route = path.split('?').next().unwrap_or(path);
    format!("/{}", route.trim_start_matches('/'))
}

/// Encode each non-empty cause and join them with a literal comma.
fn encode_causes(causes: &str) -> String {
    cause_segments(causes).map(|cause| encode(cause).into_owned()).collect::<Vec<_>>().join(",")
}

fn require<'a>(field: &'static str, value: &'a str, message: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EveryOrgError::validation(field, message));
    }
    reject_dot_segment(field, value)?;
    Ok(value)
}

/// `.` and `..` survive percent-encoding and are collapsed when the path is
/// resolved, which would address a different endpoint.
fn reject_dot_segment(field: &'static str, value: &str) -> Result<()> {
    if value == "." || value == ".." {
        return Err(EveryOrgError::validation(
            field,
            format!("'{value}' is not a valid path segment."),
        ));
    }
    Ok(())
}

fn require_fundraiser_ids<'a>(org_id: &'a str, fundraiser_id: &'a str) -> Result<(&'a str, &'a str)> {
    let org_id = require("org_id", org_id, "Organization ID must be specified.")?;
    let fundraiser_id = require("fundraiser_id", fundraiser_id, "Fundraiser ID must be specified.")?;
    Ok((org_id, fundraiser_id))
}
