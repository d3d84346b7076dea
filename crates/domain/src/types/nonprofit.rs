//! Nonprofit lookup envelopes
//!
//! Response schemas owned by the remote service for the browse, details and
//! search endpoints. Every field defaults when absent so partial payloads
//! still deserialize.

use serde::{Deserialize, Serialize};

/// Pagination block returned by the browse endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationInfo {
    pub page: u32,
    pub pages: u32,
    #[serde(rename = "page_size")]
    pub page_size: u32,
    #[serde(rename = "total_results")]
    pub total_results: u32,
}

/// Nonprofit summary in a browse page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NonprofitBrowseDetails {
    pub name: String,
    pub description: String,
    pub ein: String,
    pub logo_url: String,
    pub cover_image_url: String,
    pub logo_cloudinary_id: String,
    pub slug: String,
    pub location: String,
    pub website_url: String,
    pub profile_url: String,
    pub tags: Vec<String>,
}

/// Response of `GET /v0.2/browse/{cause}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseResult {
    pub nonprofits: Vec<NonprofitBrowseDetails>,
    pub pagination: PaginationInfo,
}

/// National Taxonomy of Exempt Entities classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NteeCodeMeaning {
    pub major_code: Option<String>,
    pub major_meaning: Option<String>,
    pub decile_code: Option<String>,
    pub decile_meaning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NonprofitInfo {
    pub id: Option<String>,
    pub name: String,
    pub primary_slug: String,
    pub ein: Option<String>,
    pub is_disbursable: bool,
    pub description: Option<String>,
    pub description_long: Option<String>,
    pub location_address: Option<String>,
    pub ntee_code: Option<String>,
    pub ntee_code_meaning: Option<NteeCodeMeaning>,
    pub logo_cloudinary_id: Option<String>,
    pub cover_image_cloudinary_id: Option<String>,
    pub logo_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub profile_url: Option<String>,
    pub website_url: Option<String>,
}

/// Tag attached to a nonprofit profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NonprofitTag {
    pub id: Option<String>,
    pub tag_name: String,
    pub cause_category: String,
    pub title: String,
    pub tag_image_cloudinary_id: String,
    pub tag_url: String,
    pub tag_image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NonprofitDetailsData {
    pub nonprofit: NonprofitInfo,
    pub nonprofit_tags: Vec<NonprofitTag>,
}

/// Response of `GET /v0.2/nonprofit/{orgId}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailsResult {
    pub data: NonprofitDetailsData,
}

/// Nonprofit hit in a search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NonprofitSearchDetails {
    pub name: String,
    pub profile_url: String,
    pub description: String,
    pub ein: String,
    pub logo_cloudinary_id: String,
    pub logo_url: String,
    pub website_url: String,
    pub matched_terms: Vec<String>,
}

/// Response of `GET /v0.2/search/{keyword}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub nonprofits: Vec<NonprofitSearchDetails>,
}
