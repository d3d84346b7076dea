//! Cause allow-list
//!
//! The remote service only accepts a closed set of cause tokens, see
//! [`CAUSES_DOCS_URL`](crate::constants::CAUSES_DOCS_URL). Membership is a
//! case-insensitive exact match.

/// Cause tokens accepted by the browse and search endpoints.
pub const ALLOWED_CAUSES: [&str; 66] = [
    "aapi-led",
    "adoption",
    "afghanistan",
    "animals",
    "art",
    "athletics",
    "autism",
    "black-led",
    "buddhism",
    "cancer",
    "cats",
    "christianity",
    "climate",
    "conservation",
    "coronavirus",
    "culture",
    "dance",
    "disabilities",
    "disease",
    "dogs",
    "education",
    "environment",
    "filmandtv",
    "food-security",
    "freepress",
    "gender-equality",
    "health",
    "hinduism",
    "housing",
    "humans",
    "hurricane-ian",
    "immigrants",
    "indigenous-led",
    "indigenous-peoples",
    "islam",
    "judaism",
    "justice",
    "latine-led",
    "legal",
    "lgbt",
    "libraries",
    "mental-health",
    "museums",
    "music",
    "oceans",
    "parks",
    "poverty",
    "racial-justice",
    "radio",
    "refugees",
    "religion",
    "research",
    "science",
    "seniors",
    "space",
    "theater",
    "transgender",
    "ukraine",
    "veterans",
    "votingrights",
    "water",
    "wildfires",
    "wildlife",
    "women-led",
    "womens-health",
    "youth",
];

/// Whether a single token is an allowed cause.
pub fn is_allowed_cause(cause: &str) -> bool {
    ALLOWED_CAUSES.iter().any(|allowed| allowed.eq_ignore_ascii_case(cause))
}

/// Whether a comma-delimited list contains only allowed causes.
///
/// Empty segments are dropped; an empty list is not allowed.
pub fn is_allowed_causes(causes: &str) -> bool {
    let segments: Vec<&str> = cause_segments(causes).collect();
    is_allowed_causes_slice(&segments)
}

/// Slice form of [`is_allowed_causes`]; an empty slice is not allowed.
pub fn is_allowed_causes_slice(causes: &[&str]) -> bool {
    !causes.is_empty() && causes.iter().all(|cause| is_allowed_cause(cause))
}

/// Non-empty segments of a comma-delimited cause list.
pub fn cause_segments(causes: &str) -> impl Iterator<Item = &str> {
    causes.split(',').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_cause_is_allowed_in_any_case() {
        for cause in ALLOWED_CAUSES {
            assert!(is_allowed_cause(cause), "{cause}");
            assert!(is_allowed_cause(&cause.to_uppercase()), "{cause}");
            assert!(is_allowed_causes(cause), "{cause}");
        }
    }

    #[test]
    fn unknown_causes_are_rejected() {
        for cause in ["not-valid", "animal-welfare", "dog", "dogs ", " dogs", "an imals"] {
            assert!(!is_allowed_cause(cause), "{cause}");
            assert!(!is_allowed_causes(cause), "{cause}");
        }
    }

    #[test]
    fn comma_lists_require_every_segment() {
        assert!(is_allowed_causes("dogs,cats"));
        assert!(is_allowed_causes("Dogs,CATS,climate"));
        assert!(is_allowed_causes("dogs,,cats,"));
        assert!(!is_allowed_causes("dogs,not-valid"));
        assert!(!is_allowed_causes("not-valid,dogs"));
    }

    #[test]
    fn empty_lists_are_rejected() {
        assert!(!is_allowed_causes(""));
        assert!(!is_allowed_causes(","));
        assert!(!is_allowed_causes(",,,"));
        assert!(!is_allowed_causes_slice(&[]));
    }

    #[test]
    fn slice_form_matches_string_form() {
        assert!(is_allowed_causes_slice(&["animals", "Oceans"]));
        assert!(!is_allowed_causes_slice(&["animals", "sports"]));
    }
}
