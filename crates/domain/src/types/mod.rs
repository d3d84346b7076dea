//! Request and response models

pub mod donation;
pub mod fundraiser;
pub mod nonprofit;
pub mod webhook;

pub use donation::{
    DonateRequest, DonateResult, DonationEnvironment, Frequency, PaymentMethod, QueryValue,
};
pub use fundraiser::{Fundraiser, FundraiserGoalType, FundraiserRaised, FundraiserRequest};
pub use nonprofit::{
    BrowseResult, DetailsResult, NonprofitBrowseDetails, NonprofitDetailsData, NonprofitInfo,
    NonprofitSearchDetails, NonprofitTag, NteeCodeMeaning, PaginationInfo, SearchResult,
};
pub use webhook::{WebhookNonprofit, WebhookRequest};
