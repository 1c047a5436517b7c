//! Candidate discovery for the agency directory pipeline.
//!
//! Search-engine source adapters turn a [`SearchQuery`](agencydir_core::SearchQuery)
//! into raw candidates, and the detail fetcher scrapes each candidate website
//! for verification signals. Every extraction rule is a plain function over
//! HTML text so it can be tested without a network.

pub mod adapters;
pub mod client;
pub mod details;
pub mod error;
pub mod filter;
pub mod html;
pub mod pool;
pub mod rss;
pub mod url;

pub use adapters::{
    BingRssSource, DuckDuckGoSource, SeedSource, SourceAdapter, SourceRegistry,
};
pub use client::{SourceClient, SourceEndpoints};
pub use details::fetch_website_details;
pub use error::SourceError;
pub use filter::{check_directory_candidate, DirectoryCheck};
pub use pool::{fetch_details_bounded, map_bounded};
