//! Shared types and configuration for the agency directory pipeline.
//!
//! Everything that crosses a crate boundary lives here: search queries,
//! raw candidates and their verification signals, the normalized partner
//! record, text/website helpers, and environment configuration.

pub mod app_config;
pub mod candidate;
pub mod config;
pub mod error;
pub mod partner;
pub mod query;
pub mod signals;
pub mod text;

pub use app_config::AppConfig;
pub use candidate::{CandidateRaw, DiscoveryFlags};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use partner::{
    NormalizedPartner, PartnerStatus, RejectionReason, VerificationMode, PARTNER_SOURCE,
    PARTNER_VERIFICATION_METHOD,
};
pub use query::{load_queries, normalize_platform_tokens, SearchQuery};
pub use signals::{VerificationSignals, WebsiteStatus};
