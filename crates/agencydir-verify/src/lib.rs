//! Candidate normalization, scoring and verification-mode classification.
//!
//! [`normalize_candidate`] is pure: the same candidate, query, threshold,
//! mode and e-mail requirement always produce the same partner record.

pub mod email;
pub mod normalize;
pub mod platforms;
pub mod scoring;
pub mod threshold;

pub use email::{email_domain, is_valid_email};
pub use normalize::normalize_candidate;
pub use platforms::{extract_platforms, has_automation_hint, PLATFORM_VOCABULARY};
pub use scoring::{score_partner, ScoringFacts};
pub use threshold::{default_min_score, DEFAULT_MIN_SCORE};
