//! Column order shared by every listings-shaped CSV.
//!
//! Row types in [`crate::rows`] emit their fields in exactly this order.

/// Columns of `listings.csv` and the vendor master list.
pub const LISTING_COLUMNS: [&str; 18] = [
    "id",
    "name",
    "platforms",
    "location",
    "country",
    "description",
    "price_min",
    "price_max",
    "rating",
    "review_count",
    "featured",
    "website",
    "email",
    "source",
    "source_ref",
    "verified",
    "verification_method",
    "verified_at",
];

/// Listing columns followed by the verification diagnostics of a staging file.
pub const STAGING_COLUMNS: [&str; 23] = [
    "id",
    "name",
    "platforms",
    "location",
    "country",
    "description",
    "price_min",
    "price_max",
    "rating",
    "review_count",
    "featured",
    "website",
    "email",
    "source",
    "source_ref",
    "verified",
    "verification_method",
    "verified_at",
    "source_website",
    "verification_score",
    "verification_status",
    "validation_notes",
    "contact_signal",
];
