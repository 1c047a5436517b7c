//! Listings CSV files: the typed column schema, reading and writing, the
//! existing-listings snapshot, run-level dedup and the vendor master list.

pub mod csv_io;
pub mod dedup;
pub mod error;
pub mod rows;
pub mod schema;
pub mod snapshot;
pub mod vendor_list;

pub use csv_io::{append_csv_lines, csv_line, escape_csv, read_csv_rows, write_csv, CsvRow};
pub use dedup::{DedupLedger, DedupOutcome};
pub use error::ListingsError;
pub use rows::{sort_for_staging, ListingRow, StagingRow};
pub use schema::{LISTING_COLUMNS, STAGING_COLUMNS};
pub use snapshot::{read_existing_listings, ExistingPartnerSnapshot};
pub use vendor_list::{build_vendor_list, VendorListMode, VendorListOptions, VendorListReport};
