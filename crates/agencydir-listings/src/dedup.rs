//! Run-level dedup against the existing listings and earlier candidates.

use agencydir_core::text::website_domain;
use agencydir_core::{NormalizedPartner, PartnerStatus, RejectionReason};

use crate::snapshot::ExistingPartnerSnapshot;

/// What [`DedupLedger::admit`] did with a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    /// Domain or slug already taken; the partner is now rejected.
    Duplicate,
    /// Unique and not rejected; its slug and domain are now taken.
    Admitted { id: Option<u32> },
    /// Unique but already rejected by validation.
    Rejected,
}

/// Owns the taken domains/slugs and the id counter for one run.
#[derive(Debug, Clone)]
pub struct DedupLedger {
    snapshot: ExistingPartnerSnapshot,
    next_id: u32,
}

impl DedupLedger {
    /// Start from the existing listings; ids continue after `max_id`.
    #[must_use]
    pub fn new(snapshot: ExistingPartnerSnapshot) -> Self {
        let next_id = snapshot.max_id.saturating_add(1);
        Self { snapshot, next_id }
    }

    #[must_use]
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    #[must_use]
    pub fn snapshot(&self) -> &ExistingPartnerSnapshot {
        &self.snapshot
    }

    /// Check `partner` against every domain and slug seen so far.
    ///
    /// A duplicate is forced to `rejected` with the duplicate reason and
    /// leaves the ledger untouched, so re-admitting it is rejected again.
    /// A unique, non-rejected partner takes its slug and domain; accepted
    /// partners also receive the next id.
    pub fn admit(&mut self, partner: &mut NormalizedPartner) -> DedupOutcome {
        let domain = if partner.website.is_empty() {
            String::new()
        } else {
            website_domain(&partner.website)
        };
        let duplicate_domain = !domain.is_empty() && self.snapshot.websites.contains(&domain);
        let duplicate_slug = self.snapshot.slugs.contains(&partner.slug);

        if duplicate_domain || duplicate_slug {
            partner.status = PartnerStatus::Rejected;
            partner.push_reason(RejectionReason::DuplicateDomainOrSlug);
            return DedupOutcome::Duplicate;
        }

        if partner.status == PartnerStatus::Rejected {
            return DedupOutcome::Rejected;
        }

        self.snapshot.slugs.insert(partner.slug.clone());
        if !domain.is_empty() {
            self.snapshot.websites.insert(domain);
        }

        let id = partner.is_accepted().then(|| {
            let id = self.next_id;
            self.next_id = self.next_id.saturating_add(1);
            id
        });
        partner.assigned_id = id;
        DedupOutcome::Admitted { id }
    }
}
