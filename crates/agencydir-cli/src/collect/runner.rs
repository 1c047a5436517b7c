//! Discovery loop and per-candidate classification for a collection run.

use std::sync::Arc;

use agencydir_core::{CandidateRaw, NormalizedPartner, SearchQuery, VerificationMode};
use agencydir_listings::{DedupLedger, DedupOutcome};
use agencydir_sources::{fetch_details_bounded, SourceAdapter};
use agencydir_verify::normalize_candidate;

#[derive(Debug, Clone, Copy)]
pub(crate) struct DiscoveryLimits {
    pub max_results: usize,
    pub limit_per_source: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ClassifySettings {
    pub min_score: u32,
    pub mode: VerificationMode,
    pub require_email: bool,
}

/// Normalized partners of one run, in discovery order.
#[derive(Debug, Default)]
pub(crate) struct ClassifiedRun {
    pub partners: Vec<NormalizedPartner>,
    /// Partners rejected by the dedup ledger.
    pub duplicates: usize,
    /// Partners rejected by validation alone.
    pub validation_rejections: usize,
}

/// Discover and enrich candidates source by source, query by query.
///
/// Each call is budgeted so neither `max_results` overall nor
/// `limit_per_source` per source is exceeded. Discovery errors are logged
/// and count as an empty result. Every candidate is tagged with the query
/// that produced it.
pub(crate) async fn discover_candidates(
    adapters: &[Arc<dyn SourceAdapter>],
    queries: &[SearchQuery],
    limits: DiscoveryLimits,
    concurrency: usize,
) -> Vec<CandidateRaw> {
    let mut discovered: Vec<CandidateRaw> = Vec::new();

    for adapter in adapters {
        let mut source_count = 0usize;

        for query in queries {
            if discovered.len() >= limits.max_results {
                break;
            }
            let remaining = limits
                .limit_per_source
                .min(limits.max_results - discovered.len());
            let budget = remaining.min(limits.limit_per_source.saturating_sub(source_count));
            if budget == 0 {
                break;
            }

            let mut found = match adapter.discover(query, budget).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(
                        source = adapter.key(),
                        query = %query.query,
                        error = %e,
                        "discovery failed, continuing"
                    );
                    Vec::new()
                }
            };
            found.truncate(budget);

            let detailed = fetch_details_bounded(adapter.as_ref(), found, concurrency).await;
            tracing::debug!(
                source = adapter.key(),
                query = %query.query,
                count = detailed.len(),
                "candidates discovered"
            );
            source_count += detailed.len();
            discovered.extend(detailed.into_iter().map(|candidate| CandidateRaw {
                query: Some(query.clone()),
                ..candidate
            }));
        }
    }

    discovered
}

/// Normalize every candidate against its query and admit it through `ledger`.
pub(crate) fn classify_candidates(
    candidates: &[CandidateRaw],
    settings: &ClassifySettings,
    ledger: &mut DedupLedger,
) -> ClassifiedRun {
    let fallback_query = SearchQuery::default();
    let mut run = ClassifiedRun::default();

    for candidate in candidates {
        let query = candidate.query.as_ref().unwrap_or(&fallback_query);
        let mut partner = normalize_candidate(
            candidate,
            query,
            settings.min_score,
            settings.mode,
            settings.require_email,
        );
        match ledger.admit(&mut partner) {
            DedupOutcome::Duplicate => run.duplicates += 1,
            DedupOutcome::Rejected => run.validation_rejections += 1,
            DedupOutcome::Admitted { .. } => {}
        }
        run.partners.push(partner);
    }

    run
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use agencydir_core::{PartnerStatus, VerificationSignals, WebsiteStatus};
    use agencydir_listings::ExistingPartnerSnapshot;
    use agencydir_sources::SourceError;
    use async_trait::async_trait;

    use super::*;

    /// Returns `per_query` numbered candidates per call, or fails for one query.
    struct FakeSource {
        per_query: usize,
        fail_query: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(per_query: usize) -> Self {
            Self {
                per_query,
                fail_query: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SourceAdapter for FakeSource {
        fn key(&self) -> &'static str {
            "fake"
        }

        fn display_name(&self) -> &'static str {
            "Fake"
        }

        async fn discover(
            &self,
            query: &SearchQuery,
            max_results: usize,
        ) -> Result<Vec<CandidateRaw>, SourceError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_query == Some(query.query.as_str()) {
                return Err(SourceError::InvalidUrl {
                    url: "fake://".to_string(),
                    reason: "boom".to_string(),
                });
            }
            Ok((0..self.per_query.min(max_results))
                .map(|i| CandidateRaw {
                    source: "fake".to_string(),
                    discovered_name: format!("Zapier Studio {call}-{i}"),
                    discovered_website: format!("https://studio-{call}-{i}.io"),
                    ..CandidateRaw::default()
                })
                .collect())
        }

        async fn fetch_details(&self, candidate: CandidateRaw) -> CandidateRaw {
            CandidateRaw {
                email: Some("hello@studio.io".to_string()),
                verification_signals: Some(VerificationSignals {
                    website_ok: true,
                    website_status: WebsiteStatus::Ok,
                    contact_signal: true,
                    ..VerificationSignals::default()
                }),
                ..candidate
            }
        }
    }

    fn queries(n: usize) -> Vec<SearchQuery> {
        (0..n).map(|i| SearchQuery::new(format!("zapier agency {i}"))).collect()
    }

    #[tokio::test]
    async fn budget_stops_at_max_results() {
        let source: Arc<dyn SourceAdapter> = Arc::new(FakeSource::new(4));
        let limits = DiscoveryLimits {
            max_results: 6,
            limit_per_source: 100,
        };

        let found = discover_candidates(&[source], &queries(3), limits, 2).await;

        assert_eq!(found.len(), 6);
        assert_eq!(found[5].query.as_ref().unwrap().query, "zapier agency 1");
    }

    #[tokio::test]
    async fn budget_respects_limit_per_source() {
        let first: Arc<dyn SourceAdapter> = Arc::new(FakeSource::new(4));
        let second: Arc<dyn SourceAdapter> = Arc::new(FakeSource::new(4));
        let limits = DiscoveryLimits {
            max_results: 100,
            limit_per_source: 5,
        };

        let found = discover_candidates(&[first, second], &queries(3), limits, 1).await;

        assert_eq!(found.len(), 10);
    }

    #[tokio::test]
    async fn discovery_errors_count_as_empty() {
        let source = Arc::new(FakeSource {
            fail_query: Some("zapier agency 0"),
            ..FakeSource::new(2)
        });
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![source.clone() as Arc<dyn SourceAdapter>];
        let limits = DiscoveryLimits {
            max_results: 100,
            limit_per_source: 100,
        };

        let found = discover_candidates(&adapters, &queries(2), limits, 1).await;

        assert_eq!(found.len(), 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(found.iter().all(|c| c.email.is_some()));
    }

    fn settings() -> ClassifySettings {
        ClassifySettings {
            min_score: 45,
            mode: VerificationMode::Strict,
            require_email: true,
        }
    }

    fn candidate(name: &str, website: &str) -> CandidateRaw {
        CandidateRaw {
            source: "fake".to_string(),
            discovered_name: name.to_string(),
            discovered_website: website.to_string(),
            email: Some("ops@flow.io".to_string()),
            platforms: vec!["zapier".to_string()],
            verification_signals: Some(VerificationSignals {
                website_ok: true,
                website_status: WebsiteStatus::Ok,
                contact_signal: true,
                ..VerificationSignals::default()
            }),
            query: Some(SearchQuery::new("zapier agency")),
            ..CandidateRaw::default()
        }
    }

    #[test]
    fn classification_counts_duplicates_and_validation_rejections() {
        let mut snapshot = ExistingPartnerSnapshot::default();
        snapshot.websites.insert("listed.io".to_string());
        snapshot.max_id = 20;
        let mut ledger = DedupLedger::new(snapshot);

        let candidates = vec![
            candidate("Flow Automation", "https://flow.io"),
            candidate("Listed Agency", "https://www.listed.io"),
            candidate("Flow Automation Copy", "https://flow.io/about"),
            candidate("", "https://nameless.io"),
        ];

        let run = classify_candidates(&candidates, &settings(), &mut ledger);

        let statuses: Vec<PartnerStatus> = run.partners.iter().map(|p| p.status).collect();
        assert_eq!(
            statuses,
            vec![
                PartnerStatus::Accepted,
                PartnerStatus::Rejected,
                PartnerStatus::Rejected,
                PartnerStatus::Rejected,
            ]
        );
        assert_eq!(run.partners[0].assigned_id, Some(21));
        assert_eq!(run.duplicates, 2);
        assert_eq!(run.validation_rejections, 1);
        assert_eq!(ledger.next_id(), 22);
    }

    #[test]
    fn candidates_without_query_use_an_empty_query() {
        let mut ledger = DedupLedger::new(ExistingPartnerSnapshot::default());
        let orphan = CandidateRaw {
            query: None,
            ..candidate("Flow Automation", "https://flow.io")
        };

        let run = classify_candidates(&[orphan], &settings(), &mut ledger);

        assert_eq!(run.partners[0].status, PartnerStatus::Accepted);
    }
}
