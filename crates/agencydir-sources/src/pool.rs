//! Bounded-concurrency processing of candidate batches.

use std::future::Future;

use agencydir_core::CandidateRaw;
use futures::stream::{self, StreamExt};

use crate::adapters::SourceAdapter;

/// Run `f` over `items` with at most `concurrency` futures in flight.
///
/// Results come back in input order. A `concurrency` of 0 is treated as 1,
/// which processes items strictly one after another.
pub async fn map_bounded<T, R, F, Fut>(items: Vec<T>, concurrency: usize, f: F) -> Vec<R>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(f)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Enrich every candidate through `adapter.fetch_details`, preserving order.
pub async fn fetch_details_bounded(
    adapter: &dyn SourceAdapter,
    candidates: Vec<CandidateRaw>,
    concurrency: usize,
) -> Vec<CandidateRaw> {
    map_bounded(candidates, concurrency, |candidate| {
        adapter.fetch_details(candidate)
    })
    .await
}
