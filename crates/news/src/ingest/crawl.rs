//! Bounded crawl over outbound links.

use crate::ingest::add::Ingestor;
use crate::ingest::fetch::{hostname, normalize_url};
use crate::types::{AddOutcome, CrawlReport, UrlOutcome};
use ragnews_core::AppResult;
use std::collections::{HashSet, VecDeque};

/// Turn a per-URL result into an outcome, logging the error if there was one.
///
/// This is what keeps one bad page from aborting a crawl.
pub fn contain(url: &str, result: AppResult<AddOutcome>) -> UrlOutcome {
    match result {
        Ok(outcome) => UrlOutcome::Done(outcome),
        Err(err) => {
            tracing::error!(url, error = %err, "Failed to add url");
            UrlOutcome::Failed {
                url: url.to_string(),
                error: err.to_string(),
            }
        }
    }
}

/// Hosts are related when either contains the other ("cnn.com" and
/// "www.cnn.com", for instance).
fn hosts_related(parent: &str, child: &str) -> bool {
    !parent.is_empty() && !child.is_empty() && (parent.contains(child) || child.contains(parent))
}

fn host_of(url: &str) -> String {
    normalize_url(url)
        .map(|u| hostname(&u))
        .unwrap_or_default()
}

impl Ingestor<'_> {
    /// Add `seed` and follow same-site links up to `recursive_depth` hops.
    ///
    /// The seed honours `allow_dupes`; discovered links never do, so pages
    /// already stored are not fetched again. URLs are processed one at a time
    /// in FIFO order and every failure is contained.
    pub async fn crawl(&self, seed: &str, recursive_depth: u32, allow_dupes: bool) -> CrawlReport {
        let mut report = CrawlReport::default();
        let mut queued: HashSet<String> = HashSet::from([seed.to_string()]);
        let mut worklist = VecDeque::from([(seed.to_string(), recursive_depth, allow_dupes)]);

        while let Some((url, depth, dupes)) = worklist.pop_front() {
            let outcome = contain(&url, self.add_url(&url, dupes).await);
            report.record(&outcome);

            let UrlOutcome::Done(added) = &outcome else {
                continue;
            };
            if depth == 0 {
                continue;
            }

            let parent_host = host_of(&url);
            for link in added.links() {
                if hosts_related(&parent_host, &host_of(link)) && queued.insert(link.clone()) {
                    worklist.push_back((link.clone(), depth - 1, false));
                }
            }
        }

        tracing::info!(
            inserted = report.inserted,
            tombstoned = report.tombstoned,
            skipped = report.skipped,
            failed = report.failed,
            "Crawl finished"
        );
        report
    }
}
