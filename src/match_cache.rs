use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Local};
use tokio::sync::Mutex;
use tracing::log;

use crate::clock::Clock;
use crate::match_extractor::MatchExtractor;
use crate::models::MatchRecord;

struct CacheEntry {
    data: Arc<Vec<MatchRecord>>,
    fetched_at: DateTime<Local>,
}

pub struct MatchCache {
    extractor: MatchExtractor,
    clock: Arc<dyn Clock>,
    refresh_interval: Duration,
    entry: Mutex<Option<CacheEntry>>,
}
pub type SafeMatchCache = Arc<MatchCache>;

impl MatchCache {
    pub fn new(extractor: MatchExtractor, clock: Arc<dyn Clock>, refresh_interval: Duration) -> SafeMatchCache {
        Arc::new(MatchCache {
            extractor,
            clock,
            refresh_interval,
            entry: Mutex::new(None),
        })
    }

    /// Today's matches, re-extracted when the cached copy is older than the refresh interval.
    /// Never empty: a failed or empty extraction is served as a single sentinel record.
    pub async fn get_matches(&self) -> Arc<Vec<MatchRecord>> {
        // held across the refresh so concurrent callers wait for one fetch
        let mut entry = self.entry.lock().await;
        if let Some(e) = entry.as_ref() {
            if self.clock.now() - e.fetched_at <= self.refresh_interval {
                return e.data.clone();
            }
        }
        self.refresh_locked(&mut entry).await
    }

    /// Re-extracts regardless of the age of the cached copy.
    pub async fn refresh(&self) -> Arc<Vec<MatchRecord>> {
        let mut entry = self.entry.lock().await;
        self.refresh_locked(&mut entry).await
    }

    async fn refresh_locked(&self, entry: &mut Option<CacheEntry>) -> Arc<Vec<MatchRecord>> {
        let before = Instant::now();
        let today = self.clock.now().date_naive();
        let matches = match self.extractor.extract(today).await {
            Ok(matches) if matches.is_empty() => {
                log::info!("[CACHE] No matches found for {today}");
                matches
            },
            Ok(matches) => {
                log::info!("[CACHE] Refreshed {} matches for {today} {:.2?}", matches.len(), before.elapsed());
                matches
            },
            Err(e) => {
                log::error!("[CACHE] Fetch failed, serving no matches: {e}");
                vec![]
            },
        };

        let data = if matches.is_empty() {
            Arc::new(vec![MatchRecord::sentinel()])
        } else {
            Arc::new(matches)
        };
        // stamped even when empty so a broken source is not hammered
        *entry = Some(CacheEntry { data: data.clone(), fetched_at: self.clock.now() });
        data
    }
}
