use anyhow::Result;
use std::fmt;
use tracing::{debug, info, warn};

use crate::dedup::{fingerprint, SeenLog};
use crate::extraction::{parse, AdExtractor};
use crate::models::{Characteristics, RawAd};
use crate::notify::{passes, NotificationPayload, NotificationSink};

/// Outcome counters for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub scanned: u32,
    pub duplicates: u32,
    pub extraction_failures: u32,
    pub unparsable: u32,
    pub rejected: u32,
    pub notified: u32,
    pub delivery_failures: u32,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ads scanned:         {}", self.scanned)?;
        writeln!(f, "Already seen:        {}", self.duplicates)?;
        writeln!(f, "Extraction failures: {}", self.extraction_failures)?;
        writeln!(f, "Unparsable replies:  {}", self.unparsable)?;
        writeln!(f, "Filtered out:        {}", self.rejected)?;
        writeln!(f, "Notified:            {}", self.notified)?;
        write!(f, "Delivery failures:   {}", self.delivery_failures)
    }
}

/// Carries each raw ad through dedup-check, extraction, parsing, merging,
/// filtering and notification, strictly one ad at a time.
///
/// Per-ad failures are logged and counted, never fatal; only seen-log I/O
/// errors abort the run, since continuing without a durable dedup record
/// could notify the same listing twice.
pub struct Pipeline<E, S> {
    seen: SeenLog,
    extractor: E,
    sink: S,
}

impl<E: AdExtractor, S: NotificationSink> Pipeline<E, S> {
    pub fn new(seen: SeenLog, extractor: E, sink: S) -> Self {
        Self {
            seen,
            extractor,
            sink,
        }
    }

    pub async fn run(&mut self, ads: &[RawAd]) -> Result<RunStats> {
        let mut stats = RunStats::default();
        for ad in ads {
            stats.scanned += 1;
            self.process(ad, &mut stats).await?;
        }
        Ok(stats)
    }

    async fn process(&mut self, ad: &RawAd, stats: &mut RunStats) -> Result<()> {
        let digest = fingerprint(&ad.text);
        if self.seen.contains(&digest) {
            debug!(title = %ad.title, "Already processed, skipping");
            stats.duplicates += 1;
            return Ok(());
        }
        // Record before calling out: a crash after this point drops the
        // listing instead of double-notifying it on the next run.
        self.seen.record(&digest)?;

        let reply = match self.extractor.extract(&ad.title, &ad.text).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(title = %ad.title, error = %err, "Extraction call failed, skipping ad");
                stats.extraction_failures += 1;
                return Ok(());
            }
        };

        let delta = match parse(&reply) {
            Ok(delta) => delta,
            Err(err) => {
                warn!(title = %ad.title, error = %err, "Unusable extraction reply, skipping ad");
                stats.unparsable += 1;
                return Ok(());
            }
        };

        let carac = Characteristics::from_delta(delta);
        if !passes(&carac) {
            debug!(title = %ad.title, bedrooms = carac.bedrooms_to_rent, "Filtered out");
            stats.rejected += 1;
            return Ok(());
        }

        let payload = NotificationPayload::build(ad, &carac);
        match self.sink.send(&payload).await {
            Ok(()) => {
                info!(title = %ad.title, "Notification sent");
                stats.notified += 1;
            }
            Err(err) => {
                warn!(title = %ad.title, error = %err, "Notification lost");
                stats.delivery_failures += 1;
            }
        }
        Ok(())
    }
}
