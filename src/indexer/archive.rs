use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cache::SegmentCache;
use crate::config::Config;
use crate::indexer::discovery::{SegmentFile, discover_segment_files};
use crate::models::SegmentDescriptor;
use crate::parsers::{ContainerProbe, DurationProbe};
use crate::timestamps::{CaptureTime, derive_timestamp};

/// How long a computed descriptor stays cached (12 hours)
pub const DEFAULT_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Per-file evaluation time above which a warning is logged
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_secs(10);

/// Ordering of query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentOrder {
    /// Archive walk order: directories and files by name
    #[default]
    Walk,
    /// Ascending capture time, ties kept in walk order
    CaptureTime,
}

/// Answers "which segments were captured within (begin, end)?" over an archive root
///
/// Descriptors are memoized in a shared [`SegmentCache`], so several indexers (or several
/// concurrent queries on one indexer) can reuse each other's work.
pub struct ArchiveIndexer {
    cache: Arc<SegmentCache>,
    probe: Arc<dyn DurationProbe>,
    zone: FixedOffset,
    ttl: Duration,
    slow_threshold: Duration,
    order: SegmentOrder,
}

impl ArchiveIndexer {
    pub fn new(cache: Arc<SegmentCache>, zone: FixedOffset) -> Self {
        Self {
            cache,
            probe: Arc::new(ContainerProbe),
            zone,
            ttl: DEFAULT_TTL,
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
            order: SegmentOrder::Walk,
        }
    }

    pub fn from_config(config: &Config, cache: Arc<SegmentCache>) -> Result<Self> {
        let order =
            if config.sort_by_capture_time { SegmentOrder::CaptureTime } else { SegmentOrder::Walk };

        Ok(Self::new(cache, config.zone()?)
            .with_ttl(config.cache_ttl())
            .with_slow_threshold(config.slow_file_threshold())
            .with_order(order))
    }

    pub fn with_probe(mut self, probe: Arc<dyn DurationProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    pub fn with_order(mut self, order: SegmentOrder) -> Self {
        self.order = order;
        self
    }

    pub fn zone(&self) -> &FixedOffset {
        &self.zone
    }

    pub fn cache(&self) -> &Arc<SegmentCache> {
        &self.cache
    }

    /// List segments under `root` whose capture time lies strictly between `begin` and `end`
    ///
    /// The whole archive is walked before any file is evaluated; file evaluation then
    /// runs in parallel while keeping walk order in the result.
    ///
    /// # Errors
    ///
    /// Returns an error only if the archive walk fails. Unreadable files are excluded and
    /// files with unreadable durations are reported with a duration of 0.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::num::NonZeroUsize;
    /// use std::path::Path;
    /// use std::sync::Arc;
    ///
    /// use chrono::FixedOffset;
    /// use rec_archive::cache::SegmentCache;
    /// use rec_archive::indexer::ArchiveIndexer;
    /// use rec_archive::timestamps::parse_query_time;
    ///
    /// let zone = FixedOffset::east_opt(8 * 3600).unwrap();
    /// let cache = Arc::new(SegmentCache::new(NonZeroUsize::new(100).unwrap()));
    /// let indexer = ArchiveIndexer::new(cache, zone);
    ///
    /// let begin = parse_query_time("2021-09-24 00:00:00", &zone)?;
    /// let end = parse_query_time("2021-09-25 00:00:00", &zone)?;
    /// let segments = indexer.query(Path::new("live"), begin, end)?;
    /// println!("Found {} segments", segments.len());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn query(
        &self,
        root: &Path,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SegmentDescriptor>> {
        let files = discover_segment_files(root)?;

        let mut segments: Vec<SegmentDescriptor> = files
            .par_iter()
            .map(|file| self.evaluate_timed(file, begin, end))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        if self.order == SegmentOrder::CaptureTime {
            segments.sort_by_key(|segment| segment.capture_time);
        }

        info!(
            "Indexed {} segments under {} ({} candidate files)",
            segments.len(),
            root.display(),
            files.len()
        );

        Ok(segments)
    }

    fn evaluate_timed(
        &self,
        file: &SegmentFile,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<SegmentDescriptor> {
        let started = Instant::now();
        let segment = self.evaluate(file, begin, end);

        let spent = started.elapsed();
        if spent > self.slow_threshold {
            warn!(
                "Slow segment evaluation: {} took {:.1}s",
                file.relative_path,
                spent.as_secs_f64()
            );
        }

        segment
    }

    fn evaluate(
        &self,
        file: &SegmentFile,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<SegmentDescriptor> {
        let capture_time = match derive_timestamp(&file.relative_path, file.kind, &self.zone) {
            CaptureTime::Parsed(ts) => ts,
            CaptureTime::Unparseable => {
                debug!(
                    "Skipping {}: file name does not encode a capture time",
                    file.relative_path
                );
                return None;
            }
        };

        if !(begin < capture_time && capture_time < end) {
            return None;
        }

        // Two files can resolve to the same instant; a hit only counts for the same file
        if let Some(cached) = self.cache.get(&capture_time) {
            if cached.relative_path == file.relative_path {
                return Some(cached);
            }
            debug!(
                "Capture time of {} collides with cached {}",
                file.relative_path, cached.relative_path
            );
        }

        let descriptor = self.describe(file, capture_time)?;
        self.cache.put(capture_time, descriptor.clone(), self.ttl);
        Some(descriptor)
    }

    /// Stat and probe one file; the handle is closed when this returns
    fn describe(
        &self,
        file: &SegmentFile,
        capture_time: DateTime<Utc>,
    ) -> Option<SegmentDescriptor> {
        let mut handle = match File::open(&file.path) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Skipping {}: failed to open: {}", file.relative_path, e);
                return None;
            }
        };

        let size_bytes = match handle.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!("Skipping {}: failed to read metadata: {}", file.relative_path, e);
                return None;
            }
        };

        let duration = match self.probe.probe(file.kind, &mut handle) {
            Ok(duration) => duration,
            Err(e) => {
                debug!("Duration unavailable for {}: {:#}", file.relative_path, e);
                0
            }
        };

        Some(SegmentDescriptor {
            relative_path: file.relative_path.clone(),
            size_bytes,
            capture_time,
            duration,
        })
    }
}
