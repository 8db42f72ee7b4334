use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::core::{MetricDeriver, rows_from_records};
use crate::error::{DashboardError, DashboardResult};
use crate::render::Renderer;
use crate::source::DataSource;

use super::{ChartBinding, RebindReport};

/// Result of one scheduler tick.
#[derive(Debug)]
pub enum RefreshOutcome {
    Refreshed(RebindReport),
    /// The cycle was abandoned; the binding still shows the previous data.
    /// `DashboardError::Render` is the exception: the new state is live and
    /// only the redraw failed.
    Failed(DashboardError),
    /// Another refresh was still running.
    Skipped,
}

impl RefreshOutcome {
    #[must_use]
    pub fn is_refreshed(&self) -> bool {
        matches!(self, Self::Refreshed(_))
    }
}

/// Running counters kept across ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    /// Periods that elapsed while a slow refresh was running and were folded
    /// into the next one.
    pub coalesced_ticks: u64,
    pub last_error: Option<String>,
    pub last_success_at: Option<DateTime<Utc>>,
}

/// Drives fetch, validate, derive and rebind, one cycle per tick.
///
/// `tick` takes `&mut self`, so a cycle can never interleave with another one
/// on the same scheduler. Hosts ticking from several threads go through
/// `SharedRefresh`.
pub struct RefreshScheduler<S: DataSource, R: Renderer> {
    source: S,
    binding: ChartBinding<R>,
    deriver: MetricDeriver,
    interval: Duration,
    stats: RefreshStats,
}

impl<S: DataSource, R: Renderer> RefreshScheduler<S, R> {
    /// Period and margin policy come from the binding's config.
    #[must_use]
    pub fn new(source: S, binding: ChartBinding<R>) -> Self {
        let interval = binding.config().refresh_interval();
        let deriver = MetricDeriver::new(binding.config().margin_policy);
        Self {
            source,
            binding,
            deriver,
            interval,
            stats: RefreshStats::default(),
        }
    }

    /// Runs one refresh cycle.
    ///
    /// Any failure keeps the previous chart state; the next tick retries.
    pub fn tick(&mut self) -> RefreshOutcome {
        self.stats.attempts += 1;
        match self.refresh_once() {
            Ok(report) => {
                self.stats.successes += 1;
                self.stats.last_error = None;
                self.stats.last_success_at = Some(Utc::now());
                info!(
                    generation = report.generation,
                    rows = report.rows,
                    order_changed = report.order_changed,
                    "dashboard refreshed"
                );
                RefreshOutcome::Refreshed(report)
            }
            Err(err) => {
                self.stats.failures += 1;
                self.stats.last_error = Some(err.to_string());
                warn!(
                    error = %err,
                    transient = err.is_transient(),
                    "refresh failed; keeping previous chart state"
                );
                RefreshOutcome::Failed(err)
            }
        }
    }

    fn refresh_once(&mut self) -> DashboardResult<RebindReport> {
        let records = self.source.fetch()?;
        debug!(records = records.len(), "fetched source records");
        let rows = rows_from_records(&records)?;
        let enriched = self.deriver.derive(rows)?;
        self.binding.rebind(&enriched)
    }

    /// Ticks every `interval` on the current thread until `should_stop` says so.
    ///
    /// A refresh that overruns the period is followed immediately by the next
    /// one; missed periods are counted, never replayed.
    pub fn run_blocking(&mut self, mut should_stop: impl FnMut(&RefreshStats) -> bool) {
        loop {
            let started = Instant::now();
            self.tick();
            if should_stop(&self.stats) {
                break;
            }
            let elapsed = started.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
                continue;
            }
            let missed = u64::try_from(elapsed.as_nanos() / self.interval.as_nanos().max(1))
                .unwrap_or(u64::MAX);
            let coalesced = missed.saturating_sub(1);
            self.stats.coalesced_ticks = self.stats.coalesced_ticks.saturating_add(coalesced);
            warn!(
                elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                coalesced, "refresh overran its period"
            );
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn stats(&self) -> &RefreshStats {
        &self.stats
    }

    #[must_use]
    pub fn binding(&self) -> &ChartBinding<R> {
        &self.binding
    }

    /// View-state operations (legend, zoom) go through here between ticks.
    pub fn binding_mut(&mut self) -> &mut ChartBinding<R> {
        &mut self.binding
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    #[must_use]
    pub fn into_parts(self) -> (S, ChartBinding<R>) {
        (self.source, self.binding)
    }
}

/// Scheduler shared between timer threads.
///
/// A tick that finds a refresh in progress is dropped rather than queued.
pub struct SharedRefresh<S: DataSource, R: Renderer> {
    inner: Mutex<RefreshScheduler<S, R>>,
    skipped: AtomicU64,
}

impl<S: DataSource, R: Renderer> SharedRefresh<S, R> {
    #[must_use]
    pub fn new(scheduler: RefreshScheduler<S, R>) -> Self {
        Self {
            inner: Mutex::new(scheduler),
            skipped: AtomicU64::new(0),
        }
    }

    pub fn try_tick(&self) -> RefreshOutcome {
        match self.inner.try_lock() {
            Ok(mut scheduler) => scheduler.tick(),
            Err(TryLockError::WouldBlock) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                debug!("refresh still running; skipping tick");
                RefreshOutcome::Skipped
            }
            Err(TryLockError::Poisoned(poisoned)) => {
                warn!("previous refresh panicked; resuming with last committed state");
                let mut scheduler = poisoned.into_inner();
                self.inner.clear_poison();
                scheduler.tick()
            }
        }
    }

    /// Blocks until the scheduler is free, for view-state edits and reads.
    pub fn lock(&self) -> MutexGuard<'_, RefreshScheduler<S, R>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            self.inner.clear_poison();
            poisoned.into_inner()
        })
    }

    #[must_use]
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::{RefreshOutcome, RefreshScheduler, SharedRefresh};
    use crate::api::{ChartBinding, DashboardConfig};
    use crate::core::{RawRecord, Row};
    use crate::error::DashboardResult;
    use crate::render::NullRenderer;
    use crate::source::{DataSource, MemorySource};

    /// Source whose every fetch takes longer than the refresh period.
    struct SlowSource {
        inner: MemorySource,
        delay: Duration,
    }

    impl DataSource for SlowSource {
        fn fetch(&mut self) -> DashboardResult<Vec<RawRecord>> {
            thread::sleep(self.delay);
            self.inner.fetch()
        }
    }

    fn scheduler<S: DataSource>(source: S) -> RefreshScheduler<S, NullRenderer> {
        let config = DashboardConfig::default().with_refresh_interval(Duration::from_millis(1));
        let binding = ChartBinding::new(NullRenderer::default(), config).expect("binding");
        RefreshScheduler::new(source, binding)
    }

    #[test]
    fn run_blocking_stops_when_asked() {
        let mut scheduler = scheduler(MemorySource::from_rows(&[Row::new(
            "A", 1.0, 2.0, 3.0, 4.0,
        )]));
        scheduler.run_blocking(|stats| stats.attempts >= 3);
        assert_eq!(scheduler.stats().attempts, 3);
        assert_eq!(scheduler.stats().successes, 3);
        assert_eq!(scheduler.source().fetches(), 3);
    }

    #[test]
    fn shared_tick_is_skipped_while_locked() {
        let shared = SharedRefresh::new(scheduler(MemorySource::from_rows(&[Row::new(
            "A", 1.0, 2.0, 3.0, 4.0,
        )])));
        {
            let _held = shared.lock();
            assert!(matches!(shared.try_tick(), RefreshOutcome::Skipped));
        }
        assert!(shared.try_tick().is_refreshed());
        assert_eq!(shared.skipped_ticks(), 1);
        assert_eq!(shared.lock().stats().attempts, 1);
    }

    #[test]
    fn run_blocking_coalesces_overrun_periods() {
        let source = SlowSource {
            inner: MemorySource::from_rows(&[Row::new("A", 1.0, 2.0, 3.0, 4.0)]),
            delay: Duration::from_millis(5),
        };
        let mut scheduler = scheduler(source);
        scheduler.run_blocking(|stats| stats.attempts >= 3);

        let stats = scheduler.stats();
        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.successes, 3);
        assert!(stats.coalesced_ticks > 0);
        assert_eq!(scheduler.source().inner.fetches(), 3);
    }

    #[test]
    fn poisoned_lock_is_cleared_after_recovery() {
        let shared = SharedRefresh::new(scheduler(MemorySource::from_rows(&[Row::new(
            "A", 1.0, 2.0, 3.0, 4.0,
        )])));
        thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _held = shared.lock();
                    panic!("refresh host crashed");
                })
                .join();
        });
        assert!(shared.inner.is_poisoned());

        assert!(shared.try_tick().is_refreshed());
        assert!(!shared.inner.is_poisoned());
        assert!(shared.try_tick().is_refreshed());
        assert_eq!(shared.lock().stats().successes, 2);
    }
}
