//! Periodic driver for the check-in expiry sweep.
//!
//! Each tick runs one [`CheckinSweep::sweep_expired`] pass at the clock's
//! current instant, under a fresh [`TraceId`] so the pass's log lines and
//! errors correlate. A failed pass is logged and retried on the next tick.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::ports::{CheckinSweep, SweepOutcome};
use crate::domain::{Error, TraceId};

/// Runs the expiry sweep on a fixed period.
pub struct ExpirySweeper {
    sweep: Arc<dyn CheckinSweep>,
    clock: Arc<dyn Clock>,
    period: Duration,
}

impl ExpirySweeper {
    pub fn new(sweep: Arc<dyn CheckinSweep>, clock: Arc<dyn Clock>, period: Duration) -> Self {
        Self {
            sweep,
            clock,
            period,
        }
    }

    /// Run a single pass now.
    pub async fn run_once(&self) -> Result<SweepOutcome, Error> {
        let trace_id = TraceId::generate();
        TraceId::scope(trace_id, async {
            let now = self.clock.utc();
            let outcome = self.sweep.sweep_expired(now).await?;
            if outcome.closed > 0 {
                info!(
                    %trace_id,
                    closed = outcome.closed,
                    candidates = outcome.candidates,
                    "closed overstayed check-ins"
                );
            } else {
                debug!(%trace_id, candidates = outcome.candidates, "sweep found nothing to close");
            }
            Ok(outcome)
        })
        .await
    }

    /// Sweep every period until `shutdown` resolves.
    ///
    /// The first pass runs immediately.
    pub async fn run_until<S>(self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("expiry sweeper stopping");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(error) = self.run_once().await {
                        warn!(
                            code = ?error.code(),
                            message = error.message(),
                            trace_id = ?error.trace_id(),
                            "expiry sweep failed"
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use rstest::rstest;
    use tokio::sync::oneshot;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockCheckinSweep;
    use crate::test_support::MutableClock;
    use crate::test_support::fixtures::t0;

    fn sweeper(sweep: impl CheckinSweep + 'static) -> ExpirySweeper {
        ExpirySweeper::new(
            Arc::new(sweep),
            Arc::new(MutableClock::new(t0())),
            Duration::from_millis(5),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn run_once_sweeps_at_clock_time_inside_a_trace_scope() {
        let mut sweep = MockCheckinSweep::new();
        sweep
            .expect_sweep_expired()
            .withf(|now| *now == t0())
            .times(1)
            .returning(|_| {
                assert!(TraceId::current().is_some(), "trace id in scope");
                Ok(SweepOutcome {
                    candidates: 2,
                    closed: 2,
                })
            });

        let outcome = sweeper(sweep).run_once().await.expect("sweep succeeds");
        assert_eq!(outcome.closed, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn run_once_propagates_failures() {
        let mut sweep = MockCheckinSweep::new();
        sweep
            .expect_sweep_expired()
            .times(1)
            .return_once(|_| Err(Error::service_unavailable("store down")));

        let error = sweeper(sweep).run_once().await.expect_err("sweep fails");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert!(error.trace_id().is_some());
    }

    struct CountingSweep {
        passes: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl CheckinSweep for CountingSweep {
        async fn sweep_expired(&self, _now: DateTime<Utc>) -> Result<SweepOutcome, Error> {
            self.passes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(Error::service_unavailable("store down"))
            } else {
                Ok(SweepOutcome::default())
            }
        }
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    #[tokio::test]
    async fn loop_keeps_ticking_until_shutdown(#[case] fail: bool) {
        let passes = Arc::new(AtomicUsize::new(0));
        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(
            sweeper(CountingSweep {
                passes: Arc::clone(&passes),
                fail,
            })
            .run_until(async {
                let _ = stopped.await;
            }),
        );

        time::sleep(Duration::from_millis(40)).await;
        stop.send(()).expect("sweeper still running");
        task.await.expect("sweeper exits cleanly");

        assert!(passes.load(Ordering::SeqCst) >= 2, "sweeper ticked repeatedly");
    }
}
