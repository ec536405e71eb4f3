//! Frame sampler event loop

use detection::{DetectionSample, DetectorBackend, StrategyChain};
use frame_source::{FrameSource, SourceError};
use metrics::counter;
use sample_history::TemporalSmoother;
use status::{Notifier, Status, StatusStateMachine};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::gate::NotifyGate;

/// Messages from the monitor handle to a running sampler
#[derive(Debug)]
pub(crate) enum Control {
    /// Video source acquisition failed
    SourceError(SourceError),
}

type InFlight<'a> = Pin<Box<dyn Future<Output = DetectionSample> + Send + 'a>>;

/// Owns all per-session state and drives it from one task.
///
/// Ticks, the pause deadline, detection completions and control messages
/// are multiplexed in a single loop, so the history, status and timer
/// slot are never touched concurrently.
pub struct FrameSampler<S, B, N> {
    source: Arc<S>,
    chain: StrategyChain<Arc<B>>,
    smoother: TemporalSmoother,
    machine: StatusStateMachine,
    tick_interval: Duration,
    notifier: Arc<N>,
    gate: Arc<NotifyGate>,
    status_tx: Arc<watch::Sender<Status>>,
    control_rx: mpsc::UnboundedReceiver<Control>,
}

impl<S, B, N> FrameSampler<S, B, N>
where
    S: FrameSource,
    B: DetectorBackend,
    N: Notifier,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        source: Arc<S>,
        chain: StrategyChain<Arc<B>>,
        smoother: TemporalSmoother,
        machine: StatusStateMachine,
        tick_interval: Duration,
        notifier: Arc<N>,
        gate: Arc<NotifyGate>,
        status_tx: Arc<watch::Sender<Status>>,
        control_rx: mpsc::UnboundedReceiver<Control>,
    ) -> Self {
        Self {
            source,
            chain,
            smoother,
            machine,
            tick_interval,
            notifier,
            gate,
            status_tx,
            control_rx,
        }
    }

    /// Run until the session ends (`Fail`, `Error`) or the gate closes
    pub(crate) async fn run(self) {
        let FrameSampler {
            source,
            chain,
            mut smoother,
            mut machine,
            tick_interval,
            notifier,
            gate,
            status_tx,
            mut control_rx,
        } = self;

        let publish = |status: Status| {
            let delivered = gate.deliver(|| {
                status_tx.send_replace(status);
                notifier.on_status_change(status);
            });
            if delivered {
                counter!("presence_status_changes_total", "status" => status.as_str()).increment(1);
            }
        };

        info!(
            "Sampler started: tick={:?}, tiers={}",
            tick_interval,
            chain.tiers().len()
        );

        // First tick fires one period after start
        let mut ticker = time::interval_at(Instant::now() + tick_interval, tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight: Option<InFlight<'_>> = None;

        while gate.is_open() && !machine.is_terminal() {
            let deadline = machine.deadline().map(Instant::from_std);

            tokio::select! {
                biased;

                Some(control) = control_rx.recv() => {
                    match control {
                        Control::SourceError(e) => {
                            warn!("Video source failed: {}", e);
                            if let Some(status) = machine.report_error() {
                                publish(status);
                            }
                        }
                    }
                }

                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(status) = machine.on_deadline(Instant::now().into_std()) {
                        publish(status);
                    }
                }

                sample = async {
                    match in_flight.as_mut() {
                        Some(detection) => detection.await,
                        None => std::future::pending().await,
                    }
                }, if in_flight.is_some() => {
                    in_flight = None;
                    let smoothed = smoother.update(sample.raw_count);

                    counter!("presence_ticks_total").increment(1);
                    match &sample.tier_used {
                        Some(tier) => {
                            counter!("presence_tier_hits_total", "tier" => tier.to_string()).increment(1)
                        }
                        None => counter!("presence_chain_exhausted_total").increment(1),
                    }
                    debug!(
                        "Sample: tier={:?}, raw={}, smoothed={}",
                        sample.tier_used.as_ref().map(|t| t.as_str()),
                        sample.raw_count,
                        smoothed
                    );

                    if let Some(status) = machine.on_sample(smoothed, Instant::now().into_std()) {
                        publish(status);
                    }
                }

                _ = ticker.tick() => {
                    if in_flight.is_some() {
                        debug!("Detection still running, skipping tick");
                        counter!("presence_ticks_skipped_total", "reason" => "in_flight").increment(1);
                    } else if !source.is_ready() {
                        debug!("Source not ready, skipping tick");
                        counter!("presence_ticks_skipped_total", "reason" => "not_ready").increment(1);
                    } else if let Some(frame) = source.current_frame() {
                        in_flight = Some(Box::pin(chain.run(frame)));
                    } else {
                        counter!("presence_ticks_skipped_total", "reason" => "no_frame").increment(1);
                    }
                }
            }
        }

        info!("Sampler stopped with status {}", machine.status());
    }
}
