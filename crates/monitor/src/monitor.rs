//! Host-facing monitor handle

use detection::{DetectorBackend, StrategyChain};
use frame_source::{FrameSource, SourceError};
use sample_history::TemporalSmoother;
use status::{Notifier, Status, StatusStateMachine};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::gate::NotifyGate;
use crate::sampler::{Control, FrameSampler};
use crate::{MonitorConfig, MonitorError};

/// One start..stop run of the sampler
struct Session {
    id: Uuid,
    gate: Arc<NotifyGate>,
    control_tx: mpsc::UnboundedSender<Control>,
    handle: JoinHandle<()>,
}

impl Session {
    /// Still sampling. A session that has published a terminal status is
    /// winding down even while its notifier call is in progress.
    fn is_live(&self, status: Status) -> bool {
        self.gate.is_open() && !self.handle.is_finished() && !status.is_terminal()
    }

    fn shutdown(self) {
        self.gate.close();
        self.handle.abort();
    }
}

/// Presence monitor handle.
///
/// `start` spawns the sampling loop on the current tokio runtime; `stop`
/// tears it down. Both are idempotent. Status changes go to the notifier
/// given at construction, one call per transition. No notification is
/// delivered once `stop` has returned.
pub struct PresenceMonitor<S, B, N> {
    config: MonitorConfig,
    source: Arc<S>,
    backend: Arc<B>,
    notifier: Arc<N>,
    status_tx: Arc<watch::Sender<Status>>,
    session: Mutex<Option<Session>>,
}

impl<S, B, N> PresenceMonitor<S, B, N>
where
    S: FrameSource,
    B: DetectorBackend,
    N: Notifier,
{
    /// Create a stopped monitor
    pub fn new(config: MonitorConfig, source: S, backend: B, notifier: N) -> Result<Self, MonitorError> {
        config.validate()?;
        let (status_tx, _) = watch::channel(Status::Normal);

        Ok(Self {
            config,
            source: Arc::new(source),
            backend: Arc::new(backend),
            notifier: Arc::new(notifier),
            status_tx: Arc::new(status_tx),
            session: Mutex::new(None),
        })
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start sampling. A no-op while a session is running; after a
    /// terminal status or `stop`, begins a fresh session in `Normal`.
    pub fn start(&self) -> Result<(), MonitorError> {
        let mut session = self.lock_session();
        let status = self.status();
        if session.as_ref().is_some_and(|s| s.is_live(status)) {
            debug!("Presence monitor already running");
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|_| MonitorError::NoRuntime)?;
        if let Some(finished) = session.take() {
            finished.shutdown();
        }

        let id = Uuid::new_v4();
        let gate = Arc::new(NotifyGate::new());
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        self.status_tx.send_replace(Status::Normal);

        let sampler = FrameSampler::new(
            self.source.clone(),
            StrategyChain::new(self.config.tiers.clone(), self.backend.clone()),
            TemporalSmoother::new(self.config.history_capacity),
            StatusStateMachine::new(self.config.pause_timeout()),
            self.config.tick_interval(),
            self.notifier.clone(),
            gate.clone(),
            self.status_tx.clone(),
            control_rx,
        );
        let handle = runtime.spawn(sampler.run().instrument(info_span!("presence", session = %id)));

        info!("Presence monitor started (session {})", id);
        *session = Some(Session {
            id,
            gate,
            control_tx,
            handle,
        });
        Ok(())
    }

    /// Stop sampling, cancel the pause timer, and drop any detection in
    /// flight. Safe to call at any time, including from the notifier.
    pub fn stop(&self) {
        let Some(session) = self.lock_session().take() else {
            debug!("Presence monitor not running");
            return;
        };
        let id = session.id;
        session.shutdown();
        info!("Presence monitor stopped (session {})", id);
    }

    /// Forward a video source acquisition failure; moves the running
    /// session to `Error`.
    pub fn report_source_error(&self, error: SourceError) {
        let session = self.lock_session();
        let status = self.status();
        match session.as_ref() {
            Some(session) if session.is_live(status) => {
                if session.control_tx.send(Control::SourceError(error)).is_err() {
                    debug!("Sampler already exited, dropping source error");
                }
            }
            _ => warn!("Source error while not running: {}", error),
        }
    }

    /// Whether a session is currently sampling
    pub fn is_running(&self) -> bool {
        let status = self.status();
        self.lock_session().as_ref().is_some_and(|s| s.is_live(status))
    }

    /// Latest status of the current or last session
    pub fn status(&self) -> Status {
        *self.status_tx.borrow()
    }

    /// Watch status changes
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status_tx.subscribe()
    }

    /// Id of the running or most recently ended session; cleared by `stop`
    pub fn session_id(&self) -> Option<Uuid> {
        self.lock_session().as_ref().map(|session| session.id)
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}

impl<S, B, N> Drop for PresenceMonitor<S, B, N> {
    fn drop(&mut self) {
        if let Some(session) = self.lock_session_mut().take() {
            session.shutdown();
        }
    }
}

impl<S, B, N> PresenceMonitor<S, B, N> {
    fn lock_session_mut(&mut self) -> &mut Option<Session> {
        self.session
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
